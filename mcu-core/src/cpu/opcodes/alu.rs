//! Arithmetic, logic and shift operations.

use super::types::invalid;
use crate::alu::Size;
use crate::bus::McuBus;
use crate::cpu::{GeneralOperand, Mcu, Status};
use crate::error::{ExecResult, Trap};

/// Write `value` back into `r[reg]` at operand width: a byte result only
/// replaces the low byte.
fn store_reg(mcu: &mut Mcu, reg: usize, value: u32, size: Size) {
    match size {
        Size::Word => mcu.regs.r[reg] = value as u16,
        Size::Byte => mcu.regs.set_low(reg, value as u8),
    }
}

/// CMP:E / CMP:I Rn, #imm (0x40..=0x4F).
pub fn short_cmp(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let size = Size::from_word_bit(opcode & 0x08 != 0);
    let imm = match size {
        Size::Word => mcu.read_code_word(bus),
        Size::Byte => u16::from(mcu.read_code_advance(bus)),
    };
    mcu.sub_common(u32::from(mcu.regs.r[reg]), u32::from(imm), false, size);
    Ok(())
}

/// ADDQ #1/#2/#-1/#-2.
pub fn addq(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    let value = op.read(mcu, bus);
    let (delta, result) = match sub_reg {
        0 => (1, Ok(())),
        1 => (2, Ok(())),
        4 => (-1i32 as u32, Ok(())),
        5 => (-2i32 as u32, Ok(())),
        _ => (0, Err(invalid(index, sub_reg))),
    };
    // An invalid quick value still performs the add of zero and write-back.
    let sum = mcu.add_common(value, delta, false, op.size);
    op.write(mcu, bus, sum);
    result
}

/// Single-operand group: CLR, TST, EXTU, SWAP, NOT, NEG, EXTS.
pub fn clr_group(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    let direct_byte = op.is_direct() && op.size == Size::Byte;
    match sub_reg {
        // CLR
        3 if !op.is_immediate() => {
            op.write(mcu, bus, 0);
            mcu.set_status(Status::N, false);
            mcu.set_status(Status::Z, true);
            mcu.set_status(Status::V, false);
            mcu.set_status(Status::C, false);
        }
        // TST
        6 if !op.is_immediate() => {
            let data = op.read(mcu, bus);
            mcu.set_status_common(data, op.size);
            mcu.set_status(Status::C, false);
        }
        // EXTU
        2 if direct_byte => {
            let data = mcu.regs.r[op.reg] & 0xFF;
            mcu.regs.r[op.reg] = data;
            mcu.set_status(Status::N, false);
            mcu.set_status(Status::Z, data == 0);
            mcu.set_status(Status::V, false);
            mcu.set_status(Status::C, false);
        }
        // SWAP
        0 if direct_byte => {
            let data = mcu.regs.r[op.reg].swap_bytes();
            mcu.regs.r[op.reg] = data;
            mcu.set_status_common(u32::from(data), Size::Word);
        }
        // NOT
        5 if !op.is_immediate() => {
            let data = !op.read(mcu, bus);
            op.write(mcu, bus, data);
            mcu.set_status_common(data, op.size);
        }
        // NEG
        4 if !op.is_immediate() => {
            let data = op.read(mcu, bus);
            let data = mcu.sub_common(0, data, false, op.size);
            op.write(mcu, bus, data);
        }
        // EXTS: flags come from the value before extension.
        1 if direct_byte => {
            let data = mcu.regs.r[op.reg];
            mcu.regs.r[op.reg] = data as u8 as i8 as u16;
            mcu.set_status_common(u32::from(data), Size::Word);
        }
        _ => return Err(invalid(index, sub_reg)),
    }
    Ok(())
}

/// Shift and rotate group. C is set from the bit shifted out.
pub fn shift_group(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    if op.is_immediate() || sub_reg == 7 {
        return Err(invalid(index, sub_reg));
    }
    let data = op.read(mcu, bus);
    let msb = data & op.size.sign_bit() != 0;
    let lsb = data & 1 != 0;
    let (data, carry) = match sub_reg {
        // SHAL / SHLL
        0 | 2 => (data << 1, msb),
        // SHAR
        1 => {
            let top = data & op.size.sign_bit();
            (((data & (op.size.mask() >> 1)) >> 1) | top, lsb)
        }
        // SHLR
        3 => (data >> 1, lsb),
        // ROTL
        4 => ((data << 1) | u32::from(msb), msb),
        // ROTR
        5 => ((data >> 1) | (u32::from(lsb) << (op.size.bits() - 1)), lsb),
        // ROTXL
        _ => ((data << 1) | u32::from(mcu.flag(Status::C)), msb),
    };
    op.write(mcu, bus, data);
    mcu.set_status(Status::C, carry);
    mcu.set_status_common(data, op.size);
    Ok(())
}

pub fn add(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus);
    let result = mcu.add_common(u32::from(mcu.regs.r[reg]), src, false, op.size);
    store_reg(mcu, reg, result, op.size);
    Ok(())
}

pub fn sub(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus);
    let result = mcu.sub_common(u32::from(mcu.regs.r[reg]), src, false, op.size);
    store_reg(mcu, reg, result, op.size);
    Ok(())
}

/// ADDS: full-width add without flags.
pub fn adds(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let src = op.read(mcu, bus);
    let src = match op.size {
        Size::Word => src as u16,
        Size::Byte => src as u8 as i8 as u16,
    };
    let reg = sub_reg as usize;
    mcu.regs.r[reg] = mcu.regs.r[reg].wrapping_add(src);
    Ok(())
}

/// SUBS: full-width subtract without flags.
pub fn subs(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let src = op.read(mcu, bus);
    let src = match op.size {
        Size::Word => src as u16,
        Size::Byte => src as u8 as i8 as u16,
    };
    let reg = sub_reg as usize;
    mcu.regs.r[reg] = mcu.regs.r[reg].wrapping_sub(src);
    Ok(())
}

/// OR operates on the whole register even for byte operands.
pub fn or(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus) as u16;
    mcu.regs.r[reg] |= src;
    mcu.set_status_common(u32::from(mcu.regs.r[reg]), op.size);
    Ok(())
}

pub fn and(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus);
    let data = u32::from(mcu.regs.r[reg]) & src;
    store_reg(mcu, reg, data, op.size);
    mcu.set_status_common(u32::from(mcu.regs.r[reg]), op.size);
    Ok(())
}

/// XOR operates on the whole register even for byte operands.
pub fn xor(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus) as u16;
    mcu.regs.r[reg] ^= src;
    mcu.set_status_common(u32::from(mcu.regs.r[reg]), op.size);
    Ok(())
}

pub fn cmp(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let lhs = u32::from(mcu.regs.r[sub_reg as usize]);
    let rhs = op.read(mcu, bus);
    mcu.sub_common(lhs, rhs, false, op.size);
    Ok(())
}

/// ADDX: carry-chained add. A clear Z stays clear so a multi-word result is
/// only zero if every part was.
pub fn addx(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus);
    let carry = mcu.flag(Status::C);
    let zero = mcu.flag(Status::Z);
    let result = mcu.add_common(u32::from(mcu.regs.r[reg]), src, carry, op.size);
    if !zero {
        mcu.set_status(Status::Z, false);
    }
    store_reg(mcu, reg, result, op.size);
    Ok(())
}

/// SUBX: carry-chained subtract with the same Z chaining as ADDX.
pub fn subx(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let reg = sub_reg as usize;
    let src = op.read(mcu, bus);
    let carry = mcu.flag(Status::C);
    let zero = mcu.flag(Status::Z);
    let result = mcu.sub_common(u32::from(mcu.regs.r[reg]), src, carry, op.size);
    if !zero {
        mcu.set_status(Status::Z, false);
    }
    store_reg(mcu, reg, result, op.size);
    Ok(())
}

/// MULXU: 8x8 into `r[sub_reg]`, or 16x16 into the even/odd register pair.
pub fn mulxu(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let src = op.read(mcu, bus);
    let reg = sub_reg as usize;
    let dst = op.size.truncate(u32::from(mcu.regs.r[reg]));
    let product = src.wrapping_mul(dst);

    let (product, negative) = match op.size {
        Size::Word => {
            let pair = reg & !1;
            mcu.regs.r[pair] = (product >> 16) as u16;
            mcu.regs.r[pair | 1] = product as u16;
            (product, product & 0x8000_0000 != 0)
        }
        Size::Byte => {
            let product = product & 0xFFFF;
            mcu.regs.r[reg] = product as u16;
            (product, product & 0x8000 != 0)
        }
    };
    mcu.set_status(Status::N, negative);
    mcu.set_status(Status::Z, product == 0);
    mcu.set_status(Status::V, false);
    mcu.set_status(Status::C, false);
    Ok(())
}

fn set_divide_overflow(mcu: &mut Mcu) {
    mcu.set_status(Status::N, false);
    mcu.set_status(Status::Z, false);
    mcu.set_status(Status::V, true);
    mcu.set_status(Status::C, false);
}

/// DIVXU: unsigned divide leaving remainder:quotient.
pub fn divxu(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let divisor = op.read(mcu, bus);
    if divisor == 0 {
        mcu.set_status(Status::N, false);
        mcu.set_status(Status::Z, true);
        mcu.set_status(Status::V, false);
        mcu.set_status(Status::C, false);
        return Err(Trap::DivideByZero);
    }

    let reg = sub_reg as usize;
    match op.size {
        Size::Word => {
            let pair = reg & !1;
            let dividend =
                (u32::from(mcu.regs.r[pair]) << 16) | u32::from(mcu.regs.r[pair | 1]);
            let quotient = dividend / divisor;
            let remainder = dividend % divisor;
            if quotient > 0xFFFF {
                set_divide_overflow(mcu);
            } else {
                mcu.regs.r[pair] = remainder as u16;
                mcu.regs.r[pair | 1] = quotient as u16;
                mcu.set_status_common(quotient, Size::Word);
                mcu.set_status(Status::C, false);
            }
        }
        Size::Byte => {
            let dividend = u32::from(mcu.regs.r[reg]);
            let quotient = dividend / divisor;
            let remainder = dividend % divisor;
            if quotient > 0xFF {
                set_divide_overflow(mcu);
            } else {
                mcu.regs.r[reg] = (((remainder & 0xFF) << 8) | quotient) as u16;
                mcu.set_status_common(quotient, Size::Byte);
                mcu.set_status(Status::C, false);
            }
        }
    }
    Ok(())
}
