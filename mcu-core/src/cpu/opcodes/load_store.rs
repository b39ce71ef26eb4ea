//! Data movement: the short register forms, MOV:G and control register
//! transfers.

use super::types::invalid;
use crate::alu::Size;
use crate::bus::McuBus;
use crate::cpu::{GeneralOperand, Mcu};
use crate::error::ExecResult;
use crate::interrupts::ExceptionSource;

/// MOV:E #imm8, Rn (0x50..=0x57).
pub fn short_mov_e(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let data = mcu.read_code_advance(bus);
    mcu.regs.set_low(reg, data);
    mcu.set_status_common(u32::from(data), Size::Byte);
    Ok(())
}

/// MOV:I #imm16, Rn (0x58..=0x5F).
pub fn short_mov_i(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let data = mcu.read_code_word(bus);
    mcu.regs.r[reg] = data;
    mcu.set_status_common(u32::from(data), Size::Word);
    Ok(())
}

/// Address of the `@aa:8` short absolute forms, always in page 0.
fn short_address(mcu: &mut Mcu, bus: &mut dyn McuBus) -> u16 {
    (u16::from(mcu.regs.br) << 8) | u16::from(mcu.read_code_advance(bus))
}

/// MOV:L @aa:8, Rn (0x60..=0x6F).
pub fn short_mov_l(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let addr = short_address(mcu, bus);
    if opcode & 0x08 != 0 {
        if addr & 1 != 0 {
            bus.exception(ExceptionSource::AddressError);
        }
        let data = bus.read16(Mcu::get_address(0, addr));
        mcu.regs.r[reg] = data;
        mcu.set_status_common(u32::from(data), Size::Word);
    } else {
        let data = bus.read(Mcu::get_address(0, addr));
        mcu.regs.set_low(reg, data);
        mcu.set_status_common(u32::from(data), Size::Byte);
    }
    Ok(())
}

/// MOV:S Rn, @aa:8 (0x70..=0x7F).
pub fn short_mov_s(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let addr = short_address(mcu, bus);
    if opcode & 0x08 != 0 {
        if addr & 1 != 0 {
            bus.exception(ExceptionSource::AddressError);
        }
        let data = mcu.regs.r[reg];
        bus.write16(Mcu::get_address(0, addr), data);
        mcu.set_status_common(u32::from(data), Size::Word);
    } else {
        let data = mcu.regs.r[reg] as u8;
        bus.write(Mcu::get_address(0, addr), data);
        mcu.set_status_common(u32::from(data), Size::Byte);
    }
    Ok(())
}

/// MOV:F frame-relative load/store at `tp:(r6 + d8)` (0x80..=0x9F).
///
/// The width bit is wired backwards relative to the other forms: with bit 3
/// set a load reads a word but merges it over a cleared low byte and sets
/// byte flags, and a store writes one byte. With bit 3 clear a load reads a
/// byte into the whole register and a store writes a word, both with word
/// flags.
pub fn short_mov_f(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let reg = (opcode & 0x07) as usize;
    let wide = opcode & 0x08 != 0;
    let disp = mcu.read_code_advance(bus) as i8 as u16;
    let addr = Mcu::get_address(mcu.regs.tp, mcu.regs.r[6].wrapping_add(disp));

    if opcode & 0x10 == 0 {
        if wide {
            let data = bus.read16(addr);
            mcu.regs.r[reg] = (mcu.regs.r[reg] & 0xFF00) | data;
            mcu.set_status_common(u32::from(data), Size::Byte);
        } else {
            let data = u16::from(bus.read(addr));
            mcu.regs.r[reg] = data;
            mcu.set_status_common(u32::from(data), Size::Word);
        }
    } else if wide {
        let data = mcu.regs.r[reg] as u8;
        bus.write(addr, data);
        mcu.set_status_common(u32::from(data), Size::Byte);
    } else {
        let data = mcu.regs.r[reg];
        bus.write16(addr, data);
        mcu.set_status_common(u32::from(data), Size::Word);
    }
    Ok(())
}

/// Table slot 0x00: MOV:G #imm, <ea> and CMP:G #imm, <ea>.
///
/// Only memory operands are accepted. Sub-register 6 stores a sign-extended
/// byte, 7 stores a word, 4 compares against a byte immediate and 5 against
/// a word immediate. The compare widths follow the operand size, so a word
/// operand with sub-register 4 compares against the sign-extended byte and a
/// byte operand with sub-register 5 still fetches two immediate bytes.
pub fn movg_immediate(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    if !op.is_memory() {
        return Err(invalid(index, sub_reg));
    }
    match sub_reg {
        6 => {
            let data = u32::from(mcu.read_code_advance(bus) as i8 as u16);
            op.write(mcu, bus, data);
            mcu.set_status_common(data, op.size);
        }
        7 => {
            let data = u32::from(mcu.read_code_word(bus));
            op.write(mcu, bus, data);
            mcu.set_status_common(data, op.size);
        }
        4 => {
            let lhs = op.read(mcu, bus);
            let imm = mcu.read_code_advance(bus);
            let rhs = match op.size {
                Size::Byte => u32::from(imm),
                Size::Word => u32::from(imm as i8 as u16),
            };
            mcu.sub_common(lhs, rhs, false, op.size);
        }
        5 => {
            let lhs = op.read(mcu, bus);
            let rhs = u32::from(mcu.read_code_word(bus));
            mcu.sub_common(lhs, rhs, false, op.size);
        }
        _ => return Err(invalid(index, sub_reg)),
    }
    Ok(())
}

/// Table slots 0x10/0x12: MOV:G <ea>, Rn / MOV:G Rn, <ea>, and XCH for a
/// word register operand in store direction.
pub fn movg(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    // The escaped forms have no known encoding.
    if op.extended {
        return Err(invalid(index, sub_reg));
    }

    let reg = sub_reg as usize;
    if index & 2 != 0 {
        if op.is_direct() {
            if op.size == Size::Byte {
                return Err(invalid(index, sub_reg));
            }
            mcu.regs.r.swap(reg, op.reg);
        } else {
            let data = u32::from(mcu.regs.r[reg]);
            op.write(mcu, bus, data);
            mcu.set_status_common(data, op.size);
        }
    } else {
        let data = op.read(mcu, bus);
        match op.size {
            Size::Word => mcu.regs.r[reg] = data as u16,
            Size::Byte => mcu.regs.set_low(reg, data as u8),
        }
        mcu.set_status_common(data, op.size);
    }
    Ok(())
}

/// LDC <ea>, CR.
pub fn ldc(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let data = op.read(mcu, bus);
    mcu.control_register_write(sub_reg, op.size, data)?;
    mcu.ex_ignore = true;
    Ok(())
}

/// STC CR, <ea>.
pub fn stc(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    let data = mcu.control_register_read(sub_reg, op.size)?;
    op.write(mcu, bus, data);
    Ok(())
}
