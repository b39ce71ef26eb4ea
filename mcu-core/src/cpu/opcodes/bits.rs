//! Single-bit operations and the ORC/ANDC control register forms that share
//! their table slots.
//!
//! Bit operations only touch Z, which reports whether the bit was clear
//! before the operation.

use super::types::invalid;
use crate::bus::McuBus;
use crate::cpu::{GeneralOperand, Mcu, Status};
use crate::error::ExecResult;

#[derive(Clone, Copy)]
enum BitOp {
    Set,
    Clear,
    Not,
    Test,
}

fn apply(mcu: &mut Mcu, bus: &mut dyn McuBus, op: &GeneralOperand, bit: u32, kind: BitOp) {
    let data = op.read(mcu, bus);
    let mask = 1u32 << bit;
    mcu.set_status(Status::Z, data & mask == 0);
    let data = match kind {
        BitOp::Set => data | mask,
        BitOp::Clear => data & !mask,
        BitOp::Not => data ^ mask,
        BitOp::Test => return,
    };
    op.write(mcu, bus, data);
}

/// Bit number held in the low nibble of `r[sub_reg]`.
fn register_bit(mcu: &Mcu, sub_reg: u8) -> u32 {
    u32::from(mcu.regs.r[sub_reg as usize] & 0x0F)
}

/// Bit number packed into the operation byte: bit 0 of the index supplies bit 3.
const fn immediate_bit(index: u8, sub_reg: u8) -> u32 {
    (sub_reg | ((index & 1) << 3)) as u32
}

/// ORC/ANDC: combine an immediate into control register `sub_reg`.
fn control_logic(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    sub_reg: u8,
    combine: fn(u32, u32) -> u32,
) -> ExecResult {
    let data = op.read(mcu, bus);
    let value = combine(mcu.control_register_read(sub_reg, op.size)?, data);
    mcu.control_register_write(sub_reg, op.size, value)?;
    if sub_reg >= 2 {
        mcu.set_status_common(value, op.size);
    }
    mcu.ex_ignore = true;
    Ok(())
}

/// BSET Rn-indexed, or ORC with an immediate operand.
pub fn bset_orc(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    if op.is_immediate() {
        return control_logic(mcu, bus, op, sub_reg, |a, b| a | b);
    }
    let bit = register_bit(mcu, sub_reg);
    apply(mcu, bus, op, bit, BitOp::Set);
    Ok(())
}

/// BCLR Rn-indexed, or ANDC with an immediate operand.
pub fn bclr_andc(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    _index: u8,
    sub_reg: u8,
) -> ExecResult {
    if op.is_immediate() {
        return control_logic(mcu, bus, op, sub_reg, |a, b| a & b);
    }
    let bit = register_bit(mcu, sub_reg);
    apply(mcu, bus, op, bit, BitOp::Clear);
    Ok(())
}

pub fn btst(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    if op.is_immediate() {
        return Err(invalid(index, sub_reg));
    }
    let bit = register_bit(mcu, sub_reg);
    apply(mcu, bus, op, bit, BitOp::Test);
    Ok(())
}

fn immediate_form(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
    kind: BitOp,
) -> ExecResult {
    if op.is_immediate() {
        return Err(invalid(index, sub_reg));
    }
    apply(mcu, bus, op, immediate_bit(index, sub_reg), kind);
    Ok(())
}

pub fn bset_imm(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    immediate_form(mcu, bus, op, index, sub_reg, BitOp::Set)
}

pub fn bclr_imm(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    immediate_form(mcu, bus, op, index, sub_reg, BitOp::Clear)
}

pub fn bnot_imm(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    immediate_form(mcu, bus, op, index, sub_reg, BitOp::Not)
}

pub fn btst_imm(
    mcu: &mut Mcu,
    bus: &mut dyn McuBus,
    op: &GeneralOperand,
    index: u8,
    sub_reg: u8,
) -> ExecResult {
    immediate_form(mcu, bus, op, index, sub_reg, BitOp::Test)
}
