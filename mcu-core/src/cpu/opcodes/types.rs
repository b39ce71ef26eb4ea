//! Dispatch-table entry types shared by the opcode submodules.

use super::super::{GeneralOperand, Mcu};
use crate::bus::McuBus;
use crate::error::{ExecResult, Trap};

/// Handler for a first instruction byte. Receives that byte.
pub type OperandFn = fn(&mut Mcu, &mut dyn McuBus, u8) -> ExecResult;

/// Handler for a general-form operation. Receives the decoded operand, the
/// 5-bit table index and the 3-bit sub-register field.
pub type OpcodeFn = fn(&mut Mcu, &mut dyn McuBus, &GeneralOperand, u8, u8) -> ExecResult;

/// Entry in the 256-entry first-byte table.
#[derive(Clone, Copy)]
pub struct OperandEntry {
    /// Mnemonic for tracing and disassembly.
    pub mnemonic: &'static str,
    pub exec: OperandFn,
}

/// Entry in the 32-entry general operation table.
#[derive(Clone, Copy)]
pub struct OpcodeEntry {
    pub mnemonic: &'static str,
    pub exec: OpcodeFn,
}

pub(crate) fn operand_not_implemented(_mcu: &mut Mcu, _bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    Err(Trap::Unimplemented { opcode })
}

pub(crate) fn opcode_not_implemented(
    _mcu: &mut Mcu,
    _bus: &mut dyn McuBus,
    _op: &GeneralOperand,
    index: u8,
    _sub_reg: u8,
) -> ExecResult {
    Err(Trap::Unimplemented { opcode: index })
}

/// Error for an operand shape a handler does not accept.
pub(crate) const fn invalid(index: u8, sub_reg: u8) -> Trap {
    Trap::InvalidOperand {
        opcode: index,
        sub_reg,
    }
}
