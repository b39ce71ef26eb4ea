use crate::alu::Size;
use thiserror::Error;

/// Invalid-instruction conditions that send the processor to its error trap.
///
/// Every variant is handled the same way by the host; the payload only
/// records why decoding gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Trap {
    #[error("unimplemented opcode {opcode:#04X}")]
    Unimplemented { opcode: u8 },
    #[error("invalid operand shape for opcode {opcode:#04X} (sub-register {sub_reg})")]
    InvalidOperand { opcode: u8, sub_reg: u8 },
    #[error("invalid secondary byte {secondary:#04X} after {opcode:#04X}")]
    InvalidSecondary { opcode: u8, secondary: u8 },
    #[error("divide by zero")]
    DivideByZero,
    #[error("no control register {index} with {size:?} access")]
    ControlRegister { index: u8, size: Size },
    #[error("stack pointer misaligned after RTD: {sp:#06X}")]
    MisalignedStack { sp: u16 },
}

/// Outcome of executing one handler.
pub type ExecResult = Result<(), Trap>;
