//! General addressing-mode decoder.
//!
//! Opcodes 0x04/0x05/0x0C/0x0D/0x15/0x1D and 0xA0..=0xFF are an addressing
//! mode byte followed by an operation byte. The mode is decoded into a
//! [`GeneralOperand`] which the operation handler reads and writes through.

use super::opcodes::OPCODES;
use super::Mcu;
use crate::alu::Size;
use crate::bus::McuBus;
use crate::error::ExecResult;
use crate::interrupts::ExceptionSource;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    Direct,
    Indirect,
    Absolute,
    Immediate,
}

/// Decoded operand for one general-form instruction.
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralOperand {
    pub mode: AddrMode,
    pub size: Size,
    /// Register named in the mode byte.
    pub reg: usize,
    /// Effective address, memory modes only.
    pub ea: u16,
    /// Effective page, memory modes only.
    pub ep: u8,
    /// Immediate payload.
    pub data: u16,
    /// The operation byte was preceded by a 0x00 escape.
    pub extended: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Step {
    None,
    PreDecrement,
    PostIncrement,
}

impl GeneralOperand {
    pub const fn is_memory(&self) -> bool {
        matches!(self.mode, AddrMode::Indirect | AddrMode::Absolute)
    }

    pub const fn is_immediate(&self) -> bool {
        matches!(self.mode, AddrMode::Immediate)
    }

    pub const fn is_direct(&self) -> bool {
        matches!(self.mode, AddrMode::Direct)
    }

    const fn address(&self) -> u32 {
        Mcu::get_address(self.ep, self.ea)
    }

    /// Fetch the operand value, zero-extended to `size`.
    pub fn read(&self, mcu: &Mcu, bus: &mut dyn McuBus) -> u32 {
        match self.mode {
            AddrMode::Direct => self.size.truncate(u32::from(mcu.regs.r[self.reg])),
            AddrMode::Indirect | AddrMode::Absolute => match self.size {
                Size::Word => {
                    if self.ea & 1 != 0 {
                        bus.exception(ExceptionSource::AddressError);
                    }
                    u32::from(bus.read16(self.address()))
                }
                Size::Byte => u32::from(bus.read(self.address())),
            },
            AddrMode::Immediate => u32::from(self.data),
        }
    }

    /// Store `data` truncated to `size`. Immediates are not writable.
    pub fn write(&self, mcu: &mut Mcu, bus: &mut dyn McuBus, data: u32) {
        match self.mode {
            AddrMode::Direct => match self.size {
                Size::Word => mcu.regs.r[self.reg] = data as u16,
                Size::Byte => mcu.regs.set_low(self.reg, data as u8),
            },
            AddrMode::Indirect | AddrMode::Absolute => match self.size {
                Size::Word => {
                    if self.ea & 1 != 0 {
                        bus.exception(ExceptionSource::AddressError);
                    }
                    bus.write16(self.address(), data as u16);
                }
                Size::Byte => bus.write(self.address(), data as u8),
            },
            AddrMode::Immediate => bus.exception(ExceptionSource::InvalidInstruction),
        }
    }
}

/// Decode the addressing mode byte `mode_byte`, then dispatch the operation
/// byte through [`OPCODES`].
pub fn general(mcu: &mut Mcu, bus: &mut dyn McuBus, mode_byte: u8) -> ExecResult {
    let size = Size::from_word_bit(mode_byte & 0x08 != 0);
    let reg = (mode_byte & 0x07) as usize;
    let mut mode = AddrMode::Direct;
    let mut disp: u16 = 0;
    let mut step = Step::None;
    let mut data: u16 = 0;
    let mut abs_addr: u16 = 0;
    let mut abs_page: u8 = 0;

    match mode_byte & 0xF0 {
        0xA0 => {}
        0xD0 => mode = AddrMode::Indirect,
        0xE0 => {
            mode = AddrMode::Indirect;
            disp = mcu.read_code_advance(bus) as i8 as u16;
        }
        0xF0 => {
            mode = AddrMode::Indirect;
            disp = mcu.read_code_word(bus);
        }
        0xB0 => {
            mode = AddrMode::Indirect;
            step = Step::PreDecrement;
        }
        0xC0 => {
            mode = AddrMode::Indirect;
            step = Step::PostIncrement;
        }
        0x00 if reg == 5 => {
            mode = AddrMode::Absolute;
            abs_addr = (u16::from(mcu.regs.br) << 8) | u16::from(mcu.read_code_advance(bus));
        }
        0x00 if reg == 4 => {
            mode = AddrMode::Immediate;
            data = match size {
                Size::Word => mcu.read_code_word(bus),
                Size::Byte => u16::from(mcu.read_code_advance(bus)),
            };
        }
        0x10 if reg == 5 => {
            mode = AddrMode::Absolute;
            abs_addr = mcu.read_code_word(bus);
            abs_page = mcu.regs.dp;
        }
        // Remaining 0x0x/0x1x combinations decode as register direct.
        _ => {}
    }

    let (ea, ep) = match mode {
        AddrMode::Indirect => {
            let delta = if size.is_word() || reg == 7 { 2 } else { 1 };
            if step == Step::PreDecrement {
                mcu.regs.r[reg] = mcu.regs.r[reg].wrapping_sub(delta);
            }
            let ea = mcu.regs.r[reg].wrapping_add(disp);
            if step == Step::PostIncrement {
                mcu.regs.r[reg] = mcu.regs.r[reg].wrapping_add(delta);
            }
            (ea, mcu.page_for_register(reg))
        }
        AddrMode::Absolute => (abs_addr, abs_page),
        AddrMode::Direct | AddrMode::Immediate => (0, 0),
    };

    let mut op = mcu.read_code_advance(bus);
    let extended = op == 0x00;
    if extended {
        op = mcu.read_code_advance(bus);
    }
    let index = op >> 3;
    let sub_reg = op & 0x07;

    let operand = GeneralOperand {
        mode,
        size,
        reg,
        ea,
        ep,
        data,
        extended,
    };
    let entry = OPCODES[index as usize];
    trace!("  {} {:?}", entry.mnemonic, operand);
    (entry.exec)(mcu, bus, &operand, index, sub_reg)
}
