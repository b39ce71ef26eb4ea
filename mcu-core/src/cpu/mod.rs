use crate::alu::{self, AluFlags, Size};
use crate::bus::McuBus;
use crate::config::McuConfig;
use crate::error::{ExecResult, Trap};
use crate::interrupts::ExceptionSource;
use tracing::{debug, instrument, trace, warn};

pub mod opcodes;
mod operand;
mod registers;

pub use opcodes::{OPCODES, OPERANDS};
pub use operand::{AddrMode, GeneralOperand};
pub use registers::{Registers, Status};

/// Processor core: register file plus the two control latches the host
/// scheduler looks at between instructions.
#[derive(Debug, Clone)]
pub struct Mcu {
    pub regs: Registers,
    /// Set by SLEEP; the host resumes execution on the next interrupt.
    pub sleep: bool,
    /// Skip the interrupt check once after an instruction that changed SR.
    pub ex_ignore: bool,
    config: McuConfig,
}

impl Default for Mcu {
    fn default() -> Self {
        Self::new(McuConfig::default())
    }
}

impl Mcu {
    #[instrument(level = "debug")]
    pub fn new(config: McuConfig) -> Self {
        debug!("Initializing MCU");
        Self {
            regs: Registers::default(),
            sleep: false,
            ex_ignore: false,
            config,
        }
    }

    pub const fn config(&self) -> McuConfig {
        self.config
    }

    /// Fetch and execute one instruction.
    pub fn step(&mut self, bus: &mut dyn McuBus) -> ExecResult {
        let pc = self.regs.pc;
        let cp = self.regs.cp;
        let operand = self.read_code_advance(bus);
        let entry = OPERANDS[operand as usize];
        trace!(
            "{:02X}:{:04X} {:02X} {}",
            cp,
            pc,
            operand,
            entry.mnemonic
        );

        let result = (entry.exec)(self, bus, operand);
        if let Err(trap) = &result {
            warn!("Trap at {:02X}:{:04X}: {}", cp, pc, trap);
            bus.error_trap(trap);
        }

        #[cfg(feature = "trace-exec")]
        trace!(
            "r={:04X?} sr={:04X} br={:02X} dp={:02X} ep={:02X} tp={:02X}",
            self.regs.r,
            self.regs.sr.bits(),
            self.regs.br,
            self.regs.dp,
            self.regs.ep,
            self.regs.tp
        );

        result
    }

    /// Consume the interrupt-suppression latch.
    pub fn take_ex_ignore(&mut self) -> bool {
        std::mem::take(&mut self.ex_ignore)
    }

    pub const fn get_address(page: u8, offset: u16) -> u32 {
        ((page as u32) << 16) | offset as u32
    }

    /// Fetch the byte at `cp:pc` and advance `pc`.
    pub fn read_code_advance(&mut self, bus: &mut dyn McuBus) -> u8 {
        let byte = bus.read(Self::get_address(self.regs.cp, self.regs.pc));
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    /// Fetch a big-endian 16-bit instruction operand.
    pub fn read_code_word(&mut self, bus: &mut dyn McuBus) -> u16 {
        let hi = u16::from(self.read_code_advance(bus));
        let lo = u16::from(self.read_code_advance(bus));
        (hi << 8) | lo
    }

    /// Page register used for indirect accesses through `r[reg]`.
    pub const fn page_for_register(&self, reg: usize) -> u8 {
        match reg {
            0..=3 => self.regs.dp,
            4 | 5 => self.regs.ep,
            _ => self.regs.tp,
        }
    }

    pub fn push_stack(&mut self, bus: &mut dyn McuBus, data: u16) {
        if self.regs.sp() & 1 != 0 {
            bus.exception(ExceptionSource::AddressError);
        }
        let sp = self.regs.sp().wrapping_sub(2);
        self.regs.set_sp(sp);
        bus.write16(Self::get_address(0, sp), data);
    }

    pub fn pop_stack(&mut self, bus: &mut dyn McuBus) -> u16 {
        if self.regs.sp() & 1 != 0 {
            bus.exception(ExceptionSource::AddressError);
        }
        let sp = self.regs.sp();
        let data = bus.read16(Self::get_address(0, sp));
        self.regs.set_sp(sp.wrapping_add(2));
        data
    }

    /// Replace SR, dropping bits that do not exist.
    pub fn set_sr(&mut self, value: u16) {
        self.regs.sr = Status::from_bits_retain(value & McuConfig::STATUS_MASK);
    }

    pub fn set_status(&mut self, flag: Status, on: bool) {
        self.regs.sr.set(flag, on);
    }

    pub const fn flag(&self, flag: Status) -> bool {
        self.regs.sr.contains(flag)
    }

    fn apply_flags(&mut self, flags: AluFlags) {
        self.set_status(Status::N, flags.n);
        self.set_status(Status::Z, flags.z);
        self.set_status(Status::C, flags.c);
        self.set_status(Status::V, flags.v);
    }

    /// N and Z from `value` truncated to `size`, V cleared, C untouched.
    pub fn set_status_common(&mut self, value: u32, size: Size) {
        let value = size.truncate(value);
        self.set_status(Status::N, value & size.sign_bit() != 0);
        self.set_status(Status::Z, value == 0);
        self.set_status(Status::V, false);
    }

    /// Add with flags; returns the truncated result.
    pub fn add_common(&mut self, a: u32, b: u32, carry: bool, size: Size) -> u32 {
        let (result, flags) = alu::add(a, b, carry, size);
        self.apply_flags(flags);
        result
    }

    /// Subtract with flags; returns the truncated result.
    pub fn sub_common(&mut self, a: u32, b: u32, carry: bool, size: Size) -> u32 {
        let (result, flags) = alu::sub(a, b, carry, size);
        self.apply_flags(flags);
        result
    }

    pub fn control_register_read(&self, index: u8, size: Size) -> Result<u32, Trap> {
        let r = &self.regs;
        let page_word = |page: u8| u32::from(page) * 0x0101;
        let value = match (size, index) {
            (Size::Word, 0) => u32::from(r.sr.bits() & McuConfig::STATUS_MASK),
            (Size::Word, 3) => page_word(r.br),
            (Size::Word, 4) => page_word(r.ep),
            (Size::Word, 5) => page_word(r.dp),
            (Size::Byte, 1) => u32::from(r.sr.bits() & McuConfig::STATUS_MASK & 0xFF),
            (Size::Byte, 3) => u32::from(r.br),
            (Size::Byte, 4) => u32::from(r.ep),
            (Size::Byte, 5) => u32::from(r.dp),
            (Size::Byte, 7) => u32::from(r.tp),
            _ => return Err(Trap::ControlRegister { index, size }),
        };
        Ok(value)
    }

    pub fn control_register_write(&mut self, index: u8, size: Size, data: u32) -> ExecResult {
        let low = data as u8;
        match (size, index) {
            (Size::Word, 0) => self.set_sr(data as u16),
            (Size::Byte, 1) => self.set_sr((self.regs.sr.bits() & 0xFF00) | u16::from(low)),
            (_, 3) => self.regs.br = low,
            (_, 4) => self.regs.ep = low,
            (_, 5) => self.regs.dp = low,
            (Size::Byte, 7) => self.regs.tp = low,
            _ => return Err(Trap::ControlRegister { index, size }),
        }
        Ok(())
    }
}
