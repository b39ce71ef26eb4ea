use bitflags::bitflags;

bitflags! {
    /// Status register (SR). The low byte is the condition code register.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u16 {
        const C = 0x0001;
        const V = 0x0002;
        const Z = 0x0004;
        const N = 0x0008;
        const I = 0x0700;
        const T = 0x8000;
    }
}

impl Status {
    /// Interrupt mask level 0..=7.
    pub const fn interrupt_mask(self) -> u8 {
        ((self.bits() & Self::I.bits()) >> 8) as u8
    }
}

/// Architectural register file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    /// General registers. r6 doubles as frame pointer, r7 as stack pointer.
    pub r: [u16; 8],
    pub pc: u16,
    /// Code page, the top 8 bits of the fetch address.
    pub cp: u8,
    pub sr: Status,
    /// Base register for `@aa:8` short absolute addressing.
    pub br: u8,
    pub dp: u8,
    pub ep: u8,
    pub tp: u8,
}

impl Registers {
    pub const fn sp(&self) -> u16 {
        self.r[7]
    }

    pub fn set_sp(&mut self, val: u16) {
        self.r[7] = val;
    }

    /// Replace the low byte of `r[reg]`, keeping the high byte.
    pub fn set_low(&mut self, reg: usize, val: u8) {
        self.r[reg] = (self.r[reg] & 0xFF00) | u16::from(val);
    }
}
