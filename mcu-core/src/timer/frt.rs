//! 16-bit free-running timer channel (FRT).
//!
//! Each channel counts FRC up from the prescaled clock, compares it against
//! OCRA and OCRB, and can clear on a compare-A match. Status flags latch in
//! TCSR until software reads them as set and then writes a 0.
use crate::interrupts::{InterruptController, InterruptSource};
use bitflags::bitflags;
use tracing::trace;

bitflags! {
    /// FRT timer control register.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct FrtControl: u8 {
        /// Clock select, index into the prescaler table.
        const CKS   = 0x03;
        const OVIE  = 0x10;
        const OCIEA = 0x20;
        const OCIEB = 0x40;
    }
}

bitflags! {
    /// FRT timer control/status register.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct FrtStatus: u8 {
        /// Clear FRC on compare-match A.
        const CCLRA = 0x01;
        /// Software-writable low nibble.
        const WRITABLE = 0x0F;
        const OVF   = 0x10;
        const OCFA  = 0x20;
        const OCFB  = 0x40;
    }
}

/// Register offsets within a channel's 16-byte window.
pub const REG_TCR: u32 = 0x00;
pub const REG_TCSR: u32 = 0x01;
pub const REG_FRCH: u32 = 0x02;
pub const REG_FRCL: u32 = 0x03;
pub const REG_OCRAH: u32 = 0x04;
pub const REG_OCRAL: u32 = 0x05;
pub const REG_OCRBH: u32 = 0x06;
pub const REG_OCRBL: u32 = 0x07;
pub const REG_ICRH: u32 = 0x08;
pub const REG_ICRL: u32 = 0x09;

/// Prescaler masks indexed by `TCR & CKS`. The counter steps on internal
/// cycles where `cycles & mask == 0`.
pub const FRT_STEP_GENERIC: [u64; 4] = [3, 7, 31, 1];
pub const FRT_STEP_MK1: [u64; 4] = [3, 7, 31, 3];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FreeRunningTimer {
    pub tcr: FrtControl,
    pub tcsr: FrtStatus,
    pub frc: u16,
    pub ocra: u16,
    pub ocrb: u16,
    pub icr: u16,
    /// Flags software has seen set through a TCSR read.
    pub status_rd: FrtStatus,
}

impl FreeRunningTimer {
    /// TCSR write: the low nibble is replaced, each status flag is cleared
    /// only by writing 0 after it was read as 1.
    pub fn write_tcsr(&mut self, channel: u8, data: u8, irq: &mut dyn InterruptController) {
        let written = FrtStatus::from_bits_retain(data);
        self.tcsr = (self.tcsr - FrtStatus::WRITABLE) | (written & FrtStatus::WRITABLE);

        let flags = [
            (FrtStatus::OVF, InterruptSource::FrtOverflow(channel)),
            (FrtStatus::OCFA, InterruptSource::FrtCompareA(channel)),
            (FrtStatus::OCFB, InterruptSource::FrtCompareB(channel)),
        ];
        for (flag, source) in flags {
            if !written.contains(flag) && self.status_rd.contains(flag) {
                self.tcsr.remove(flag);
                self.status_rd.remove(flag);
                irq.set_request(source, false);
            }
        }
    }

    /// TCSR read: arms the clear-on-write of every flag currently set.
    pub fn read_tcsr(&mut self) -> u8 {
        let value = self.tcsr;
        self.status_rd |= value & (FrtStatus::OVF | FrtStatus::OCFA | FrtStatus::OCFB);
        value.bits()
    }

    /// One prescaled count.
    ///
    /// Compares use the value before the increment. Enabled flags re-assert
    /// their interrupt on every step until software clears them.
    pub fn step(&mut self, channel: u8, irq: &mut dyn InterruptController) {
        let value = u32::from(self.frc);
        let match_a = self.frc == self.ocra;
        let match_b = self.frc == self.ocrb;
        let next = if self.tcsr.contains(FrtStatus::CCLRA) && match_a {
            0
        } else {
            value + 1
        };
        let overflow = (next >> 16) & 1 != 0;
        self.frc = next as u16;

        if overflow {
            trace!("FRT{} overflow", channel);
            self.tcsr.insert(FrtStatus::OVF);
        }
        if match_a {
            self.tcsr.insert(FrtStatus::OCFA);
        }
        if match_b {
            self.tcsr.insert(FrtStatus::OCFB);
        }

        let enables = [
            (FrtControl::OVIE, FrtStatus::OVF, InterruptSource::FrtOverflow(channel)),
            (FrtControl::OCIEA, FrtStatus::OCFA, InterruptSource::FrtCompareA(channel)),
            (FrtControl::OCIEB, FrtStatus::OCFB, InterruptSource::FrtCompareB(channel)),
        ];
        for (enable, flag, source) in enables {
            if self.tcr.contains(enable) && self.tcsr.contains(flag) {
                irq.set_request(source, true);
            }
        }
    }

    /// Prescaler mask for the current clock select.
    pub const fn step_mask(&self, table: &[u64; 4]) -> u64 {
        table[(self.tcr.bits() & FrtControl::CKS.bits()) as usize]
    }
}
