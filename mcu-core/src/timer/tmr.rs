//! 8-bit compare timer (TMR).
use crate::interrupts::{InterruptController, InterruptSource};
use bitflags::bitflags;
use tracing::trace;

bitflags! {
    /// TMR timer control register.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct TmrControl: u8 {
        const CKS   = 0x07;
        /// Counter clear select: 0x08 clears on match A, 0x10 on match B.
        const CCLR  = 0x18;
        const OVIE  = 0x20;
        const CMIEA = 0x40;
        const CMIEB = 0x80;
    }
}

bitflags! {
    /// TMR timer control/status register.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct TmrStatus: u8 {
        const WRITABLE = 0x0F;
        const OVF  = 0x20;
        const CMFA = 0x40;
        const CMFB = 0x80;
    }
}

/// Peripheral addresses of the TMR registers.
pub const TMR_TCR: u32 = 0x50;
pub const TMR_TCSR: u32 = 0x51;
pub const TMR_TCORA: u32 = 0x52;
pub const TMR_TCORB: u32 = 0x53;
pub const TMR_TCNT: u32 = 0x54;

/// Prescaler masks indexed by `TCR & CKS`. Selects 0 and 4 count every
/// internal cycle.
pub const TMR_STEP_GENERIC: [u64; 8] = [0, 7, 63, 1023, 0, 1, 1, 1];
pub const TMR_STEP_MK1: [u64; 8] = [0, 7, 63, 1023, 0, 3, 3, 3];

const CLEAR_ON_A: u8 = 0x08;
const CLEAR_ON_B: u8 = 0x10;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompareTimer {
    pub tcr: TmrControl,
    pub tcsr: TmrStatus,
    pub tcora: u8,
    pub tcorb: u8,
    pub tcnt: u8,
    pub status_rd: TmrStatus,
}

impl CompareTimer {
    pub fn write(&mut self, addr: u32, data: u8, irq: &mut dyn InterruptController) {
        match addr {
            TMR_TCR => self.tcr = TmrControl::from_bits_retain(data),
            TMR_TCSR => self.write_tcsr(data, irq),
            TMR_TCORA => self.tcora = data,
            TMR_TCORB => self.tcorb = data,
            TMR_TCNT => self.tcnt = data,
            _ => {}
        }
    }

    pub fn read(&mut self, addr: u32) -> u8 {
        match addr {
            TMR_TCR => self.tcr.bits(),
            TMR_TCSR => {
                let value = self.tcsr;
                self.status_rd |= value & (TmrStatus::OVF | TmrStatus::CMFA | TmrStatus::CMFB);
                value.bits()
            }
            TMR_TCORA => self.tcora,
            TMR_TCORB => self.tcorb,
            TMR_TCNT => self.tcnt,
            _ => 0xFF,
        }
    }

    fn write_tcsr(&mut self, data: u8, irq: &mut dyn InterruptController) {
        let written = TmrStatus::from_bits_retain(data);
        self.tcsr = (self.tcsr - TmrStatus::WRITABLE) | (written & TmrStatus::WRITABLE);

        let flags = [
            (TmrStatus::OVF, InterruptSource::TimerOverflow),
            (TmrStatus::CMFA, InterruptSource::TimerCompareA),
            (TmrStatus::CMFB, InterruptSource::TimerCompareB),
        ];
        for (flag, source) in flags {
            if !written.contains(flag) && self.status_rd.contains(flag) {
                self.tcsr.remove(flag);
                self.status_rd.remove(flag);
                irq.set_request(source, false);
            }
        }
    }

    pub fn step(&mut self, irq: &mut dyn InterruptController) {
        let value = u32::from(self.tcnt);
        let match_a = self.tcnt == self.tcora;
        let match_b = self.tcnt == self.tcorb;
        let clear = self.tcr.bits() & TmrControl::CCLR.bits();
        let next = if (clear == CLEAR_ON_A && match_a) || (clear == CLEAR_ON_B && match_b) {
            0
        } else {
            value + 1
        };
        let overflow = (next >> 8) & 1 != 0;
        self.tcnt = next as u8;

        if overflow {
            trace!("TMR overflow");
            self.tcsr.insert(TmrStatus::OVF);
        }
        if match_a {
            self.tcsr.insert(TmrStatus::CMFA);
        }
        if match_b {
            self.tcsr.insert(TmrStatus::CMFB);
        }

        let enables = [
            (TmrControl::OVIE, TmrStatus::OVF, InterruptSource::TimerOverflow),
            (TmrControl::CMIEA, TmrStatus::CMFA, InterruptSource::TimerCompareA),
            (TmrControl::CMIEB, TmrStatus::CMFB, InterruptSource::TimerCompareB),
        ];
        for (enable, flag, source) in enables {
            if self.tcr.contains(enable) && self.tcsr.contains(flag) {
                irq.set_request(source, true);
            }
        }
    }

    pub const fn step_mask(&self, table: &[u64; 8]) -> u64 {
        table[(self.tcr.bits() & TmrControl::CKS.bits()) as usize]
    }
}
