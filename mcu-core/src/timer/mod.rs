//! # Timer Module
//!
//! The chip carries two timer blocks clocked from the same internal cycle
//! counter:
//!
//! - FRT0..FRT2 at 0x10..0x3F: 16-bit free-running counters with two output
//!   compare registers each. Registers:
//!   - TCR (+0): interrupt enables, clock select in bits 1-0
//!   - TCSR (+1): overflow/compare flags in bits 6-4, clear-on-A in bit 0
//!   - FRC (+2/+3), OCRA (+4/+5), OCRB (+6/+7), ICR (+8/+9)
//! - TMR at 0x50..0x54: an 8-bit counter with two compare registers
//!   (TCR, TCSR, TCORA, TCORB, TCNT).
//!
//! 16-bit FRT registers go through a single latch shared by all channels:
//! writing the high byte stores it in the latch and writing the low byte
//! commits both halves, reading the high byte loads the low byte into the
//! latch for the following low-byte read.
//!
//! The prescaler wiring differs on MK1 boards, so the timer copies the
//! processor's hardware revision when it is initialised.
use crate::config::Revision;
use crate::cpu::Mcu;
use crate::interrupts::InterruptController;
use tracing::{debug, instrument};

pub mod frt;
pub mod tmr;

pub use frt::{FreeRunningTimer, FrtControl, FrtStatus};
pub use tmr::{CompareTimer, TmrControl, TmrStatus, TMR_TCNT, TMR_TCORA, TMR_TCORB, TMR_TCR, TMR_TCSR};

use frt::{
    FRT_STEP_GENERIC, FRT_STEP_MK1, REG_FRCH, REG_FRCL, REG_ICRH, REG_ICRL, REG_OCRAH, REG_OCRAL,
    REG_OCRBH, REG_OCRBL, REG_TCR, REG_TCSR,
};
use tmr::{TMR_STEP_GENERIC, TMR_STEP_MK1};

pub const FRT_CHANNELS: usize = 3;

#[derive(Debug, Default, Clone)]
pub struct Timer {
    pub frt: [FreeRunningTimer; FRT_CHANNELS],
    pub tmr: CompareTimer,
    /// Internal cycles processed so far, at half the processor clock.
    cycles: u64,
    /// High/low byte latch shared by all FRT channels.
    tempreg: u8,
    revision: Revision,
}

/// Split an FRT address into channel and register offset.
fn decode(addr: u32) -> Option<(usize, u32)> {
    let channel = (addr >> 4).checked_sub(1)? as usize;
    (channel < FRT_CHANNELS).then_some((channel, addr & 0x0F))
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the timer to `mcu`'s hardware revision.
    #[instrument(skip_all, level = "debug")]
    pub fn init(&mut self, mcu: &Mcu) {
        self.revision = mcu.config().revision;
        debug!("Timer bound to {:?} prescalers", self.revision);
    }

    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Write an FRT register. Unmapped addresses are ignored.
    pub fn write(&mut self, addr: u32, data: u8, irq: &mut dyn InterruptController) {
        let Some((channel, reg)) = decode(addr) else {
            return;
        };
        debug!("FRT{} write {:02X} = {:02X}", channel, reg, data);
        let latch = u16::from(self.tempreg) << 8;
        let ftimer = &mut self.frt[channel];
        match reg {
            REG_TCR => ftimer.tcr = FrtControl::from_bits_retain(data),
            REG_TCSR => ftimer.write_tcsr(channel as u8, data, irq),
            REG_FRCH | REG_OCRAH | REG_OCRBH | REG_ICRH => self.tempreg = data,
            REG_FRCL => ftimer.frc = latch | u16::from(data),
            REG_OCRAL => ftimer.ocra = latch | u16::from(data),
            REG_OCRBL => ftimer.ocrb = latch | u16::from(data),
            REG_ICRL => ftimer.icr = latch | u16::from(data),
            _ => {}
        }
    }

    /// Read an FRT register. Unmapped addresses read as 0xFF.
    pub fn read(&mut self, addr: u32) -> u8 {
        let Some((channel, reg)) = decode(addr) else {
            return 0xFF;
        };
        let ftimer = &mut self.frt[channel];
        let wide = match reg {
            REG_TCR => return ftimer.tcr.bits(),
            REG_TCSR => return ftimer.read_tcsr(),
            REG_FRCH => ftimer.frc,
            REG_OCRAH => ftimer.ocra,
            REG_OCRBH => ftimer.ocrb,
            REG_ICRH => ftimer.icr,
            REG_FRCL | REG_OCRAL | REG_OCRBL | REG_ICRL => return self.tempreg,
            _ => return 0xFF,
        };
        self.tempreg = wide as u8;
        (wide >> 8) as u8
    }

    pub fn write_tmr(&mut self, addr: u32, data: u8, irq: &mut dyn InterruptController) {
        debug!("TMR write {:02X} = {:02X}", addr, data);
        self.tmr.write(addr, data, irq);
    }

    pub fn read_tmr(&mut self, addr: u32) -> u8 {
        self.tmr.read(addr)
    }

    /// Catch the timers up to processor cycle `cycles`.
    ///
    /// The timers tick at half the processor clock, so every internal cycle
    /// up to `cycles / 2` is run.
    pub fn clock(&mut self, cycles: u64, irq: &mut dyn InterruptController) {
        let (frt_table, tmr_table) = match self.revision {
            Revision::Generic => (&FRT_STEP_GENERIC, &TMR_STEP_GENERIC),
            Revision::Mk1 => (&FRT_STEP_MK1, &TMR_STEP_MK1),
        };

        while self.cycles * 2 < cycles {
            for (channel, ftimer) in self.frt.iter_mut().enumerate() {
                if self.cycles & ftimer.step_mask(frt_table) == 0 {
                    ftimer.step(channel as u8, irq);
                }
            }
            if self.cycles & self.tmr.step_mask(tmr_table) == 0 {
                self.tmr.step(irq);
            }
            self.cycles += 1;
        }
    }
}

#[cfg(test)]
mod tests;
