use crate::error::Trap;

/// Peripheral interrupt lines the timers can drive.
///
/// FRT sources carry their channel number (0..=2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptSource {
    FrtCompareA(u8),
    FrtCompareB(u8),
    FrtOverflow(u8),
    TimerCompareA,
    TimerCompareB,
    TimerOverflow,
}

impl InterruptSource {
    /// Line number in the interrupt controller's request table.
    ///
    /// NMI and IRQ0/IRQ1 occupy 0..=2, each FRT channel owns four lines
    /// starting at `3 + 4 * channel` (capture, compare A, compare B,
    /// overflow) and the 8-bit timer follows at 15.
    pub const fn line(self) -> u8 {
        match self {
            Self::FrtCompareA(ch) => 3 + 4 * ch + 1,
            Self::FrtCompareB(ch) => 3 + 4 * ch + 2,
            Self::FrtOverflow(ch) => 3 + 4 * ch + 3,
            Self::TimerCompareA => 15,
            Self::TimerCompareB => 16,
            Self::TimerOverflow => 17,
        }
    }
}

/// Synchronous exceptions raised while an instruction keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionSource {
    AddressError,
    InvalidInstruction,
}

/// Host interrupt controller.
pub trait InterruptController {
    /// Assert or de-assert a peripheral interrupt line.
    fn set_request(&mut self, source: InterruptSource, asserted: bool);

    /// Software trap raised by TRAPA with vector 0..=15.
    fn trapa(&mut self, vector: u8);

    fn exception(&mut self, source: ExceptionSource);

    /// The processor hit an invalid instruction.
    fn error_trap(&mut self, trap: &Trap);
}

/// Request bookkeeping for hosts that only need line state.
///
/// Timers re-assert a pending line on every prescaled step, so besides the
/// current level this counts rising edges per line.
#[derive(Debug, Default, Clone)]
pub struct InterruptLines {
    asserted: u32,
    edges: [u32; 32],
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: InterruptSource, asserted: bool) {
        let bit = 1u32 << source.line();
        if asserted {
            if self.asserted & bit == 0 {
                self.edges[source.line() as usize] += 1;
            }
            self.asserted |= bit;
        } else {
            self.asserted &= !bit;
        }
    }

    pub const fn is_asserted(&self, source: InterruptSource) -> bool {
        self.asserted & (1 << source.line()) != 0
    }

    /// Number of times the line went from low to high.
    pub const fn rising_edges(&self, source: InterruptSource) -> u32 {
        self.edges[source.line() as usize]
    }

    /// Bitmask of asserted lines, bit `n` for line `n`.
    pub const fn pending(&self) -> u32 {
        self.asserted
    }
}

impl InterruptController for InterruptLines {
    fn set_request(&mut self, source: InterruptSource, asserted: bool) {
        self.set(source, asserted);
    }

    fn trapa(&mut self, _vector: u8) {}

    fn exception(&mut self, _source: ExceptionSource) {}

    fn error_trap(&mut self, _trap: &Trap) {}
}

#[cfg(test)]
mod tests;
