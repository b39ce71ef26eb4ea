//! Board configuration shared by the processor and its peripherals.

/// Hardware revision of the sound module.
///
/// The instruction set is identical on every revision; only the timer
/// prescaler wiring differs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    #[default]
    Generic,
    Mk1,
}

/// Static configuration for one emulated chip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct McuConfig {
    pub revision: Revision,
}

impl McuConfig {
    /// Status register bits that exist in silicon (T, I2..I0, N, Z, V, C).
    pub const STATUS_MASK: u16 = 0x870F;

    pub const fn new(revision: Revision) -> Self {
        Self { revision }
    }
}
