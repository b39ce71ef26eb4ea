pub mod alu;
pub mod bus;
pub mod config;
pub mod cpu;
pub mod error;
pub mod interrupts;
pub mod timer;

#[cfg(test)]
mod test_harness;

// Re-export common types
pub use alu::Size;
pub use bus::McuBus;
pub use config::{McuConfig, Revision};
pub use cpu::{Mcu, Registers, Status};
pub use error::{ExecResult, Trap};
pub use interrupts::{ExceptionSource, InterruptController, InterruptLines, InterruptSource};
pub use timer::Timer;
