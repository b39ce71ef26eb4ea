//! In-crate test bus: sparse memory plus a record of every interrupt call.
use crate::bus::McuBus;
use crate::cpu::Mcu;
use crate::error::{ExecResult, Trap};
use crate::interrupts::{ExceptionSource, InterruptController, InterruptLines, InterruptSource};
use std::collections::HashMap;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test writer, once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Default)]
pub struct TestBus {
    /// Unwritten addresses read as zero.
    pub memory: HashMap<u32, u8>,
    pub lines: InterruptLines,
    /// Every `set_request` call in order.
    pub requests: Vec<(InterruptSource, bool)>,
    pub exceptions: Vec<ExceptionSource>,
    pub trapa: Vec<u8>,
    pub traps: Vec<Trap>,
}

impl TestBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with `program` placed at 0:0000.
    pub fn with_program(program: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.load(0, program);
        bus
    }

    pub fn load(&mut self, addr: u32, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.memory.insert(addr + offset as u32, byte);
        }
    }

    pub fn peek(&self, addr: u32) -> u8 {
        self.memory.get(&addr).copied().unwrap_or(0)
    }

    pub fn peek16(&self, addr: u32) -> u16 {
        (u16::from(self.peek(addr)) << 8) | u16::from(self.peek(addr + 1))
    }
}

impl InterruptController for TestBus {
    fn set_request(&mut self, source: InterruptSource, asserted: bool) {
        self.requests.push((source, asserted));
        self.lines.set(source, asserted);
    }

    fn trapa(&mut self, vector: u8) {
        self.trapa.push(vector);
    }

    fn exception(&mut self, source: ExceptionSource) {
        self.exceptions.push(source);
    }

    fn error_trap(&mut self, trap: &Trap) {
        self.traps.push(*trap);
    }
}

impl McuBus for TestBus {
    fn read(&mut self, addr: u32) -> u8 {
        self.peek(addr)
    }

    fn write(&mut self, addr: u32, value: u8) {
        self.memory.insert(addr, value);
    }
}

/// A processor and bus with `program` at address 0, stack at 0xFF00.
pub fn setup(program: &[u8]) -> (Mcu, TestBus) {
    init_tracing();
    let mut mcu = Mcu::default();
    mcu.regs.set_sp(0xFF00);
    (mcu, TestBus::with_program(program))
}

/// Run `count` instructions, stopping at the first trap.
pub fn run(mcu: &mut Mcu, bus: &mut TestBus, count: usize) -> ExecResult {
    for _ in 0..count {
        mcu.step(bus)?;
    }
    Ok(())
}
