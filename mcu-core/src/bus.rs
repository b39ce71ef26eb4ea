use crate::interrupts::InterruptController;

/// Memory and interrupt access the processor needs from its host.
///
/// Addresses are 24 bits wide: `(page << 16) | offset`.
pub trait McuBus: InterruptController {
    fn read(&mut self, addr: u32) -> u8;
    fn write(&mut self, addr: u32, value: u8);

    /// Read a 16-bit value in big-endian format. The low address bit is ignored.
    fn read16(&mut self, addr: u32) -> u16 {
        let addr = addr & !1;
        let hi = u16::from(self.read(addr));
        let lo = u16::from(self.read(addr + 1));
        (hi << 8) | lo
    }

    /// Write a 16-bit value in big-endian format. The low address bit is ignored.
    fn write16(&mut self, addr: u32, value: u16) {
        let addr = addr & !1;
        self.write(addr, (value >> 8) as u8);
        self.write(addr + 1, value as u8);
    }
}
