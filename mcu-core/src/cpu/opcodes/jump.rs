//! Branches, calls, returns and the other single-byte control instructions.

use crate::bus::McuBus;
use crate::cpu::{Mcu, Status};
use crate::error::{ExecResult, Trap};

/// Bcc condition names indexed by the low nibble of the opcode.
pub const CONDITIONS: [&str; 16] = [
    "BRA", "BRN", "BHI", "BLS", "BCC", "BCS", "BNE", "BEQ", "BVC", "BVS", "BPL", "BMI", "BGE",
    "BLT", "BGT", "BLE",
];

/// Evaluate branch condition `cond` (0..=15) against SR.
pub const fn condition_met(sr: Status, cond: u8) -> bool {
    let n = sr.contains(Status::N);
    let z = sr.contains(Status::Z);
    let c = sr.contains(Status::C);
    let v = sr.contains(Status::V);
    match cond & 0x0F {
        0x0 => true,
        0x1 => false,
        0x2 => !(c || z),
        0x3 => c || z,
        0x4 => !c,
        0x5 => c,
        0x6 => !z,
        0x7 => z,
        0x8 => !v,
        0x9 => v,
        0xA => !n,
        0xB => n,
        0xC => n == v,
        0xD => n != v,
        0xE => !(z || n != v),
        _ => z || n != v,
    }
}

fn read_disp8(mcu: &mut Mcu, bus: &mut dyn McuBus) -> u16 {
    mcu.read_code_advance(bus) as i8 as u16
}

fn branch(mcu: &mut Mcu, disp: u16) {
    mcu.regs.pc = mcu.regs.pc.wrapping_add(disp);
}

pub fn nop(_mcu: &mut Mcu, _bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    Ok(())
}

pub fn sleep(mcu: &mut Mcu, _bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    mcu.sleep = true;
    Ok(())
}

/// Bcc d8 (0x20..=0x2F) / Bcc d16 (0x30..=0x3F).
pub fn bcc(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let disp = if opcode & 0x10 != 0 {
        mcu.read_code_word(bus)
    } else {
        read_disp8(mcu, bus)
    };
    if condition_met(mcu.regs.sr, opcode) {
        branch(mcu, disp);
    }
    Ok(())
}

/// BSR d8 (0x0E) / BSR d16 (0x1E).
pub fn bsr(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let disp = if opcode == 0x0E {
        read_disp8(mcu, bus)
    } else {
        mcu.read_code_word(bus)
    };
    let pc = mcu.regs.pc;
    mcu.push_stack(bus, pc);
    branch(mcu, disp);
    Ok(())
}

/// JSR @aa:16.
pub fn jsr(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let addr = mcu.read_code_word(bus);
    let pc = mcu.regs.pc;
    mcu.push_stack(bus, pc);
    mcu.regs.pc = addr;
    Ok(())
}

pub fn rts(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    mcu.regs.pc = mcu.pop_stack(bus);
    Ok(())
}

/// PJSR @aa:24: pushes PC then CP.
pub fn pjsr(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let page = mcu.read_code_advance(bus);
    let addr = mcu.read_code_word(bus);
    let (pc, cp) = (mcu.regs.pc, mcu.regs.cp);
    mcu.push_stack(bus, pc);
    mcu.push_stack(bus, u16::from(cp));
    mcu.regs.cp = page;
    mcu.regs.pc = addr;
    Ok(())
}

/// PJMP @aa:24.
pub fn pjmp(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let page = mcu.read_code_advance(bus);
    let addr = mcu.read_code_word(bus);
    mcu.regs.cp = page;
    mcu.regs.pc = addr;
    Ok(())
}

/// RTE: pops SR, CP and PC, then lets the next instruction run before any
/// interrupt is taken.
pub fn rte(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let sr = mcu.pop_stack(bus);
    mcu.set_sr(sr);
    mcu.regs.cp = mcu.pop_stack(bus) as u8;
    mcu.regs.pc = mcu.pop_stack(bus);
    mcu.ex_ignore = true;
    Ok(())
}

/// RTD #imm8: return, then drop `imm` bytes of arguments.
pub fn rtd(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let imm = read_disp8(mcu, bus);
    mcu.regs.pc = mcu.pop_stack(bus);

    match opcode {
        0x14 => {
            let sp = mcu.regs.sp().wrapping_add(imm);
            mcu.regs.set_sp(sp);
            if sp & 1 != 0 {
                return Err(Trap::MisalignedStack { sp });
            }
            Ok(())
        }
        // The word-immediate form has no known encoding.
        _ => Err(Trap::Unimplemented { opcode }),
    }
}

/// LDM: pop the listed registers, lowest first. A popped r7 is discarded.
pub fn ldm(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let list = mcu.read_code_advance(bus);
    for i in 0..8 {
        if list & (1 << i) != 0 {
            let data = mcu.pop_stack(bus);
            if i != 7 {
                mcu.regs.r[i] = data;
            }
        }
    }
    Ok(())
}

/// STM: push the listed registers, highest first. r7 is pushed as it was
/// before its own slot was allocated.
pub fn stm(mcu: &mut Mcu, bus: &mut dyn McuBus, _opcode: u8) -> ExecResult {
    let list = mcu.read_code_advance(bus);
    for i in (0..8).rev() {
        if list & (1 << i) != 0 {
            let mut data = mcu.regs.r[i];
            if i == 7 {
                data = data.wrapping_sub(2);
            }
            mcu.push_stack(bus, data);
        }
    }
    Ok(())
}

/// TRAPA #vec: secondary byte 0x10..=0x1F.
pub fn trapa(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let secondary = mcu.read_code_advance(bus);
    if secondary & 0xF0 != 0x10 {
        return Err(Trap::InvalidSecondary { opcode, secondary });
    }
    bus.trapa(secondary & 0x0F);
    Ok(())
}

/// SCB/F, SCB/EQ, SCB/NE: decrement `r[n]` and loop until it wraps to -1.
///
/// `gate` decides from SR whether the loop step runs at all.
fn scb(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8, gate: fn(Status) -> bool) -> ExecResult {
    let secondary = mcu.read_code_advance(bus);
    if secondary >> 3 != 0x17 {
        return Err(Trap::InvalidSecondary { opcode, secondary });
    }
    let reg = (secondary & 0x07) as usize;
    let disp = read_disp8(mcu, bus);
    if gate(mcu.regs.sr) {
        let count = mcu.regs.r[reg].wrapping_sub(1);
        mcu.regs.r[reg] = count;
        if count != 0xFFFF {
            branch(mcu, disp);
        }
    }
    Ok(())
}

/// Register-indirect group behind 0x11: PRTS, PJSR @Rn, JMP @Rn, JSR @Rn.
fn indirect_group(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    let secondary = mcu.read_code_advance(bus);
    let reg = (secondary & 0x07) as usize;
    if secondary == 0x19 {
        // PRTS
        mcu.regs.cp = mcu.pop_stack(bus) as u8;
        mcu.regs.pc = mcu.pop_stack(bus);
        return Ok(());
    }
    match secondary >> 3 {
        // PJSR @Rn: page in the even register, offset in the odd one.
        0x19 => {
            let (pc, cp) = (mcu.regs.pc, mcu.regs.cp);
            mcu.push_stack(bus, pc);
            mcu.push_stack(bus, u16::from(cp));
            let pair = reg & !1;
            mcu.regs.cp = mcu.regs.r[pair] as u8;
            mcu.regs.pc = mcu.regs.r[pair + 1];
        }
        // JMP @Rn
        0x1A => mcu.regs.pc = mcu.regs.r[reg],
        // JSR @Rn
        0x1B => {
            let pc = mcu.regs.pc;
            mcu.push_stack(bus, pc);
            mcu.regs.pc = mcu.regs.r[reg];
        }
        _ => return Err(Trap::InvalidSecondary { opcode, secondary }),
    }
    Ok(())
}

/// Opcodes 0x01, 0x06, 0x07, 0x10 and 0x11.
pub fn jmp_group(mcu: &mut Mcu, bus: &mut dyn McuBus, opcode: u8) -> ExecResult {
    match opcode {
        0x11 => indirect_group(mcu, bus, opcode),
        0x01 => scb(mcu, bus, opcode, |_| true),
        0x06 => scb(mcu, bus, opcode, |sr| sr.contains(Status::Z)),
        0x07 => scb(mcu, bus, opcode, |sr| !sr.contains(Status::Z)),
        0x10 => {
            mcu.regs.pc = mcu.read_code_word(bus);
            Ok(())
        }
        _ => Err(Trap::Unimplemented { opcode }),
    }
}
