//! Opcode dispatch tables.
//!
//! [`OPERANDS`] is indexed by the first instruction byte. General-form
//! entries decode an addressing mode and then index [`OPCODES`] with the top
//! five bits of the operation byte.
use once_cell::sync::Lazy;

pub mod alu;
pub mod bits;
pub mod jump;
pub mod load_store;
pub mod types;

pub use types::*;

use super::operand::general;

/// The first-byte table (0x00..=0xFF).
pub static OPERANDS: Lazy<[OperandEntry; 256]> = Lazy::new(|| {
    let mut table = [OperandEntry {
        mnemonic: "UNIMPL",
        exec: operand_not_implemented,
    }; 256];

    let mut set = |opcode: usize, mnemonic: &'static str, exec: OperandFn| {
        table[opcode] = OperandEntry { mnemonic, exec };
    };

    set(0x00, "NOP", jump::nop);
    set(0x01, "SCB/F", jump::jmp_group);
    set(0x02, "LDM", jump::ldm);
    set(0x03, "PJSR", jump::pjsr);
    set(0x06, "SCB/EQ", jump::jmp_group);
    set(0x07, "SCB/NE", jump::jmp_group);
    set(0x08, "TRAPA", jump::trapa);
    set(0x0A, "RTE", jump::rte);
    set(0x0E, "BSR", jump::bsr);
    set(0x10, "JMP", jump::jmp_group);
    set(0x11, "JMP/JSR @Rn", jump::jmp_group);
    set(0x12, "STM", jump::stm);
    set(0x13, "PJMP", jump::pjmp);
    set(0x14, "RTD", jump::rtd);
    set(0x18, "JSR", jump::jsr);
    set(0x19, "RTS", jump::rts);
    set(0x1A, "SLEEP", jump::sleep);
    set(0x1C, "RTD", jump::rtd);
    set(0x1E, "BSR", jump::bsr);

    for opcode in [0x04, 0x05, 0x0C, 0x0D, 0x15, 0x1D] {
        set(opcode, "GENERAL", general);
    }
    for opcode in 0xA0..=0xFF {
        set(opcode, "GENERAL", general);
    }
    for (cond, &name) in jump::CONDITIONS.iter().enumerate() {
        set(0x20 + cond, name, jump::bcc);
        set(0x30 + cond, name, jump::bcc);
    }
    for opcode in 0x40..=0x4F {
        set(opcode, "CMP", alu::short_cmp);
    }
    for opcode in 0x50..=0x57 {
        set(opcode, "MOV:E", load_store::short_mov_e);
    }
    for opcode in 0x58..=0x5F {
        set(opcode, "MOV:I", load_store::short_mov_i);
    }
    for opcode in 0x60..=0x6F {
        set(opcode, "MOV:L", load_store::short_mov_l);
    }
    for opcode in 0x70..=0x7F {
        set(opcode, "MOV:S", load_store::short_mov_s);
    }
    for opcode in 0x80..=0x9F {
        set(opcode, "MOV:F", load_store::short_mov_f);
    }

    table
});

/// The general-form operation table (index 0x00..=0x1F).
pub static OPCODES: Lazy<[OpcodeEntry; 32]> = Lazy::new(|| {
    let entry = |mnemonic: &'static str, exec: OpcodeFn| OpcodeEntry { mnemonic, exec };
    [
        entry("MOV:G/CMP:G #imm", load_store::movg_immediate), // 00
        entry("ADDQ", alu::addq),                              // 01
        entry("CLR/TST/EXT/SWAP/NOT/NEG", alu::clr_group),     // 02
        entry("SHIFT/ROTATE", alu::shift_group),               // 03
        entry("ADD", alu::add),                                // 04
        entry("ADDS", alu::adds),                              // 05
        entry("SUB", alu::sub),                                // 06
        entry("SUBS", alu::subs),                              // 07
        entry("OR", alu::or),                                  // 08
        entry("BSET/ORC", bits::bset_orc),                     // 09
        entry("AND", alu::and),                                // 0A
        entry("BCLR/ANDC", bits::bclr_andc),                   // 0B
        entry("XOR", alu::xor),                                // 0C
        entry("UNIMPL", opcode_not_implemented),               // 0D
        entry("CMP", alu::cmp),                                // 0E
        entry("BTST", bits::btst),                             // 0F
        entry("MOV:G", load_store::movg),                      // 10
        entry("LDC", load_store::ldc),                         // 11
        entry("MOV:G/XCH", load_store::movg),                  // 12
        entry("STC", load_store::stc),                         // 13
        entry("ADDX", alu::addx),                              // 14
        entry("MULXU", alu::mulxu),                            // 15
        entry("SUBX", alu::subx),                              // 16
        entry("DIVXU", alu::divxu),                            // 17
        entry("BSET", bits::bset_imm),                         // 18
        entry("BSET", bits::bset_imm),                         // 19
        entry("BCLR", bits::bclr_imm),                         // 1A
        entry("BCLR", bits::bclr_imm),                         // 1B
        entry("BNOT", bits::bnot_imm),                         // 1C
        entry("BNOT", bits::bnot_imm),                         // 1D
        entry("BTST", bits::btst_imm),                         // 1E
        entry("BTST", bits::btst_imm),                         // 1F
    ]
});
