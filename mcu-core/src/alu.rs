//! Flag-producing add and subtract.
//!
//! Nearly every arithmetic opcode funnels through [`add`] or [`sub`]. Both
//! work on operands of a declared width and report the four condition codes
//! the branch instructions consume.

/// Operand width selected by bit 3 of an addressing-mode or opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
}

impl Size {
    pub const fn from_word_bit(word: bool) -> Self {
        if word {
            Self::Word
        } else {
            Self::Byte
        }
    }

    pub const fn is_word(self) -> bool {
        matches!(self, Self::Word)
    }

    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Word => 16,
        }
    }

    pub const fn mask(self) -> u32 {
        match self {
            Self::Byte => 0xFF,
            Self::Word => 0xFFFF,
        }
    }

    pub const fn sign_bit(self) -> u32 {
        match self {
            Self::Byte => 0x80,
            Self::Word => 0x8000,
        }
    }

    pub const fn truncate(self, value: u32) -> u32 {
        value & self.mask()
    }

    /// Interpret the low `bits()` of `value` as a two's complement number.
    pub const fn sign_extend(self, value: u32) -> i32 {
        match self {
            Self::Byte => value as u8 as i8 as i32,
            Self::Word => value as u16 as i16 as i32,
        }
    }

    const fn signed_range(self) -> (i32, i32) {
        match self {
            Self::Byte => (i8::MIN as i32, i8::MAX as i32),
            Self::Word => (i16::MIN as i32, i16::MAX as i32),
        }
    }
}

/// Condition codes produced by one ALU operation.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AluFlags {
    pub n: bool,
    pub z: bool,
    pub c: bool,
    pub v: bool,
}

const fn finish(wide: u32, signed: i32, size: Size) -> (u32, AluFlags) {
    let result = size.truncate(wide);
    let (min, max) = size.signed_range();
    let flags = AluFlags {
        n: result & size.sign_bit() != 0,
        z: result == 0,
        c: (wide >> size.bits()) & 1 != 0,
        v: signed < min || signed > max,
    };
    (result, flags)
}

/// `a + b + carry` at `size` width.
pub const fn add(a: u32, b: u32, carry: bool, size: Size) -> (u32, AluFlags) {
    let c = carry as u32;
    let wide = size
        .truncate(a)
        .wrapping_add(size.truncate(b))
        .wrapping_add(c);
    let signed = size.sign_extend(a) + size.sign_extend(b) + c as i32;
    finish(wide, signed, size)
}

/// `a - b - carry` at `size` width. C reports a borrow.
pub const fn sub(a: u32, b: u32, carry: bool, size: Size) -> (u32, AluFlags) {
    let c = carry as u32;
    let wide = size
        .truncate(a)
        .wrapping_sub(size.truncate(b))
        .wrapping_sub(c);
    let signed = size.sign_extend(a) - size.sign_extend(b) - c as i32;
    finish(wide, signed, size)
}
