use std::fmt;

/// # Opcode
///
/// A raw 16-bit Chip-8 instruction word, stored big-endian in memory.
///
/// ```text
/// [o x y n]   o   operation family (high nibble)
///             x   register Vx, or the last register of V0..Vx
///             y   register Vy
///             n   4-bit immediate (sprite height) or sub-operation
/// [_ _ k k]   kk  8-bit immediate
/// [_ a d r]   adr 12-bit address
/// ```
///
/// Which of these fields mean anything depends on the family; decoding them
/// into an `Instruction` is what decides that.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Combines the two bytes of an instruction, high byte first
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode(u16::from(high) << 8 | u16::from(low))
    }

    /// The word split into its four nibbles, most significant first
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        ((self.0 >> 12) as u8, self.x(), self.y(), self.n())
    }

    /// `[_x__]`
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// `[__y_]`
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    /// `[___n]`
    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// `[__kk]`
    pub fn kk(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// `[_adr]`
    pub fn addr(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
