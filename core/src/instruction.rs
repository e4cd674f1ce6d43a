use rand::Rng;

use crate::error::Chip8Error;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// What the pc should do once an instruction has been applied
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = address
    Jump(u16),
    /// pc stays put; the instruction runs again next cycle
    Wait,
}

/// # Instructions
/// Every opcode in the standard Chip-8 table, decoded with its operands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn
    Sys { addr: u16 },
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqual { x: u8, kk: u8 },
    /// 4xkk
    SkipNotEqual { x: u8, kk: u8 },
    /// 5xy0
    SkipRegistersEqual { x: u8, y: u8 },
    /// 6xkk
    Load { x: u8, kk: u8 },
    /// 7xkk
    Add { x: u8, kk: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddRegisters { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8 },
    /// 8xy7
    SubN { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8 },
    /// 9xy0
    SkipRegistersNotEqual { x: u8, y: u8 },
    /// Annn
    LoadIndex { addr: u16 },
    /// Bnnn
    JumpOffset { addr: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipPressed { x: u8 },
    /// ExA1
    SkipNotPressed { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    WaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadSprite { x: u8 },
    /// Fx33
    Bcd { x: u8 },
    /// Fx55
    Store { x: u8 },
    /// Fx65
    Read { x: u8 },
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode; `None` if it isn't in the table
    pub fn from_op(op: Opcode) -> Option<Self> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqual { x, kk },
            (0x4, ..) => SkipNotEqual { x, kk },
            (0x5, .., 0x0) => SkipRegistersEqual { x, y },
            (0x6, ..) => Load { x, kk },
            (0x7, ..) => Add { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddRegisters { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, .., 0x0) => SkipRegistersNotEqual { x, y },
            (0xA, ..) => LoadIndex { addr },
            (0xB, ..) => JumpOffset { addr },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipPressed { x },
            (0xE, _, 0xA, 0x1) => SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => LoadSprite { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => Store { x },
            (0xF, _, 0x6, 0x5) => Read { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Applies the instruction's effects to `state` and reports how the pc should move.
    ///
    /// `state` may be partially updated when this fails, so callers run it
    /// against a copy.
    pub fn execute<R: Rng + ?Sized>(
        self,
        state: &mut State,
        keypad: &Keypad,
        rng: &mut R,
    ) -> Result<Flow, Chip8Error> {
        use Instruction::*;

        match self {
            Sys { addr } => sys(addr),
            Clear => clr(state),
            Return => rts(state),
            Jump { addr } => jump(addr),
            Call { addr } => call(state, addr),
            SkipEqual { x, kk } => ske(state, x, kk),
            SkipNotEqual { x, kk } => skne(state, x, kk),
            SkipRegistersEqual { x, y } => skre(state, x, y),
            Load { x, kk } => load(state, x, kk),
            Add { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddRegisters { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x } => shr(state, x),
            SubN { x, y } => subn(state, x, y),
            ShiftLeft { x } => shl(state, x),
            SkipRegistersNotEqual { x, y } => skrne(state, x, y),
            LoadIndex { addr } => loadi(state, addr),
            JumpOffset { addr } => jumpi(state, addr),
            Random { x, kk } => rand(state, x, kk, rng),
            Draw { x, y, n } => draw(state, x, y, n),
            SkipPressed { x } => skpr(state, x, keypad),
            SkipNotPressed { x } => skup(state, x, keypad),
            LoadDelay { x } => moved(state, x),
            WaitKey { x } => keyd(state, x, keypad),
            SetDelay { x } => setd(state, x),
            SetSound { x } => sets(state, x),
            AddIndex { x } => addi(state, x),
            LoadSprite { x } => ldspr(state, x),
            Bcd { x } => bcd(state, x),
            Store { x } => stor(state, x),
            Read { x } => read(state, x),
        }
    }
}
