use crate::error::Chip8Error;
use crate::frame_buffer::FrameBuffer;
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::registers::Registers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// - `registers`: V0..VF, I, the pc, the call stack and both timers
///
/// ## Memory
/// - 4096 bytes of addressable memory with the sprite sheet at 0x000
///
/// ## Display
/// - a 64x32 frame buffer holding the next frame to be drawn
/// - `draw_flag` is set whenever the frame buffer changes
///
/// The whole thing is `Copy`. Instructions run against a copy that only
/// replaces the live state once every effect has been applied, so a failing
/// instruction leaves nothing half done.
#[derive(Copy, Clone)]
pub struct State {
    pub registers: Registers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
}

impl State {
    pub fn new() -> Self {
        State {
            registers: Registers::new(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
        }
    }

    /// Gets the opcode currently pointed at by the pc
    pub fn fetch(&self) -> Result<Opcode, Chip8Error> {
        self.memory.read_word(self.registers.pc()).map(Opcode)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
