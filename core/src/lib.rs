pub use chip8::{Chip8, StepStatus};
pub use constants::CLOCK_SPEED;
pub use driver::{Driver, Progress};
pub use error::Chip8Error;
pub use frame_buffer::FrameBuffer;
pub use host::Renderer;
pub use keypad::Keypad;
pub use opcode::Opcode;

mod chip8;
pub mod constants;
mod driver;
mod error;
mod frame_buffer;
mod host;
mod instruction;
mod keypad;
pub mod memory;
mod opcode;
mod operations;
pub mod registers;
pub mod state;
