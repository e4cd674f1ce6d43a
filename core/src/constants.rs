use std::time::Duration;

/// Horizontal resolution of the Chip-8 display in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical resolution of the Chip-8 display in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// Bytes of addressable memory (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded into memory and where the pc starts
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Maximum depth of the call stack
pub const STACK_DEPTH: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Instructions executed per second unless the host asks for something else
pub const CLOCK_SPEED: u32 = 500;

/// Rate at which the delay and sound timers count down
pub const TIMER_SPEED: u32 = 60;

/// Longest stretch of wall-clock time the driver will try to catch up on at once
pub const MAX_CATCH_UP: Duration = Duration::from_millis(250);

/// Address of the first glyph of the built-in font
pub const SPRITE_SHEET_START: u16 = 0x000;

/// Bytes per glyph in the built-in font
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite sheet
/// Hexadecimal digits 0..F, each 4 pixels wide and 5 rows tall.
/// Only the high nibble of each byte is drawn.
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
