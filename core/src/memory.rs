use crate::constants::{MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START};
use crate::error::Chip8Error;

/// # Memory
/// 4096 bytes of flat addressable memory.
///
/// ```text
/// 0x000..0x050  sprite sheet
/// 0x050..0x200  reserved for the interpreter
/// 0x200..0x1000 program and data
/// ```
///
/// Addresses are `u16` as on the Chip-8. Anything past 0xFFF is an error
/// rather than being wrapped.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the sprite sheet installed
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = SPRITE_SHEET_START as usize;
        bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn read(&self, address: u16) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address as usize)
            .copied()
            .ok_or(Chip8Error::OutOfRange {
                address: address as usize,
            })
    }

    pub fn write(&mut self, address: u16, value: u8) -> Result<(), Chip8Error> {
        let byte = self
            .bytes
            .get_mut(address as usize)
            .ok_or(Chip8Error::OutOfRange {
                address: address as usize,
            })?;
        *byte = value;
        Ok(())
    }

    /// Gets the big-endian word at `address` and `address + 1`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn read_word(&self, address: u16) -> Result<u16, Chip8Error> {
        let word = self.read_slice(address, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// Borrows `len` bytes starting at `address`
    pub fn read_slice(&self, address: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let range = Self::range(address, len)?;
        Ok(&self.bytes[range])
    }

    /// Copies `data` into memory starting at `address`.
    /// Nothing is written unless the whole of `data` fits.
    pub fn write_slice(&mut self, address: u16, data: &[u8]) -> Result<(), Chip8Error> {
        let range = Self::range(address, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Copies a program image into memory at `PROGRAM_START`
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: program.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.write_slice(PROGRAM_START, program)
    }

    fn range(address: u16, len: usize) -> Result<std::ops::Range<usize>, Chip8Error> {
        let start = address as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            // report the first byte that doesn't exist
            return Err(Chip8Error::OutOfRange {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed_after_sprite_sheet() {
        let memory = Memory::new();
        assert_eq!(memory.bytes[0..80], SPRITE_SHEET[..]);
        assert!(memory.bytes[80..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_then_read() {
        let mut memory = Memory::new();
        memory.write(0xCAF, 0xBE).unwrap();
        assert_eq!(memory.read(0xCAF).unwrap(), 0xBE);
    }

    #[test]
    fn test_last_address_is_valid() {
        let mut memory = Memory::new();
        memory.write(0xFFF, 0x12).unwrap();
        assert_eq!(memory.read(0xFFF).unwrap(), 0x12);
    }

    #[test]
    fn test_out_of_range_read_fails() {
        let memory = Memory::new();
        assert!(matches!(
            memory.read(0x1000),
            Err(Chip8Error::OutOfRange { address: 0x1000 })
        ));
    }

    #[test]
    fn test_out_of_range_write_fails() {
        let mut memory = Memory::new();
        assert!(matches!(
            memory.write(0xFFFF, 0x1),
            Err(Chip8Error::OutOfRange { address: 0xFFFF })
        ));
    }

    #[test]
    fn test_read_word() {
        let mut memory = Memory::new();
        memory.write_slice(0x200, &[0xAA, 0xBB]).unwrap();
        assert_eq!(memory.read_word(0x200).unwrap(), 0xAABB);
    }

    #[test]
    fn test_read_word_at_last_address_fails() {
        let memory = Memory::new();
        assert!(matches!(
            memory.read_word(0xFFF),
            Err(Chip8Error::OutOfRange { address: 0x1000 })
        ));
    }

    #[test]
    fn test_partial_write_slice_writes_nothing() {
        let mut memory = Memory::new();
        assert!(memory.write_slice(0xFFE, &[1, 2, 3]).is_err());
        assert_eq!(memory.read_slice(0xFFE, 2).unwrap(), &[0, 0]);
    }

    #[test]
    fn test_program_load_ok() {
        let mut memory = Memory::new();
        memory.load_program(&[0x00, 0xE0]).unwrap();
        assert_eq!(memory.read_slice(0x200, 2).unwrap(), &[0x00, 0xE0]);
    }

    #[test]
    fn test_program_filling_memory_loads() {
        let mut memory = Memory::new();
        memory.load_program(&[0x11; MAX_ROM_SIZE]).unwrap();
        assert_eq!(memory.read(0xFFF).unwrap(), 0x11);
    }

    #[test]
    fn test_program_too_large() {
        let mut memory = Memory::new();
        let program = vec![0; MAX_ROM_SIZE + 1];
        assert!(matches!(
            memory.load_program(&program),
            Err(Chip8Error::RomTooLarge {
                size: 3585,
                max_size: 3584
            })
        ));
    }
}
