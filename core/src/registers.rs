use crate::constants::{PROGRAM_START, STACK_DEPTH};
use crate::error::Chip8Error;

const ADDRESS_MASK: u16 = 0x0FFF;

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 12-bit memory address register
///
/// Counter
/// - (pc) a 12-bit program counter
///
/// Stack
/// - 16 return addresses and an 8-bit stack pointer
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented at 60Hz down to 0
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    v: [u8; 16],
    i: u16,
    pc: u16,
    sp: u8,
    stack: [u16; STACK_DEPTH],
    delay_timer: u8,
    sound_timer: u8,
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// Vx
    pub fn v(&self, x: u8) -> Result<u8, Chip8Error> {
        self.v
            .get(x as usize)
            .copied()
            .ok_or(Chip8Error::RegisterOutOfRange { index: x })
    }

    /// Vx = value
    pub fn set_v(&mut self, x: u8, value: u8) -> Result<(), Chip8Error> {
        let register = self
            .v
            .get_mut(x as usize)
            .ok_or(Chip8Error::RegisterOutOfRange { index: x })?;
        *register = value;
        Ok(())
    }

    /// VF = 1 if `flag` else 0
    pub fn set_flag(&mut self, flag: bool) {
        self.v[0xF] = flag as u8;
    }

    /// All of V0..VF, for diagnostics
    pub fn v_all(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    /// Upper bits beyond the 12-bit address space are dropped
    pub fn set_i(&mut self, address: u16) {
        self.i = address & ADDRESS_MASK;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Upper bits beyond the 12-bit address space are dropped
    pub fn set_pc(&mut self, address: u16) {
        self.pc = address & ADDRESS_MASK;
    }

    /// Number of return addresses currently on the stack
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// STACK.push(address)
    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        let slot = self
            .stack
            .get_mut(self.sp as usize)
            .ok_or(Chip8Error::StackOverflow { depth: STACK_DEPTH })?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    /// STACK.pop()
    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Whether the host should be beeping
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    /// Decrements both timers, stopping at 0
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pc_starts_at_program() {
        assert_eq!(Registers::new().pc(), 0x200);
    }

    #[test]
    fn test_set_v() {
        let mut registers = Registers::new();
        registers.set_v(0xA, 0x42).unwrap();
        assert_eq!(registers.v(0xA).unwrap(), 0x42);
    }

    #[test]
    fn test_v_out_of_range() {
        let mut registers = Registers::new();
        assert!(matches!(
            registers.v(0x10),
            Err(Chip8Error::RegisterOutOfRange { index: 0x10 })
        ));
        assert!(registers.set_v(0x10, 0x1).is_err());
    }

    #[test]
    fn test_set_flag() {
        let mut registers = Registers::new();
        registers.set_flag(true);
        assert_eq!(registers.v(0xF).unwrap(), 0x1);
        registers.set_flag(false);
        assert_eq!(registers.v(0xF).unwrap(), 0x0);
    }

    #[test]
    fn test_i_is_masked() {
        let mut registers = Registers::new();
        registers.set_i(0xFABC);
        assert_eq!(registers.i(), 0x0ABC);
    }

    #[test]
    fn test_pc_is_masked() {
        let mut registers = Registers::new();
        registers.set_pc(0x1002);
        assert_eq!(registers.pc(), 0x002);
    }

    #[test]
    fn test_push_pop() {
        let mut registers = Registers::new();
        registers.push(0xABC).unwrap();
        registers.push(0x123).unwrap();
        assert_eq!(registers.sp(), 2);
        assert_eq!(registers.pop().unwrap(), 0x123);
        assert_eq!(registers.pop().unwrap(), 0xABC);
        assert_eq!(registers.sp(), 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut registers = Registers::new();
        for address in 0..STACK_DEPTH as u16 {
            registers.push(address).unwrap();
        }
        assert!(matches!(
            registers.push(0x200),
            Err(Chip8Error::StackOverflow { depth: 16 })
        ));
        assert_eq!(registers.sp(), 16);
    }

    #[test]
    fn test_stack_underflow() {
        let mut registers = Registers::new();
        assert!(matches!(registers.pop(), Err(Chip8Error::StackUnderflow)));
    }

    #[test]
    fn test_tick_timers() {
        let mut registers = Registers::new();
        registers.set_delay_timer(2);
        registers.set_sound_timer(1);
        registers.tick_timers();
        assert_eq!(registers.delay_timer(), 1);
        assert_eq!(registers.sound_timer(), 0);
        assert!(!registers.is_sound_active());
        registers.tick_timers();
        registers.tick_timers();
        assert_eq!(registers.delay_timer(), 0);
        assert_eq!(registers.sound_timer(), 0);
    }
}
