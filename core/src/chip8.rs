use std::io::Read;

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::KEY_COUNT;
use crate::error::Chip8Error;
use crate::frame_buffer::FrameBuffer;
use crate::host::Renderer;
use crate::instruction::{Flow, Instruction};
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::state::State;

/// How a single cycle went
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// An instruction ran and the pc moved on
    Executed,
    /// `Fx0A` is waiting on a key; the pc hasn't moved
    AwaitingKey,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the `keypad` with public interfaces for manipulating it
///  - the last loaded `program` so the machine can be reset
///  - whether a fault has `halted` it
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: StdRng,
    program: Vec<u8>,
    halted: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A machine whose `Cxkk` results are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(),
            rng,
            program: Vec::new(),
            halted: false,
        }
    }

    /// Load a program image at 0x200
    ///
    /// # Arguments
    /// * `program` raw big-endian instructions and data
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.state.memory.load_program(program)?;
        self.program = program.to_vec();
        info!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_program(&program)
    }

    /// Put memory, registers and display back the way they were at power on
    /// and reload the last program. Clears a halt.
    pub fn reset(&mut self) -> Result<(), Chip8Error> {
        self.state = State::new();
        self.keypad = Keypad::new();
        self.halted = false;
        self.state.memory.load_program(&self.program)?;
        self.state.draw_flag = true;
        info!("reset");
        Ok(())
    }

    /// Returns the FrameBuffer if the display should be redrawn
    /// - taking it clears the draw flag
    pub fn get_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Pushes the frame to `renderer` if it changed; returns whether it did
    pub fn render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<bool, Chip8Error> {
        match self.get_frame() {
            Some(frame) => frame.present(renderer).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn registers(&self) -> &Registers {
        &self.state.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Whether the sound timer is running
    pub fn is_beeping(&self) -> bool {
        self.state.registers.is_sound_active()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Replace the status of every key at once
    pub fn set_keys(&mut self, snapshot: [bool; KEY_COUNT]) {
        self.keypad.set_all(snapshot);
    }

    /// Advances the CPU by a single cycle
    /// - gets, decodes and executes the opcode at the pc
    /// - yields without moving the pc while `Fx0A` waits on a key
    ///
    /// Any error halts the machine and leaves the state as it was before the cycle.
    pub fn step(&mut self) -> Result<StepStatus, Chip8Error> {
        let pc = self.state.registers.pc();
        if self.halted {
            return Err(Chip8Error::Halted { pc });
        }

        self.cycle(pc).map_err(|err| {
            error!("halting at {:03X}", pc);
            self.halted = true;
            err
        })
    }

    fn cycle(&mut self, pc: u16) -> Result<StepStatus, Chip8Error> {
        let op = self.state.fetch().map_err(|err| err.at(pc, None))?;
        let instruction = Instruction::from_op(op).ok_or(Chip8Error::UnknownOpcode {
            opcode: op.0,
            address: pc,
        })?;
        trace!(
            "{} {:?} v{:02X?} i{:03X} pc{:03X}",
            op,
            instruction,
            self.state.registers.v_all(),
            self.state.registers.i(),
            pc
        );

        let mut next = self.state;
        let flow = instruction
            .execute(&mut next, &self.keypad, &mut self.rng)
            .map_err(|err| err.at(pc, Some(op)))?;

        match flow {
            Flow::Next => next.registers.set_pc(pc.wrapping_add(2)),
            Flow::Skip => next.registers.set_pc(pc.wrapping_add(4)),
            Flow::Jump(address) => next.registers.set_pc(address),
            Flow::Wait => {
                if !self.keypad.is_waiting() {
                    debug!("waiting for a key at {:03X}", pc);
                }
                self.keypad.begin_wait();
                return Ok(StepStatus::AwaitingKey);
            }
        }

        if let Instruction::WaitKey { .. } = instruction {
            self.keypad.end_wait();
        }
        self.state = next;
        Ok(StepStatus::Executed)
    }

    /// Decrements the delay and sound timers; meant to be called at 60Hz
    /// - a halted machine's timers stay frozen
    pub fn tick_timers(&mut self) {
        if self.halted {
            return;
        }
        self.state.registers.tick_timers();
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chip8_with(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_seed(8);
        chip8.load_program(program).unwrap();
        chip8
    }

    fn top_left_row(chip8: &Chip8) -> Vec<bool> {
        (0..8).map(|x| chip8.frame_buffer().get_pixel(x, 0)).collect()
    }

    #[test]
    fn test_step_adds_immediate() {
        let mut chip8 = chip8_with(&[0x72, 0x10]);
        assert_eq!(chip8.step().unwrap(), StepStatus::Executed);
        assert_eq!(chip8.registers().v(0x2).unwrap(), 0x10);
        assert_eq!(chip8.registers().pc(), 0x202);
    }

    #[test]
    fn test_draw_then_redraw_sprite() {
        let mut chip8 = chip8_with(&[0xA2, 0x20, 0xD0, 0x01, 0xD0, 0x01]);
        chip8.state.memory.write(0x220, 0xFF).unwrap();

        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(top_left_row(&chip8), vec![true; 8]);
        assert!(!chip8.frame_buffer().get_pixel(8, 0));
        assert_eq!(chip8.registers().v(0xF).unwrap(), 0x0);

        chip8.step().unwrap();
        assert_eq!(top_left_row(&chip8), vec![false; 8]);
        assert_eq!(chip8.registers().v(0xF).unwrap(), 0x1);
    }

    #[test]
    fn test_skip_moves_pc_by_four() {
        let mut chip8 = chip8_with(&[0x30, 0x00]);
        chip8.step().unwrap();
        assert_eq!(chip8.registers().pc(), 0x204);
    }

    #[test]
    fn test_call_and_return() {
        // 200: call 206, 202: V1 = 1, 206: V0 = 1, 208: return
        let mut chip8 = chip8_with(&[0x22, 0x06, 0x61, 0x01, 0x00, 0x00, 0x60, 0x01, 0x00, 0xEE]);
        chip8.step().unwrap();
        assert_eq!(chip8.registers().pc(), 0x206);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.registers().pc(), 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.registers().v(0x0).unwrap(), 0x1);
        assert_eq!(chip8.registers().v(0x1).unwrap(), 0x1);
    }

    #[test]
    fn test_unknown_opcode_leaves_state_untouched() {
        let mut chip8 = chip8_with(&[0x61, 0x05, 0x51, 0x21]);
        chip8.step().unwrap();
        let before = chip8.state;

        let err = chip8.step().unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::UnknownOpcode {
                opcode: 0x5121,
                address: 0x202
            }
        ));
        assert_eq!(*chip8.registers(), before.registers);
        assert_eq!(*chip8.frame_buffer(), before.frame_buffer);
        assert!(chip8.is_halted());
    }

    #[test]
    fn test_failed_instruction_is_atomic() {
        // V0..V2 = 7, I = FFE, then store V0..V2 which runs off the end of memory
        let mut chip8 = chip8_with(&[0x60, 0x07, 0x61, 0x07, 0x62, 0x07, 0xAF, 0xFE, 0xF2, 0x55]);
        for _ in 0..4 {
            chip8.step().unwrap();
        }
        let err = chip8.step().unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::Fault {
                pc: 0x208,
                opcode: Some(_),
                ..
            }
        ));
        assert!(matches!(err.root_cause(), Chip8Error::OutOfRange { .. }));
        assert_eq!(chip8.memory().read_slice(0xFFE, 2).unwrap(), &[0, 0]);
        assert_eq!(chip8.registers().pc(), 0x208);
    }

    #[test]
    fn test_fetch_at_last_address_faults() {
        // jump to FFF
        let mut chip8 = chip8_with(&[0x1F, 0xFF]);
        chip8.step().unwrap();
        let err = chip8.step().unwrap_err();
        assert!(matches!(
            err,
            Chip8Error::Fault {
                pc: 0xFFF,
                opcode: None,
                ..
            }
        ));
    }

    #[test]
    fn test_halted_machine_needs_reset() {
        let mut chip8 = chip8_with(&[0x00, 0xEE]);
        assert!(chip8.step().is_err());
        assert!(matches!(chip8.step(), Err(Chip8Error::Halted { pc: 0x200 })));

        chip8.reset().unwrap();
        assert!(!chip8.is_halted());
        assert_eq!(chip8.registers().pc(), 0x200);
        assert_eq!(chip8.memory().read_slice(0x200, 2).unwrap(), &[0x00, 0xEE]);
    }

    #[test]
    fn test_reset_marks_frame_dirty() {
        let mut chip8 = chip8_with(&[0x60, 0x00, 0xD0, 0x05]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());

        chip8.reset().unwrap();
        assert_eq!(chip8.get_frame(), Some(&FrameBuffer::new()));
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_bnnn_jp_wraps() {
        // V0 = 2, jump to FFF + V0
        let mut chip8 = chip8_with(&[0x60, 0x02, 0xBF, 0xFF]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.registers().pc(), 0x001);
    }

    #[test]
    fn test_reset_clears_registers_and_display() {
        let mut chip8 = chip8_with(&[0x6A, 0x42, 0xD0, 0x05]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.reset().unwrap();
        assert_eq!(chip8.registers().v(0xA).unwrap(), 0x0);
        assert_eq!(*chip8.frame_buffer(), FrameBuffer::new());
    }

    #[test]
    fn test_doesnt_advance_while_waiting_for_key() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A]);
        // already down before the wait, so it doesn't satisfy it
        chip8.key_press(0x3);
        assert_eq!(chip8.step().unwrap(), StepStatus::AwaitingKey);
        assert_eq!(chip8.step().unwrap(), StepStatus::AwaitingKey);
        assert_eq!(chip8.registers().pc(), 0x200);
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A]);
        chip8.step().unwrap();
        chip8.key_press(0xE);
        assert_eq!(chip8.step().unwrap(), StepStatus::Executed);
        assert_eq!(chip8.registers().v(0x1).unwrap(), 0xE);
        assert_eq!(chip8.registers().pc(), 0x202);
        assert!(!chip8.keypad().is_waiting());
    }

    #[test]
    fn test_snapshot_press_satisfies_wait() {
        let mut chip8 = chip8_with(&[0xF4, 0x0A]);
        chip8.step().unwrap();
        let mut keys = [false; KEY_COUNT];
        keys[0x5] = true;
        chip8.set_keys(keys);
        chip8.step().unwrap();
        assert_eq!(chip8.registers().v(0x4).unwrap(), 0x5);
    }

    #[test]
    fn test_get_frame_only_when_dirty() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_tick_timers() {
        // DT = ST = V0 = 2
        let mut chip8 = chip8_with(&[0x60, 0x02, 0xF0, 0x15, 0xF0, 0x18]);
        for _ in 0..3 {
            chip8.step().unwrap();
        }
        assert!(chip8.is_beeping());
        chip8.tick_timers();
        chip8.tick_timers();
        chip8.tick_timers();
        assert_eq!(chip8.registers().delay_timer(), 0);
        assert!(!chip8.is_beeping());
    }

    #[test]
    fn test_load_rom_from_reader() {
        let mut chip8 = Chip8::with_seed(8);
        let mut rom: &[u8] = &[0x00, 0xE0];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.memory().read_word(0x200).unwrap(), 0x00E0);
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut chip8 = Chip8::with_seed(8);
        let image = vec![0; 4000];
        let mut rom: &[u8] = &image;
        assert!(matches!(
            chip8.load_rom(&mut rom),
            Err(Chip8Error::RomTooLarge { size: 4000, .. })
        ));
    }

    #[test]
    fn test_seeded_machines_agree() {
        let program = [0xC0, 0xFF, 0xC1, 0xFF];
        let mut a = chip8_with(&program);
        let mut b = chip8_with(&program);
        for _ in 0..2 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.registers(), b.registers());
    }
}
