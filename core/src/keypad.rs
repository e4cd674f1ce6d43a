use crate::constants::KEY_COUNT;

/// # Keypad
/// Chip-8 input is generated with a 16 key hexadecimal keypad.
///
/// Besides the pressed status of each key the keypad remembers the most
/// recent key to go down while the machine is waiting on `Fx0A`, which is what
/// lets a wait complete on a press rather than on a key that was already held.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
    latched: Option<u8>,
    waiting: bool,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently held down; keys above 0xF only look at their low nibble
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed[(key & 0xF) as usize]
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn press(&mut self, key: u8) {
        let key = key & 0xF;
        self.pressed[key as usize] = true;
        if self.waiting {
            self.latched = Some(key);
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn release(&mut self, key: u8) {
        self.pressed[(key & 0xF) as usize] = false;
    }

    /// Replace the whole keypad state; keys that went from up to down count as presses
    pub fn set_all(&mut self, snapshot: [bool; KEY_COUNT]) {
        for (key, &down) in snapshot.iter().enumerate() {
            match (self.pressed[key], down) {
                (false, true) => self.press(key as u8),
                (true, false) => self.release(key as u8),
                _ => {}
            }
        }
    }

    /// The key pressed since the machine started waiting, if any
    pub fn latched(&self) -> Option<u8> {
        self.latched
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Start listening for a press; presses before this point don't count
    pub(crate) fn begin_wait(&mut self) {
        if !self.waiting {
            self.waiting = true;
            self.latched = None;
        }
    }

    /// Stop listening and forget the latched press
    pub(crate) fn end_wait(&mut self) {
        self.waiting = false;
        self.latched = None;
    }
}
