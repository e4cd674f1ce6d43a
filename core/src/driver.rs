use std::time::Duration;

use log::info;

use crate::chip8::Chip8;
use crate::constants::{MAX_CATCH_UP, TIMER_SPEED};
use crate::error::Chip8Error;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A fixed rate event stream on the driver's clock
///
/// Deadlines are computed from the number of events so far rather than
/// accumulated, so rates that don't divide a second evenly don't drift.
#[derive(Copy, Clone, Debug)]
struct Cadence {
    rate: u32,
    count: u64,
}

impl Cadence {
    fn new(rate: u32) -> Self {
        Cadence {
            rate: rate.max(1),
            count: 0,
        }
    }

    /// Nanoseconds since the driver started at which the next event is due
    fn next_due(&self) -> u128 {
        (u128::from(self.count) + 1) * NANOS_PER_SEC / u128::from(self.rate)
    }

    fn fire(&mut self) {
        self.count += 1;
    }
}

/// What a call to `advance` got through
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub cycles: u32,
    pub ticks: u32,
}

/// # Driver
/// Runs a Chip-8 against a clock that the host winds forward.
///
/// The CPU runs at `clock_speed` and the timers at 60Hz on their own cadences.
/// Every cycle and tick that falls due in the elapsed time is run in deadline
/// order, timers first when the two land on the same instant.
pub struct Driver {
    chip8: Chip8,
    now: u128,
    cpu: Cadence,
    timers: Cadence,
}

impl Driver {
    /// # Arguments
    /// * `chip8` a machine with a program already loaded
    /// * `clock_speed` instructions per second; anything below 1 runs at 1
    pub fn new(chip8: Chip8, clock_speed: u32) -> Self {
        info!("running at {}Hz", clock_speed.max(1));
        Driver {
            chip8,
            now: 0,
            cpu: Cadence::new(clock_speed),
            timers: Cadence::new(TIMER_SPEED),
        }
    }

    pub fn chip8(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn chip8_mut(&mut self) -> &mut Chip8 {
        &mut self.chip8
    }

    pub fn clock_speed(&self) -> u32 {
        self.cpu.rate
    }

    /// Winds the clock forward by `elapsed` and runs whatever fell due.
    ///
    /// At most `MAX_CATCH_UP` is taken from a single call; anything past it is
    /// dropped rather than run in a burst. Stops at the first fault.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Progress, Chip8Error> {
        if self.chip8.is_halted() {
            return Err(Chip8Error::Halted {
                pc: self.chip8.registers().pc(),
            });
        }

        self.now += elapsed.min(MAX_CATCH_UP).as_nanos();
        let mut progress = Progress::default();

        loop {
            let tick_due = self.timers.next_due();
            let cycle_due = self.cpu.next_due();
            if tick_due.min(cycle_due) > self.now {
                break;
            }

            if tick_due <= cycle_due {
                self.chip8.tick_timers();
                self.timers.fire();
                progress.ticks += 1;
            } else {
                self.chip8.step()?;
                self.cpu.fire();
                progress.cycles += 1;
            }
        }

        Ok(progress)
    }

    /// Resets the machine and restarts the clock
    pub fn reset(&mut self) -> Result<(), Chip8Error> {
        self.chip8.reset()?;
        self.now = 0;
        self.cpu.count = 0;
        self.timers.count = 0;
        Ok(())
    }
}
