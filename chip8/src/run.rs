use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use emu8_core::{Chip8, Chip8Error, Driver};
use emu8_display::Display;

use crate::keymap::keymap;

/// How long the loop sleeps between polls when there's nothing to do
const IDLE: Duration = Duration::from_millis(1);

fn sdl_error(err: String) -> Chip8Error {
    Chip8Error::Render(err)
}

/// Loads `rom` and runs it until the window is closed or the machine faults
pub fn run(rom: &Path, clock_speed: u32, scale: u32) -> Result<(), Chip8Error> {
    let mut chip8 = Chip8::new();
    let mut reader = BufReader::new(File::open(rom)?);
    chip8.load_rom(&mut reader)?;
    info!("loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(sdl_error)?;
    let mut display = Display::new(&sdl, scale)?;
    let mut events = sdl.event_pump().map_err(sdl_error)?;

    let mut driver = Driver::new(chip8, clock_speed);
    let mut last_advance = Instant::now();
    let mut beeping = false;

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(Keycode::F5),
                    repeat: false,
                    ..
                } => driver.reset()?,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        driver.chip8_mut().key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        driver.chip8_mut().key_release(kc);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        let now = Instant::now();
        let advanced = driver.advance(now - last_advance);
        last_advance = now;
        if let Err(err) = advanced {
            error!("{:?}", driver.chip8().registers());
            return Err(err);
        }

        // Render the frame if the draw flag was set
        driver.chip8_mut().render(&mut display)?;

        if driver.chip8().is_beeping() != beeping {
            beeping = !beeping;
            debug!("beep {}", if beeping { "on" } else { "off" });
        }

        thread::sleep(IDLE);
    }

    Ok(())
}
