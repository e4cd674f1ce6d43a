use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::error;

use emu8_core::CLOCK_SPEED;

mod keymap;
mod run;

/// Run a Chip-8 ROM in an SDL2 window
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(short, long, default_value_t = CLOCK_SPEED)]
    clock_speed: u32,

    /// Size of a Chip-8 pixel in screen pixels
    #[arg(short, long, default_value_t = 10)]
    scale: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run::run(&args.rom, args.clock_speed, args.scale) {
        error!("{}", err);
        process::exit(1);
    }
}
