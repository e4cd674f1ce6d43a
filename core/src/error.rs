use std::io;

use thiserror::Error;

use crate::opcode::Opcode;

/// Everything that can stop a Chip-8.
///
/// None of these are recoverable at the instruction level: a machine that hits
/// one halts and has to be reset before it will run again.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("memory access out of bounds at address {address:#06X}")]
    OutOfRange { address: usize },

    #[error("register V{index:X} does not exist")]
    RegisterOutOfRange { index: u8 },

    #[error("stack overflow: call nested deeper than {depth} subroutines")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X} at address {address:#05X}")]
    UnknownOpcode { opcode: u16, address: u16 },

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("unable to read ROM: {0}")]
    Io(#[from] io::Error),

    #[error("fault at {pc:#05X} {}: {source}", fault_context(.opcode))]
    Fault {
        pc: u16,
        opcode: Option<Opcode>,
        #[source]
        source: Box<Chip8Error>,
    },

    #[error("machine halted at {pc:#05X}; reset it before stepping again")]
    Halted { pc: u16 },

    #[error("renderer failed: {0}")]
    Render(String),
}

impl Chip8Error {
    /// Attach the pc and, if it got that far, the opcode of the instruction that failed.
    ///
    /// Decode failures already carry their address and are left alone.
    pub(crate) fn at(self, pc: u16, opcode: Option<Opcode>) -> Self {
        match self {
            Chip8Error::UnknownOpcode { .. } | Chip8Error::Fault { .. } => self,
            other => Chip8Error::Fault {
                pc,
                opcode,
                source: Box::new(other),
            },
        }
    }

    /// The error at the bottom of any `Fault` wrapping.
    pub fn root_cause(&self) -> &Chip8Error {
        match self {
            Chip8Error::Fault { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn fault_context(opcode: &Option<Opcode>) -> String {
    match opcode {
        Some(op) => format!("executing {}", op),
        None => "fetching".to_string(),
    }
}
