use arch::{ProgramError, SymbolsError, Word};
use thiserror::Error;

/// Fatal execution errors. The run stops at the faulting instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("Attempted to access nonexistent memory address {0}")]
    Memory(Word),

    #[error("Attempted to access nonexistent register {0}")]
    Register(Word),

    #[error("Attempted to divide by zero")]
    DivideByZero,

    #[error("Invalid command {0}")]
    InvalidCommand(Word),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Program is too large: {0} words, memory holds {1}")]
    TooLarge(usize, usize),

    #[error("Unable to find {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Unable to read {0}")]
    Program(String, #[source] ProgramError),

    #[error("Unable to read {0}")]
    Symbols(String, #[source] SymbolsError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String, #[source] serde_yaml::Error),

    #[error("At least {1} registers required, got {0}")]
    TooFewRegisters(usize, usize),
}
