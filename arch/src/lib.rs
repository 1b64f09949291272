//! Instruction set of the SAP machine, shared by the assembler and the
//! emulator: opcodes, the instruction table, labels and the on-disk
//! program/symbol artifacts.

pub mod inst;
pub mod op;
pub mod program;
pub mod symbols;

/// One machine cell. Memory, registers and the stack all hold words.
pub type Word = i32;

pub use inst::Inst;
pub use op::{Arg, Opcode};
pub use program::{Program, ProgramError};
pub use symbols::{SymbolTable, SymbolsError};
