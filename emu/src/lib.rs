//! SAP virtual machine, debugger and disassembler.

pub mod config;
pub mod debugger;
pub mod device;
pub mod disasm;
pub mod error;
pub mod files;
pub mod machine;
pub mod stack;

pub use config::{Config, DebugConfig};
pub use debugger::{Command, CommandError, Session};
pub use device::{ChannelDevice, Device, Host, StdDevice};
pub use disasm::{disassemble, Entry, Line};
pub use error::{ConfigError, Fault, LoadError};
pub use files::{load_program, load_symbols, run_file};
pub use machine::{Machine, Outcome, Step};
pub use stack::{Stack, Status};
