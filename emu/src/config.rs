use arch::{SymbolTable, Word};
use serde::{Deserialize, Serialize};

use crate::debugger::{parse_loc, Session};
use crate::error::ConfigError;

/// `jsr` saves r5..r9, so fewer registers cannot run subroutines.
pub const MIN_REGISTERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub memory: usize,
    pub registers: usize,
    pub stack: usize,
    pub debug: DebugConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory: 10000,
            registers: MIN_REGISTERS,
            stack: 400,
            debug: DebugConfig::default(),
        }
    }
}

/// Breakpoints and watches to install when a debug run starts.
/// Locations are `#N` or a label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub watch: bool,
    pub breakpoints: Vec<String>,
    pub watch_memory: Vec<String>,
    pub watch_registers: Vec<Word>,
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str::<Config>(text)
            .map_err(|e| ConfigError::Parse(e.to_string(), e))?
            .validate()
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileOpen(path.to_string(), e))?;
        let config = serde_yaml::from_str::<Config>(&text)
            .map_err(|e| ConfigError::Parse(path.to_string(), e))?
            .validate()?;
        log::info!("config loaded from {}", path);
        Ok(config)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.registers < MIN_REGISTERS {
            return Err(ConfigError::TooFewRegisters(self.registers, MIN_REGISTERS));
        }
        Ok(self)
    }
}

impl DebugConfig {
    /// Install the configured entries into `session`. Entries that do not
    /// resolve, or fall outside the machine, are skipped and returned.
    pub fn apply(
        &self,
        session: &mut Session,
        symbols: &SymbolTable,
        memory: usize,
        registers: usize,
    ) -> Vec<String> {
        let mut skipped = Vec::new();
        let in_range = |n: Word, len: usize| usize::try_from(n).map_or(false, |n| n < len);

        for entry in &self.breakpoints {
            match parse_loc(entry, symbols) {
                Ok(addr) => {
                    session.breakpoints.insert(addr);
                }
                Err(_) => skipped.push(format!("breakpoint {}", entry)),
            }
        }
        for entry in &self.watch_memory {
            match parse_loc(entry, symbols) {
                Ok(addr) if in_range(addr, memory) => {
                    session.memory_watch.insert(addr);
                }
                _ => skipped.push(format!("memory watch {}", entry)),
            }
        }
        for &reg in &self.watch_registers {
            if in_range(reg, registers) {
                session.register_watch.insert(reg);
            } else {
                skipped.push(format!("register watch {}", reg));
            }
        }
        session.watch |= self.watch;
        for entry in &skipped {
            log::warn!("skipped {}", entry);
        }
        skipped
    }
}
