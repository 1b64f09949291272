use std::collections::BTreeSet;

use arch::{SymbolTable, Word};
use thiserror::Error;

use crate::device::Device;
use crate::disasm::disassemble;
use crate::machine::Machine;

/// Debugger state for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub breakpoints: BTreeSet<Word>,
    pub memory_watch: BTreeSet<Word>,
    pub register_watch: BTreeSet<Word>,
    /// Pause whenever a watched location changes.
    pub watch: bool,
}

pub(crate) enum Resume {
    Go,
    Step,
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unrecognized command: {0}")]
    Unknown(String),

    #[error("Bad argument.")]
    BadArgument,

    #[error("Not enough arguments.")]
    MissingArgument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Option<Word>),
    Step,
    Dump(Word, Word),
    DumpRegisters,
    Exit,
    Disassemble(Word, Word),
    ListBreakpoints,
    SetBreakpoint(Word),
    ClearBreakpoint(Word),
    ClearBreakpoints,
    ChangeRegister(Word, Word),
    ChangeMemory(Word, Word),
    WatchOn,
    WatchOff,
    WatchMemory(Word),
    WatchRegister(Word),
    UnwatchMemory(Word),
    UnwatchRegister(Word),
    ListWatches,
    ClearWatches,
    Help,
}

const HELP: &str = "\
go - Resume execution at the current location
go <loc> - Resume execution at <loc>
step - Execute one instruction and pause
dump <loc1> <loc2> - Dump memory from <loc1> to <loc2> inclusive
dumpr - Dump registers
exit - Stop the program
deas <loc1> <loc2> - Disassemble memory from <loc1> to <loc2> inclusive
brkt - List breakpoints
sbrk <loc> - Set breakpoint at <loc>
cbrk <loc> - Clear breakpoint at <loc>
cbrkt - Clear all breakpoints
chngr <r#> <value> - Set register <r#> to <value>
chngm <loc> <value> - Set memory at <loc> to <value>
wchon - Turn watching on
wchoff - Turn watching off
swchm <loc> - Watch memory at <loc>
swchr <r#> - Watch register <r#>
cwchm <loc> - Stop watching memory at <loc>
cwchr <r#> - Stop watching register <r#>
wcht - List watched locations and their values
cwcht - Clear all watches
help - Show this list
Locations are #<address> or a label.
";

/// `#N` or a label from the symbol table.
pub fn parse_loc(s: &str, symbols: &SymbolTable) -> Result<Word, CommandError> {
    match s.strip_prefix('#') {
        Some(n) => n.parse().map_err(|_| CommandError::BadArgument),
        None => symbols.address(s).ok_or(CommandError::BadArgument),
    }
}

pub fn parse_reg(s: &str) -> Result<Word, CommandError> {
    s.strip_prefix(|c: char| c == 'r' || c == 'R')
        .and_then(|n| n.parse().ok())
        .ok_or(CommandError::BadArgument)
}

fn parse_value(s: &str) -> Result<Word, CommandError> {
    s.parse().map_err(|_| CommandError::BadArgument)
}

impl Command {
    /// Parse one prompt line. Extra parameters are ignored.
    pub fn parse(line: &str, symbols: &SymbolTable) -> Result<Command, CommandError> {
        let mut tokens = line.split_whitespace();
        let raw = tokens.next().unwrap_or_default();
        let name = raw.to_ascii_lowercase();
        let loc = |s: &str| parse_loc(s, symbols);

        macro_rules! arg {
            ($parse:expr) => {
                $parse(tokens.next().ok_or(CommandError::MissingArgument)?)?
            };
        }

        let cmd = match name.as_str() {
            "go" => Command::Go(tokens.next().map(loc).transpose()?),
            "step" => Command::Step,
            "dump" => Command::Dump(arg!(loc), arg!(loc)),
            "dumpr" => Command::DumpRegisters,
            "exit" => Command::Exit,
            "deas" => Command::Disassemble(arg!(loc), arg!(loc)),
            "brkt" => Command::ListBreakpoints,
            "sbrk" => Command::SetBreakpoint(arg!(loc)),
            "cbrk" => Command::ClearBreakpoint(arg!(loc)),
            "cbrkt" => Command::ClearBreakpoints,
            "chngr" => Command::ChangeRegister(arg!(parse_reg), arg!(parse_value)),
            "chngm" => Command::ChangeMemory(arg!(loc), arg!(parse_value)),
            "wchon" => Command::WatchOn,
            "wchoff" => Command::WatchOff,
            "swchm" => Command::WatchMemory(arg!(loc)),
            "swchr" => Command::WatchRegister(arg!(parse_reg)),
            "cwchm" => Command::UnwatchMemory(arg!(loc)),
            "cwchr" => Command::UnwatchRegister(arg!(parse_reg)),
            "wcht" => Command::ListWatches,
            "cwcht" => Command::ClearWatches,
            "help" => Command::Help,
            _ => return Err(CommandError::Unknown(raw.to_string())),
        };
        Ok(cmd)
    }
}

/// Values of every watched location, memory first.
pub(crate) type Snapshot = Vec<Option<Word>>;

impl<D: Device> Machine<D> {
    fn session_mut(&mut self) -> &mut Session {
        self.session.get_or_insert_with(Session::default)
    }

    fn say(&mut self, text: &str) {
        self.device.write_text(text);
        self.device.write_char('\n');
    }

    pub(crate) fn at_breakpoint(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.breakpoints.contains(&self.pc))
    }

    pub(crate) fn watch_snapshot(&self) -> Option<Snapshot> {
        let session = self.session.as_ref().filter(|s| s.watch)?;
        let memory = session.memory_watch.iter().map(|&a| self.get(a).ok());
        let registers = session.register_watch.iter().map(|&r| self.reg(r).ok());
        Some(memory.chain(registers).collect())
    }

    pub(crate) fn watch_changed(&self, before: &Snapshot) -> bool {
        self.watch_snapshot().is_some_and(|now| &now != before)
    }

    /// Read and execute debugger commands until one resumes the program.
    pub(crate) fn prompt(&mut self) -> Resume {
        loop {
            let prompt = match self.symbols.label(self.pc) {
                Some(label) => format!("dbg {}({})>", self.pc, label),
                None => format!("dbg {}>", self.pc),
            };
            self.device.write_text(&prompt);
            let Some(line) = self.device.read_line() else {
                log::info!("debugger input closed");
                return Resume::Exit;
            };
            if line.trim().is_empty() {
                continue;
            }
            let result = Command::parse(&line, &self.symbols).and_then(|cmd| self.execute(cmd));
            match result {
                Ok(Some(resume)) => return resume,
                Ok(None) => {}
                Err(e) => self.say(&e.to_string()),
            }
        }
    }

    fn clamp(&self, start: Word, end: Word) -> std::ops::RangeInclusive<Word> {
        let last = (self.memory.len() as i64 - 1).min(end as i64) as Word;
        start.max(0)..=last
    }

    pub(crate) fn execute(&mut self, cmd: Command) -> Result<Option<Resume>, CommandError> {
        log::debug!("debugger: {:?}", cmd);
        match cmd {
            Command::Go(target) => {
                if let Some(pc) = target {
                    self.pc = pc;
                }
                return Ok(Some(Resume::Go));
            }
            Command::Step => return Ok(Some(Resume::Step)),
            Command::Exit => return Ok(Some(Resume::Exit)),
            Command::Dump(start, end) => {
                let mut text = String::from("Memory:");
                for addr in self.clamp(start, end) {
                    text += &format!("\n@{}: {}", addr, self.get(addr).unwrap_or_default());
                }
                self.say(&text);
            }
            Command::DumpRegisters => {
                let mut text = String::from("Registers:");
                for (i, val) in self.registers.iter().enumerate() {
                    text += &format!("\nr{}: {}", i, val);
                }
                self.say(&text);
            }
            Command::Disassemble(start, end) => {
                let entries = disassemble(&self.memory, start, end, &self.symbols);
                for entry in entries {
                    self.say(&entry.to_string());
                }
            }
            Command::ListBreakpoints => {
                let list: Vec<Word> = self.session_mut().breakpoints.iter().copied().collect();
                self.say(&format!("Breakpoints: {:?}", list));
            }
            Command::SetBreakpoint(addr) => {
                self.session_mut().breakpoints.insert(addr);
            }
            Command::ClearBreakpoint(addr) => {
                self.session_mut().breakpoints.remove(&addr);
            }
            Command::ClearBreakpoints => self.session_mut().breakpoints.clear(),
            Command::ChangeRegister(r, val) => {
                self.set_reg(r, val).map_err(|_| CommandError::BadArgument)?
            }
            Command::ChangeMemory(addr, val) => {
                self.set(addr, val).map_err(|_| CommandError::BadArgument)?
            }
            Command::WatchOn => self.session_mut().watch = true,
            Command::WatchOff => self.session_mut().watch = false,
            Command::WatchMemory(addr) => {
                let valid = self.get(addr).is_ok();
                let session = self.session_mut();
                if valid {
                    session.memory_watch.insert(addr);
                }
                session.watch = true;
            }
            Command::WatchRegister(r) => {
                let valid = self.reg(r).is_ok();
                let session = self.session_mut();
                if valid {
                    session.register_watch.insert(r);
                }
                session.watch = true;
            }
            Command::UnwatchMemory(addr) => {
                self.session_mut().memory_watch.remove(&addr);
            }
            Command::UnwatchRegister(r) => {
                self.session_mut().register_watch.remove(&r);
            }
            Command::ListWatches => {
                let session = self.session_mut().clone();
                let mut text = String::from("Watch variables:");
                for &addr in &session.memory_watch {
                    text += &format!("\n@{}: {}", addr, self.get(addr).unwrap_or_default());
                }
                for &r in &session.register_watch {
                    text += &format!("\nr{}: {}", r, self.reg(r).unwrap_or_default());
                }
                self.say(&text);
            }
            Command::ClearWatches => {
                let session = self.session_mut();
                session.memory_watch.clear();
                session.register_watch.clear();
            }
            Command::Help => self.device.write_text(HELP),
        }
        Ok(None)
    }
}
