use arch::{Program, SymbolTable};

use crate::config::DebugConfig;
use crate::device::Device;
use crate::error::LoadError;
use crate::machine::{Machine, Outcome};

fn read(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|err| LoadError::FileOpen(path.to_string(), err))
}

/// Read the program artifact `<stem>.bin`.
pub fn load_program(stem: &str) -> Result<Program, LoadError> {
    let path = format!("{}.bin", stem);
    let program =
        Program::parse(&read(&path)?).map_err(|err| LoadError::Program(path.clone(), err))?;
    log::info!("read {} ({} words)", path, program.words.len());
    Ok(program)
}

/// Read the symbol artifact `<stem>.sym`.
pub fn load_symbols(stem: &str) -> Result<SymbolTable, LoadError> {
    let path = format!("{}.sym", stem);
    let symbols =
        SymbolTable::parse(&read(&path)?).map_err(|err| LoadError::Symbols(path.clone(), err))?;
    log::info!("read {} ({} labels)", path, symbols.len());
    Ok(symbols)
}

/// Load `<stem>.bin` into `machine` and run it. With `debug`, the run is a
/// debug session over `<stem>.sym` seeded from that configuration.
pub fn run_file<D: Device>(
    machine: &mut Machine<D>,
    stem: &str,
    debug: Option<&DebugConfig>,
) -> Result<Outcome, LoadError> {
    let program = load_program(stem)?;
    machine.load(&program)?;
    if let Some(cfg) = debug {
        let symbols = load_symbols(stem)?;
        let (memory, registers) = (machine.memory().len(), machine.registers().len());
        let session = machine.debug(symbols.clone());
        for skipped in cfg.apply(session, &symbols, memory, registers) {
            machine
                .device_mut()
                .write_text(&format!("Skipped unresolved {}\n", skipped));
        }
    }
    Ok(machine.run())
}
