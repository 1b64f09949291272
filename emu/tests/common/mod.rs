#![allow(dead_code)]

use arch::SymbolTable;
use sapemu::{ChannelDevice, Config, Machine, Outcome};

pub fn assemble(source: &str) -> (arch::Program, SymbolTable) {
    let asm = sapasm::assemble(source);
    assert!(asm.is_ok(), "assembly failed:\n{}", asm.listing);
    let program = asm.program().unwrap();
    (program, asm.symbols)
}

pub fn boot(source: &str) -> (Machine<ChannelDevice>, sapemu::Host) {
    let (program, _) = assemble(source);
    let (device, host) = ChannelDevice::pair();
    let mut machine = Machine::new(&Config::default(), device);
    machine.load(&program).unwrap();
    (machine, host)
}

/// Run `source` with `input` queued and the input then closed. Returns the
/// machine, the outcome and everything written.
pub fn run(source: &str, input: &[&str]) -> (Machine<ChannelDevice>, Outcome, String) {
    let (mut machine, host) = boot(source);
    for line in input {
        host.send_line(*line);
    }
    let output = host.close();
    let outcome = machine.run();
    (machine, outcome, output.try_iter().collect())
}

/// Like `run`, but as a debug session with the assembled symbols.
pub fn debug(source: &str, input: &[&str]) -> (Machine<ChannelDevice>, Outcome, String) {
    debug_with(source, input, |_| {})
}

pub fn debug_with(
    source: &str,
    input: &[&str],
    setup: impl FnOnce(&mut sapemu::Session),
) -> (Machine<ChannelDevice>, Outcome, String) {
    let (program, symbols) = assemble(source);
    let (device, host) = ChannelDevice::pair();
    let mut machine = Machine::new(&Config::default(), device);
    machine.load(&program).unwrap();
    setup(machine.debug(symbols));
    for line in input {
        host.send_line(*line);
    }
    let output = host.close();
    let outcome = machine.run();
    (machine, outcome, output.try_iter().collect())
}
