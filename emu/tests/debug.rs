mod common;

use pretty_assertions::assert_eq;
use sapemu::{ChannelDevice, Config, Machine, Outcome};

use common::{debug, debug_with};

#[test]
fn pauses_before_first_instruction() {
    let (_, outcome, output) = debug("main: movir #1 r0\nhalt\n", &["dumpr", "go"]);
    assert_eq!(outcome, Outcome::Halted);
    let mut expect = String::from("dbg 0(main)>Registers:\n");
    for i in 0..10 {
        expect += &format!("r{}: 0\n", i);
    }
    assert_eq!(output, expect);
}

#[test]
fn breakpoint_and_change_register() {
    let input = ["sbrk #3", "go", "chngr r0 9", "go"];
    let (m, outcome, output) = debug("movir #1 r0\nmovrr r0 r1\nhalt\n", &input);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 3>");
    assert_eq!(m.reg(1), Ok(9));
}

#[test]
fn exit_stops_run() {
    let (m, outcome, _) = debug("movir #1 r0\nhalt\n", &["exit"]);
    assert_eq!(outcome, Outcome::Exited);
    assert_eq!(m.reg(0), Ok(0));
}

#[test]
fn closed_input_exits() {
    let (_, outcome, output) = debug("halt\n", &[]);
    assert_eq!(outcome, Outcome::Exited);
    assert_eq!(output, "dbg 0>");
}

#[test]
fn blank_lines_reprompt() {
    let (_, outcome, output) = debug("halt\n", &["", "  ", "go"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 0>dbg 0>");
}

#[test]
fn watch_pauses_after_change() {
    let source = "
.start main
count: .integer #0
main:  movir #5 r1
       movrm r1 count
       nop
       halt
";
    let input = ["swchm count", "go", "wcht", "go"];
    let (_, outcome, output) = debug(source, &input);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 1(main)>dbg 7>Watch variables:\n@0: 5\n");
}

#[test]
fn watch_off_runs_through() {
    let source = "
.start main
count: .integer #0
main:  movir #5 r1
       movrm r1 count
       halt
";
    let (_, outcome, output) = debug(source, &["swchr r1", "wchoff", "go"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 1(main)>");
}

#[test]
fn register_watch() {
    let (_, _, output) = debug("nop\nmovir #4 r2\nnop\nhalt\n", &["swchr r2", "go", "go"]);
    assert_eq!(output, "dbg 0>dbg 4>");
}

#[test]
fn out_of_range_watch_is_ignored() {
    let (m, _, output) = debug("halt\n", &["swchr r12", "swchm #-1", "wcht", "go"]);
    assert_eq!(output, "dbg 0>dbg 0>dbg 0>Watch variables:\ndbg 0>");
    let session = m.session().unwrap();
    assert!(session.watch);
    assert!(session.register_watch.is_empty());
    assert!(session.memory_watch.is_empty());
}

#[test]
fn brk_pauses() {
    let (_, outcome, output) = debug("brk\nhalt\n", &["go", "go"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 1>");
}

#[test]
fn disassemble_range() {
    let source = "main: movir #5 r1\nloop: sojnz r1 loop\nhalt\n";
    let (_, _, output) = debug(source, &["deas main #6", "exit"]);
    assert_eq!(
        output,
        "dbg 0(main)>main: movir #5 r1\nloop: sojnz r1 loop\nhalt\ndbg 0(main)>"
    );
}

#[test]
fn command_errors() {
    let input = ["bogus", "dump #1", "chngm #99999 1", "sbrk nowhere", "exit"];
    let (_, _, output) = debug("halt\n", &input);
    assert_eq!(
        output,
        "dbg 0>Unrecognized command: bogus\n\
         dbg 0>Not enough arguments.\n\
         dbg 0>Bad argument.\n\
         dbg 0>Bad argument.\n\
         dbg 0>"
    );
}

#[test]
fn breakpoint_table() {
    let input = ["sbrk #5", "sbrk #2", "brkt", "cbrk #5", "brkt", "cbrkt", "brkt", "exit"];
    let (_, _, output) = debug("halt\n", &input);
    assert_eq!(
        output,
        "dbg 0>dbg 0>dbg 0>Breakpoints: [2, 5]\n\
         dbg 0>dbg 0>Breakpoints: [2]\n\
         dbg 0>dbg 0>Breakpoints: []\n\
         dbg 0>"
    );
}

#[test]
fn dump_is_clamped() {
    let (_, _, output) = debug("halt\n", &["chngm #9999 3", "dump #9998 #20000", "exit"]);
    assert_eq!(output, "dbg 0>dbg 0>Memory:\n@9998: 0\n@9999: 3\ndbg 0>");
}

#[test]
fn entry_breakpoint_pauses_once() {
    let (_, outcome, output) = debug_with("movir #1 r0\nhalt\n", &["go"], |session| {
        session.breakpoints.insert(0);
    });
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>");
}

#[test]
fn breakpoint_in_loop_hits_each_pass() {
    let source = "
      movir #3 r1
loop: sojnz r1 loop
      halt
";
    let (_, outcome, output) = debug(source, &["sbrk loop", "go", "go", "go", "go"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 3(loop)>dbg 3(loop)>dbg 3(loop)>");
}

#[test]
fn go_to_location() {
    let (m, outcome, _) = debug("movir #1 r0\nmovir #2 r1\nhalt\n", &["go #3"]);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(m.reg(0), Ok(0));
    assert_eq!(m.reg(1), Ok(2));
}

#[test]
fn help_lists_commands() {
    let (_, _, output) = debug("halt\n", &["help", "exit"]);
    for cmd in ["go", "dumpr", "deas", "sbrk", "chngm", "swchr", "cwcht"] {
        assert!(output.contains(&format!("\n{} ", cmd)), "missing {}", cmd);
    }
}

#[test]
fn files_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("prog");
    let stem = stem.to_str().unwrap();
    let source = "
.start main
total: .integer #0
main:  movir #2 r1
loop:  addrr r1 r2
       sojnz r1 loop
       movrm r2 total
       halt
";
    std::fs::write(format!("{}.txt", stem), source).unwrap();
    assert!(sapasm::assemble_file(stem).unwrap().is_ok());

    let config = Config::from_yaml(
        "debug:
  breakpoints: [loop, nowhere]
",
    )
    .unwrap();
    let (device, host) = ChannelDevice::pair();
    for line in ["go", "dumpr", "go", "go"] {
        host.send_line(line);
    }
    let output = host.close();
    let mut m = Machine::new(&config, device);
    let outcome = sapemu::run_file(&mut m, stem, Some(&config.debug)).unwrap();

    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(m.get(0), Ok(3));
    let output: String = output.try_iter().collect();
    assert!(output.starts_with("Skipped unresolved breakpoint nowhere\ndbg 1(main)>dbg 4(loop)>"));
    assert!(output.ends_with("dbg 4(loop)>"));
}

#[test]
fn missing_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("prog");
    let stem = stem.to_str().unwrap();
    std::fs::write(format!("{}.bin", stem), "1\n0\n0\n").unwrap();

    let (device, _host) = ChannelDevice::pair();
    let mut m = Machine::new(&Config::default(), device);
    assert_eq!(sapemu::run_file(&mut m, stem, None).unwrap(), Outcome::Halted);
    assert!(matches!(
        sapemu::run_file(&mut m, stem, Some(&Default::default())),
        Err(sapemu::LoadError::FileOpen(..))
    ));
}

#[test]
fn step_pauses_after_each_instruction() {
    let source = "movir #1 r0\nmovir #2 r1\nnop\nhalt\n";
    let input = ["step", "step", "dump #0 #0", "go"];
    let (m, outcome, output) = debug(source, &input);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 3>dbg 6>Memory:\n@0: 5\ndbg 6>");
    assert_eq!(m.reg(1), Ok(2));
}

#[test]
fn breakpoint_after_step() {
    let input = ["sbrk #2", "step", "go", "go"];
    let (_, outcome, output) = debug("nop\nnop\nnop\nhalt\n", &input);
    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(output, "dbg 0>dbg 0>dbg 1>dbg 2>");
}
