use clap::Parser;
use color_print::cprintln;

use sapemu::{Config, Machine, Outcome, StdDevice};

#[derive(Parser, Debug)]
#[clap(
    name = "SAP Emulator",
    author = "kanade-k-1228",
    version = "v1.0.0",
    about = "Virtual machine and debugger for SAP programs"
)]
struct Args {
    /// Start in the debugger; needs <NAME>.sym
    #[arg(short, long)]
    debug: bool,

    /// YAML file with machine sizes and debugger setup
    #[arg(short, long)]
    config: Option<String>,

    /// Program name; reads <NAME>.bin
    #[arg(default_value = "main")]
    name: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("SAP Emulator");

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", format!("{}.bin", args.name));
    println!("+-----------------------------------------------+");

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    println!("[INIT]");
    println!(
        " * Memory={} Registers={} Stack={}",
        config.memory, config.registers, config.stack
    );
    if args.debug {
        println!(" * Debugger (type help for commands)");
    }

    let mut machine = Machine::new(&config, StdDevice::new());
    let debug = args.debug.then_some(&config.debug);
    let outcome = sapemu::run_file(&mut machine, &args.name, debug)?;

    println!();
    println!("=================================================");
    match outcome {
        Outcome::Halted => cprintln!("<green>Halted</> at {}", machine.pc().wrapping_sub(1)),
        Outcome::Exited => cprintln!("<yellow>Exited</> at {}", machine.pc()),
        Outcome::Faulted(_) => {
            cprintln!("<red,bold>Faulted</> at {}", machine.pc());
            std::process::exit(1);
        }
    }
    Ok(())
}
