use clap::Parser;
use color_print::cprintln;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Program name; reads <NAME>.txt and writes <NAME>.lst, .sym and .bin
    #[clap(default_value = "main")]
    name: String,

    /// Dump the listing to the terminal
    #[clap(short, long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("SAP Assembler");

    println!("1. Assemble {}.txt", args.name);
    let asm = sapasm::assemble_file(&args.name)?;

    if args.dump {
        asm.listing.cprint();
    }

    let source = std::fs::read_to_string(format!("{}.txt", args.name))?;
    let lines: Vec<&str> = source.lines().collect();
    for record in &asm.listing.records {
        if let Some(err) = &record.error {
            let line = lines.get(record.line - 1).copied().unwrap_or("");
            err.print_diag(&format!("{}.txt", args.name), record.line, line);
        }
    }
    for (label, line) in &asm.listing.duplicates {
        let raw = lines.get(line - 1).copied().unwrap_or("");
        sapasm::Error::DuplicateLabel(label.clone()).print_diag(
            &format!("{}.txt", args.name),
            *line,
            raw,
        );
    }

    println!("2. Output");
    println!("  > {}.lst", args.name);
    println!("  > {}.sym", args.name);
    if asm.is_ok() {
        println!("  > {}.bin ({} words)", args.name, asm.words.len());
        Ok(())
    } else {
        cprintln!(
            "<red,bold>{} error{}</> in program. See listing for details.",
            asm.errors,
            if asm.errors == 1 { "" } else { "s" }
        );
        std::process::exit(1);
    }
}
