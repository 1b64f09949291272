use arch::{Program, SymbolTable, Word};

use crate::error::Error;
use crate::listing::{Listing, Record};
use crate::parser::{resolve, Line, Stmt};

/// Largest program the assembler will lay out, in words.
pub const MAX_WORDS: usize = 1 << 20;

const _: () = assert!(MAX_WORDS <= Word::MAX as usize);

/// Word address of `pc`, which never exceeds `MAX_WORDS`.
fn address(pc: usize) -> Word {
    Word::try_from(pc).unwrap_or(Word::MAX)
}

/// Address following `stmt` when it is placed at `pc`. Fails before any
/// words are built if the program would outgrow `MAX_WORDS`.
fn advance(pc: usize, stmt: &Stmt) -> Result<usize, Error> {
    match pc.checked_add(stmt.size()).filter(|&end| end <= MAX_WORDS) {
        Some(end) => Ok(end),
        None => Err(match stmt {
            Stmt::Allocate(n) => Error::BadArgument(format!("#{}", n)),
            _ => Error::TooLarge,
        }),
    }
}

/// Result of one assembly run. The program is only usable when `errors`
/// is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub listing: Listing,
    pub symbols: SymbolTable,
    pub words: Vec<Word>,
    pub entry: Word,
    pub errors: usize,
}

impl Assembly {
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    pub fn program(&self) -> Option<Program> {
        self.is_ok()
            .then(|| Program::new(self.words.clone(), self.entry))
    }
}

/// Assemble source text in two passes.
pub fn assemble(source: &str) -> Assembly {
    if source.split_whitespace().next().is_none() {
        return Assembly {
            listing: Listing::default(),
            symbols: SymbolTable::new(),
            words: vec![],
            entry: 0,
            errors: 0,
        };
    }
    let lines: Vec<&str> = source.lines().collect();

    let (symbols, duplicates) = collect_labels(&lines);
    log::debug!(
        "pass 1: {} labels, {} duplicates",
        symbols.len(),
        duplicates.len()
    );

    let pass = encode(&lines, &symbols);
    log::debug!(
        "pass 2: {} words, {} line errors",
        pass.words.len(),
        pass.errors
    );

    let errors = duplicates.len() + pass.errors;
    Assembly {
        listing: Listing {
            duplicates,
            records: pass.records,
            symbols: symbols.dump(),
            errors,
        },
        symbols,
        words: pass.words,
        entry: pass.entry,
        errors,
    }
}

/// Pass 1: bind every label to the address its line starts at. Lines that
/// fail to parse occupy nothing; their errors are reported by pass 2.
fn collect_labels(lines: &[&str]) -> (SymbolTable, Vec<(String, usize)>) {
    let mut symbols = SymbolTable::new();
    let mut duplicates = vec![];
    let mut pc: usize = 0;
    for (idx, raw) in lines.iter().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line = Line::split(raw);
        if let Some(label) = line.label {
            if symbols.insert(label, address(pc)) {
                duplicates.push((label.trim().to_lowercase(), idx + 1));
            }
        }
        if line.is_end() {
            break;
        }
        if let Ok(Some(stmt)) = Stmt::parse(line.code) {
            if let Ok(end) = advance(pc, &stmt) {
                pc = end;
            }
        }
    }
    (symbols, duplicates)
}

struct Pass {
    records: Vec<Record>,
    words: Vec<Word>,
    entry: Word,
    errors: usize,
}

/// Pass 2: encode each line against the complete symbol table.
fn encode(lines: &[&str], symbols: &SymbolTable) -> Pass {
    let mut pass = Pass {
        records: vec![],
        words: vec![],
        entry: 0,
        errors: 0,
    };
    for (idx, raw) in lines.iter().enumerate() {
        if raw.trim().is_empty() {
            pass.records.push(Record::blank(idx + 1));
            continue;
        }
        let line = Line::split(raw);
        pass.line(idx + 1, raw.trim(), line.code, symbols);
        if line.is_end() {
            return pass;
        }
    }
    pass.line(lines.len() + 1, ".end ;implicit", ".end", symbols);
    pass
}

impl Pass {
    fn line(&mut self, line: usize, source: &str, code: &str, symbols: &SymbolTable) {
        let start = self.words.len();
        let encoded = Stmt::parse(code).and_then(|stmt| match stmt {
            Some(Stmt::Start(label)) => {
                self.entry = resolve(&label, symbols)?;
                Ok(vec![])
            }
            Some(stmt) => {
                advance(start, &stmt)?;
                stmt.encode(symbols)
            }
            None => Ok(vec![]),
        });
        let (words, error) = match encoded {
            Ok(words) => (words, None),
            Err(err) => {
                self.errors += 1;
                (vec![], Some(err))
            }
        };
        self.words.extend_from_slice(&words);
        self.records.push(Record {
            line,
            address: Some(address(start)),
            words,
            error,
            source: source.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_reference() {
        let asm = assemble("jmp done\nnop\ndone: halt\n");
        assert!(asm.is_ok());
        assert_eq!(asm.words, vec![28, 3, 56, 0]);
        assert_eq!(asm.symbols.address("done"), Some(3));
    }

    #[test]
    fn undefined_start_is_a_line_error() {
        let asm = assemble(".start nowhere\nhalt\n");
        assert_eq!(asm.errors, 1);
        assert_eq!(
            asm.listing.records[0].error,
            Some(Error::UndefinedLabel("nowhere".to_string()))
        );
        assert_eq!(asm.entry, 0);
        assert_eq!(asm.words, vec![0]);
    }

    #[test]
    fn start_sets_entry() {
        let asm = assemble(".start main\ndata: .integer #9\nmain: halt\n.end\n");
        assert_eq!(asm.entry, 1);
        assert_eq!(asm.program(), Some(Program::new(vec![9, 0], 1)));
    }

    #[test]
    fn stops_at_end() {
        let asm = assemble("halt\n.end\nthis is not code\nlater: nop\n");
        assert!(asm.is_ok());
        assert_eq!(asm.words, vec![0]);
        assert_eq!(asm.symbols.address("later"), None);
        assert_eq!(asm.listing.records.len(), 2);
    }

    #[test]
    fn implicit_end() {
        let asm = assemble("halt\n");
        let last = asm.listing.records.last().unwrap();
        assert_eq!(last.line, 2);
        assert_eq!(last.source, ".end ;implicit");
    }

    #[test]
    fn failed_line_emits_nothing() {
        let asm = assemble("movir #1\nhere: halt\n");
        assert_eq!(asm.errors, 1);
        assert_eq!(asm.words, vec![0]);
        assert_eq!(asm.symbols.address("here"), Some(0));
        assert_eq!(asm.listing.records[0].error, Some(Error::MissingArgument));
        assert_eq!(asm.program(), None);
    }

    #[test]
    fn empty_source() {
        let asm = assemble("  \n\n");
        assert!(asm.is_ok());
        assert!(asm.listing.is_empty());
        assert_eq!(asm.listing.to_string(), "");
    }
}
