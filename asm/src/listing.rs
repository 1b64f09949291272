use std::fmt;

use arch::Word;
use color_print::{cformat, cprintln};

use crate::error::Error;

/// Width of the address/word column before the source text.
pub const SOURCE_COLUMN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    /// `None` for blank lines.
    pub address: Option<Word>,
    pub words: Vec<Word>,
    pub error: Option<Error>,
    pub source: String,
}

impl Record {
    pub fn blank(line: usize) -> Self {
        Record {
            line,
            address: None,
            words: vec![],
            error: None,
            source: String::new(),
        }
    }

    fn prefix(&self) -> String {
        let mut prefix = format!("{} ", self.line);
        match &self.error {
            Some(err) => prefix.push_str(&format!("Error: {}", err)),
            None => {
                if let Some(addr) = self.address {
                    prefix.push_str(&format!("{}: ", addr));
                }
                // Anything past the column is cut by `fit_column` anyway.
                for word in &self.words {
                    if prefix.len() > SOURCE_COLUMN {
                        break;
                    }
                    prefix.push_str(&format!(" {}", word));
                }
            }
        }
        fit_column(&prefix, SOURCE_COLUMN)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            None if self.error.is_none() => write!(f, "{}", self.line),
            _ => write!(f, "{}{}", self.prefix(), self.source),
        }
    }
}

/// Pad to `width`, or cut at the last space that fits.
fn fit_column(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return format!("{:<width$}", s, width = width);
    }
    let cut: String = s.chars().take(width).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{:<width$}", cut, width = width)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Duplicate label definitions as `(label, line)`.
    pub duplicates: Vec<(String, usize)>,
    pub records: Vec<Record>,
    pub symbols: String,
    pub errors: usize,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.duplicates.is_empty()
    }

    /// Coloured dump for the terminal.
    pub fn cprint(&self) {
        if let Some(header) = self.duplicate_header() {
            cprintln!("<red,bold>{}</>", header);
        }
        println!("-------------------+-----------------------------------------------------");
        for record in &self.records {
            let body = match (&record.error, record.address) {
                (Some(err), _) => cformat!("<r,s>{:<18}</>", format!("{}", err)),
                (None, Some(addr)) => {
                    let words: Vec<String> = record.words.iter().map(|w| w.to_string()).collect();
                    cformat!("<g>{:>5}</>: <y>{:<11}</>", addr, words.join(" "))
                }
                (None, None) => format!("{:18}", ""),
            };
            println!("{} | {:>4}: {}", body, record.line, record.source);
        }
        println!("-------------------+-----------------------------------------------------");
        for line in self.symbols.lines() {
            cprintln!("  <c>{}</>", line);
        }
        match self.errors {
            0 => cprintln!("<g,s>No assembly errors</>"),
            n => cprintln!("<r,s>{} assembly error{}</>", n, if n == 1 { "" } else { "s" }),
        }
    }

    fn duplicate_header(&self) -> Option<String> {
        if self.duplicates.is_empty() {
            return None;
        }
        let names: Vec<String> = self
            .duplicates
            .iter()
            .map(|(label, line)| format!("{} in line {}", label, line))
            .collect();
        Some(format!(
            "Error! Duplicate label{}: {}",
            if names.len() > 1 { "s" } else { "" },
            names.join(", ")
        ))
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        if let Some(header) = self.duplicate_header() {
            write!(f, "{}\n\n", header)?;
        }
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        write!(f, "\nSymbol Table:\n{}", self.symbols)?;
        write!(f, "\nNumber Assembly Errors: {}", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_columns() {
        let record = Record {
            line: 3,
            address: Some(5),
            words: vec![5, 3, 1],
            error: None,
            source: "movir #3 r1".to_string(),
        };
        let text = record.to_string();
        assert_eq!(&text[..SOURCE_COLUMN], format!("{:<36}", "3 5:  5 3 1"));
        assert_eq!(&text[SOURCE_COLUMN..], "movir #3 r1");
    }

    #[test]
    fn record_error() {
        let record = Record {
            line: 7,
            address: Some(0),
            words: vec![],
            error: Some(Error::TooManyArguments),
            source: "halt r1".to_string(),
        };
        assert_eq!(
            record.to_string(),
            format!("{:<36}halt r1", "7 Error: Too many arguments.")
        );
    }

    #[test]
    fn long_prefix_cut_at_space() {
        let record = Record {
            line: 1,
            address: Some(0),
            words: (0..20).collect(),
            error: None,
            source: ".allocate #20".to_string(),
        };
        let text = record.to_string();
        assert!(text.ends_with(".allocate #20"));
        let prefix = &text[..SOURCE_COLUMN];
        assert!(prefix.starts_with("1 0:  0 1 2 3"));
        assert!(prefix.trim_end().ends_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn blank_record() {
        assert_eq!(Record::blank(12).to_string(), "12");
    }

    #[test]
    fn duplicate_header() {
        let listing = Listing {
            duplicates: vec![("a".to_string(), 2), ("b".to_string(), 5)],
            records: vec![Record::blank(1)],
            symbols: String::new(),
            errors: 2,
        };
        assert_eq!(
            listing.to_string(),
            "Error! Duplicate labels: a in line 2, b in line 5\n\n1\n\nSymbol Table:\n\nNumber Assembly Errors: 2"
        );
    }
}
