use arch::{Arg, Inst, SymbolTable, Word};

use crate::error::Error;

// ----------------------------------------------------------------------------
// Line

/// A source line with its comment removed and its label split off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub label: Option<&'a str>,
    pub code: &'a str,
}

impl<'a> Line<'a> {
    pub fn split(raw: &'a str) -> Self {
        let code = match raw.find(';') {
            Some(idx) => &raw[..idx],
            None => raw,
        };
        match code.find(':') {
            Some(idx) => Line {
                label: Some(&code[..idx]),
                code: &code[idx + 1..],
            },
            None => Line { label: None, code },
        }
    }

    /// `.end` stops a pass even when the rest of the line is malformed.
    pub fn is_end(&self) -> bool {
        self.code
            .split_whitespace()
            .next()
            .map_or(false, |cmd| cmd.eq_ignore_ascii_case(".end"))
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Inst(&'static Inst, Vec<Operand>),
    Start(String),
    End,
    Integer(Word),
    Allocate(Word),
    Str(String),
}

impl Stmt {
    /// Parse the code part of a line. Blank code is `Ok(None)`.
    pub fn parse(code: &str) -> Result<Option<Stmt>, Error> {
        let code = code.trim();
        let (cmd, rest) = match code.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest),
            None => (code, ""),
        };
        if cmd.is_empty() {
            return Ok(None);
        }
        let mut args = rest.split_whitespace();

        // Take the next argument and parse it with the given function
        // Example: arg!(parse_imm) -> Word
        macro_rules! arg {
            ($parse:ident) => {{
                let arg = args.next().ok_or(Error::MissingArgument)?;
                $parse(arg)?
            }};
        }

        let stmt = match cmd.to_ascii_lowercase().as_str() {
            ".start" => Stmt::Start(arg!(parse_name)),
            ".end" => Stmt::End,
            ".integer" => Stmt::Integer(arg!(parse_imm)),
            ".allocate" => Stmt::Allocate(arg!(parse_imm)),
            // The string runs to the end of the line, spaces included.
            ".string" => return parse_string(rest).map(|s| Some(Stmt::Str(s))),
            _ => {
                let inst = Inst::by_mnemonic(cmd)
                    .ok_or_else(|| Error::UnknownCommand(cmd.to_string()))?;
                let mut operands = Vec::with_capacity(inst.args.len());
                for kind in inst.args {
                    operands.push(match kind {
                        Arg::Reg | Arg::Ind => Operand::Reg(arg!(parse_reg)),
                        Arg::Imm => Operand::Imm(arg!(parse_imm)),
                        Arg::Label => Operand::Label(arg!(parse_name)),
                    });
                }
                Stmt::Inst(inst, operands)
            }
        };

        match args.next() {
            Some(_) => Err(Error::TooManyArguments),
            None => Ok(Some(stmt)),
        }
    }

    /// Words the statement occupies. Needs no label addresses.
    pub fn size(&self) -> usize {
        match self {
            Stmt::Inst(inst, _) => inst.size(),
            Stmt::Start(_) | Stmt::End => 0,
            Stmt::Integer(_) => 1,
            Stmt::Allocate(n) => usize::try_from(*n).unwrap_or(0),
            Stmt::Str(s) => s.chars().count() + 1,
        }
    }

    /// Encode into words, resolving label operands. `.start` emits nothing;
    /// the assembler resolves its label into the entry address.
    pub fn encode(&self, symbols: &SymbolTable) -> Result<Vec<Word>, Error> {
        match self {
            Stmt::Inst(inst, operands) => {
                let mut words = Vec::with_capacity(inst.size());
                words.push(inst.opcode.word());
                for operand in operands {
                    words.push(operand.resolve(symbols)?);
                }
                Ok(words)
            }
            Stmt::Start(_) | Stmt::End => Ok(vec![]),
            Stmt::Integer(value) => Ok(vec![*value]),
            Stmt::Allocate(_) => Ok(vec![0; self.size()]),
            Stmt::Str(s) => {
                let mut words = Vec::with_capacity(self.size());
                words.push(s.chars().count() as Word);
                words.extend(s.chars().map(|c| c as Word));
                Ok(words)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Operand

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Word),
    Imm(Word),
    Label(String),
}

impl Operand {
    pub fn resolve(&self, symbols: &SymbolTable) -> Result<Word, Error> {
        match self {
            Operand::Reg(r) => Ok(*r),
            Operand::Imm(v) => Ok(*v),
            Operand::Label(label) => resolve(label, symbols),
        }
    }
}

pub fn resolve(label: &str, symbols: &SymbolTable) -> Result<Word, Error> {
    symbols
        .address(label)
        .ok_or_else(|| Error::UndefinedLabel(label.to_string()))
}

fn parse_reg(s: &str) -> Result<Word, Error> {
    s.strip_prefix(|c: char| c == 'r' || c == 'R')
        .and_then(|num| num.parse::<Word>().ok())
        .ok_or_else(|| Error::BadArgument(s.to_string()))
}

fn parse_imm(s: &str) -> Result<Word, Error> {
    s.strip_prefix('#')
        .and_then(|num| num.parse::<Word>().ok())
        .ok_or_else(|| Error::BadArgument(s.to_string()))
}

fn parse_name(s: &str) -> Result<String, Error> {
    Ok(s.to_string())
}

fn parse_string(s: &str) -> Result<String, Error> {
    let s = s.trim();
    match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(body) => Ok(body.to_string()),
        None => Err(Error::UnquotedString),
    }
}
