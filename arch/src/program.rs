use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Word;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Missing {0}")]
    MissingHeader(&'static str),

    #[error("Cannot parse `{0}` as integer")]
    ParseWord(String),

    #[error("Program declares {0} words but contains {1}")]
    SizeMismatch(usize, usize),

    #[error("Negative program size: {0}")]
    NegativeSize(Word),
}

/// An assembled program: the words to load at address 0 and the address
/// execution starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub words: Vec<Word>,
    pub entry: Word,
}

impl Program {
    pub fn new(words: Vec<Word>, entry: Word) -> Self {
        Program { words, entry }
    }

    /// Program artifact: word count, entry address, then one word per line.
    pub fn dump(&self) -> String {
        let mut out = format!("{}\n{}\n", self.words.len(), self.entry);
        for word in &self.words {
            out.push_str(&word.to_string());
            out.push('\n');
        }
        out
    }

    pub fn parse(text: &str) -> Result<Self, ProgramError> {
        let mut tokens = text.split_whitespace().map(|tok| {
            tok.parse::<Word>()
                .map_err(|_| ProgramError::ParseWord(tok.to_string()))
        });
        let size = tokens
            .next()
            .ok_or(ProgramError::MissingHeader("word count"))??;
        let size = usize::try_from(size).map_err(|_| ProgramError::NegativeSize(size))?;
        let entry = tokens
            .next()
            .ok_or(ProgramError::MissingHeader("entry address"))??;
        let words = tokens.collect::<Result<Vec<_>, _>>()?;
        if words.len() != size {
            return Err(ProgramError::SizeMismatch(size, words.len()));
        }
        Ok(Program { words, entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_layout() {
        let prog = Program::new(vec![5, 5, 0, 0], 0);
        assert_eq!(prog.dump(), "4\n0\n5\n5\n0\n0\n");
        assert_eq!(Program::default().dump(), "0\n0\n");
    }

    #[test]
    fn parse_artifact() {
        let prog = Program::parse("3\n1\n56\n-4\n0\n").unwrap();
        assert_eq!(prog, Program::new(vec![56, -4, 0], 1));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Program::parse(""),
            Err(ProgramError::MissingHeader("word count"))
        );
        assert_eq!(
            Program::parse("2"),
            Err(ProgramError::MissingHeader("entry address"))
        );
        assert_eq!(
            Program::parse("2\n0\n1\nx\n"),
            Err(ProgramError::ParseWord("x".to_string()))
        );
        assert_eq!(
            Program::parse("2\n0\n1\n"),
            Err(ProgramError::SizeMismatch(2, 1))
        );
        assert_eq!(Program::parse("-1\n0\n"), Err(ProgramError::NegativeSize(-1)));
    }
}
