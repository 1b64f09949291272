use std::collections::HashMap;

use thiserror::Error;

use crate::Word;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SymbolsError {
    #[error("Line {0}: expected `label address`")]
    Malformed(usize),

    #[error("Line {0}: cannot parse `{1}` as address")]
    BadAddress(usize, String),
}

/// Labels are stored trimmed and lowercased. The inverse map keeps the most
/// recent label written for an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    addresses: HashMap<String, Word>,
    labels: HashMap<Word, String>,
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the label was already defined.
    pub fn insert(&mut self, label: &str, address: Word) -> bool {
        let label = normalize(label);
        self.labels.insert(address, label.clone());
        self.addresses.insert(label, address).is_some()
    }

    pub fn address(&self, label: &str) -> Option<Word> {
        self.addresses.get(&normalize(label)).copied()
    }

    pub fn label(&self, address: Word) -> Option<&str> {
        self.labels.get(&address).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.addresses.clear();
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn entries_by_label(&self) -> Vec<(&str, Word)> {
        let mut entries: Vec<_> = self
            .addresses
            .iter()
            .map(|(label, addr)| (label.as_str(), *addr))
            .collect();
        entries.sort();
        entries
    }

    pub fn entries_by_address(&self) -> Vec<(&str, Word)> {
        let mut entries = self.entries_by_label();
        entries.sort_by_key(|(_, addr)| *addr);
        entries
    }

    /// Symbol artifact: one `label address` pair per line, sorted by label.
    pub fn dump(&self) -> String {
        self.entries_by_label()
            .into_iter()
            .map(|(label, addr)| format!("{} {}\n", label, addr))
            .collect()
    }

    pub fn parse(text: &str) -> Result<Self, SymbolsError> {
        let mut table = Self::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Address is the last word; the label may itself contain spaces.
            let (label, addr) = line
                .rsplit_once(char::is_whitespace)
                .ok_or(SymbolsError::Malformed(idx + 1))?;
            let addr = addr
                .parse::<Word>()
                .map_err(|_| SymbolsError::BadAddress(idx + 1, addr.to_string()))?;
            table.insert(label, addr);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_whitespace_insensitive() {
        let mut table = SymbolTable::new();
        assert!(!table.insert("  Loop ", 4));
        assert_eq!(table.address("LOOP"), Some(4));
        assert_eq!(table.address(" loop"), Some(4));
        assert_eq!(table.label(4), Some("loop"));
        assert_eq!(table.address("done"), None);
        assert_eq!(table.label(5), None);
    }

    #[test]
    fn duplicate_overwrites() {
        let mut table = SymbolTable::new();
        assert!(!table.insert("a", 1));
        assert!(table.insert("A", 7));
        assert_eq!(table.address("a"), Some(7));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn alias_last_writer_wins() {
        let mut table = SymbolTable::new();
        assert!(!table.insert("first", 3));
        assert!(!table.insert("second", 3));
        assert_eq!(table.label(3), Some("second"));
        assert_eq!(table.address("first"), Some(3));
        assert_eq!(table.entries_by_label(), vec![("first", 3), ("second", 3)]);
    }

    #[test]
    fn sorted_views() {
        let mut table = SymbolTable::new();
        table.insert("zeta", 0);
        table.insert("alpha", 9);
        table.insert("mid", 4);
        assert_eq!(
            table.entries_by_label(),
            vec![("alpha", 9), ("mid", 4), ("zeta", 0)]
        );
        assert_eq!(
            table.entries_by_address(),
            vec![("zeta", 0), ("mid", 4), ("alpha", 9)]
        );
        assert_eq!(table.dump(), "alpha 9\nmid 4\nzeta 0\n");
    }

    #[test]
    fn parse_dump() {
        let table = SymbolTable::parse("done 12\nloop 3\n\n").unwrap();
        assert_eq!(table.address("done"), Some(12));
        assert_eq!(table.label(3), Some("loop"));
        assert_eq!(
            SymbolTable::parse("loop\n"),
            Err(SymbolsError::Malformed(1))
        );
        let spaced = SymbolTable::parse("my label 8\n").unwrap();
        assert_eq!(spaced.address("my label"), Some(8));
        assert_eq!(
            SymbolTable::parse("a 1\nb x\n"),
            Err(SymbolsError::BadAddress(2, "x".to_string()))
        );
    }

    #[test]
    fn clear() {
        let mut table = SymbolTable::new();
        table.insert("a", 1);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.label(1), None);
    }
}
