use std::fmt;

use arch::{Arg, Inst, SymbolTable, Word};

/// One disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: Word,
    pub label: Option<String>,
    pub mnemonic: &'static str,
    pub operands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Inst(Line),
    /// Word at this address is not an opcode; disassembly stops here.
    Unknown(Word),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{}: ", label)?;
        }
        write!(f, "{}", self.mnemonic)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Entry::Inst(line) => write!(f, "{}", line),
            Entry::Unknown(_) => write!(f, "Error: Unrecognized command"),
        }
    }
}

fn operand(kind: Arg, word: Option<Word>, symbols: &SymbolTable) -> String {
    let Some(word) = word else {
        return "?".to_string();
    };
    match kind {
        Arg::Reg | Arg::Ind => format!("r{}", word),
        Arg::Imm => format!("#{}", word),
        Arg::Label => match symbols.label(word) {
            Some(label) => label.to_string(),
            None => format!("#{}", word),
        },
    }
}

/// Disassemble the instructions starting within `start..=end`. The range is
/// clamped to `memory`; operands may extend past `end`.
pub fn disassemble(memory: &[Word], start: Word, end: Word, symbols: &SymbolTable) -> Vec<Entry> {
    let mut entries = Vec::new();
    let last = (memory.len() as i64 - 1).min(end as i64);
    let mut addr = (start as i64).max(0);
    while addr <= last {
        let at = addr as usize;
        let Some(inst) = Inst::by_opcode(memory[at]) else {
            entries.push(Entry::Unknown(addr as Word));
            break;
        };
        let operands = inst
            .args
            .iter()
            .enumerate()
            .map(|(i, &kind)| operand(kind, memory.get(at + 1 + i).copied(), symbols))
            .collect();
        entries.push(Entry::Inst(Line {
            address: addr as Word,
            label: symbols.label(addr as Word).map(str::to_string),
            mnemonic: inst.mnemonic(),
            operands,
        }));
        addr += inst.size() as i64;
    }
    entries
}
