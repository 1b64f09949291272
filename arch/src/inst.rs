use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::op::{Arg, Opcode};
use crate::Word;

/// One row of the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub opcode: Opcode,
    pub args: &'static [Arg],
}

const fn inst(opcode: Opcode, args: &'static [Arg]) -> Inst {
    Inst { opcode, args }
}

use Arg::{Imm as I, Ind as X, Label as L, Reg as R};
use Opcode::*;

/// Indexed by opcode number.
pub static TABLE: [Inst; 58] = [
    inst(HALT, &[]),
    inst(CLRR, &[R]),
    inst(CLRX, &[X]),
    inst(CLRM, &[L]),
    inst(CLRB, &[R, R]),
    inst(MOVIR, &[I, R]),
    inst(MOVRR, &[R, R]),
    inst(MOVRM, &[R, L]),
    inst(MOVMR, &[L, R]),
    inst(MOVXR, &[X, R]),
    inst(MOVAR, &[L, R]),
    inst(MOVB, &[R, R, R]),
    inst(ADDIR, &[I, R]),
    inst(ADDRR, &[R, R]),
    inst(ADDMR, &[L, R]),
    inst(ADDXR, &[X, R]),
    inst(SUBIR, &[I, R]),
    inst(SUBRR, &[R, R]),
    inst(SUBMR, &[L, R]),
    inst(SUBXR, &[X, R]),
    inst(MULIR, &[I, R]),
    inst(MULRR, &[R, R]),
    inst(MULMR, &[L, R]),
    inst(MULXR, &[X, R]),
    inst(DIVIR, &[I, R]),
    inst(DIVRR, &[R, R]),
    inst(DIVMR, &[L, R]),
    inst(DIVXR, &[X, R]),
    inst(JMP, &[L]),
    inst(SOJZ, &[R, L]),
    inst(SOJNZ, &[R, L]),
    inst(AOJZ, &[R, L]),
    inst(AOJNZ, &[R, L]),
    inst(CMPIR, &[I, R]),
    inst(CMPRR, &[R, R]),
    inst(CMPMR, &[L, R]),
    inst(JMPN, &[L]),
    inst(JMPZ, &[L]),
    inst(JMPP, &[L]),
    inst(JSR, &[L]),
    inst(RET, &[]),
    inst(PUSH, &[R]),
    inst(POP, &[R]),
    inst(STACKC, &[R]),
    inst(OUTCI, &[I]),
    inst(OUTCR, &[R]),
    inst(OUTCX, &[X]),
    inst(OUTCB, &[R, R]),
    inst(READI, &[R, R]),
    inst(PRINTI, &[R]),
    inst(READC, &[R]),
    inst(READLN, &[L, R]),
    inst(BRK, &[]),
    inst(MOVRX, &[R, X]),
    inst(MOVXX, &[X, X]),
    inst(OUTS, &[L]),
    inst(NOP, &[]),
    inst(JMPNE, &[L]),
];

static BY_MNEMONIC: Lazy<HashMap<&'static str, &'static Inst>> =
    Lazy::new(|| TABLE.iter().map(|inst| (inst.mnemonic(), inst)).collect());

impl Inst {
    pub fn by_opcode(word: Word) -> Option<&'static Inst> {
        Opcode::from_word(word).map(|op| &TABLE[u8::from(op) as usize])
    }

    pub fn by_mnemonic(name: &str) -> Option<&'static Inst> {
        BY_MNEMONIC.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn mnemonic(&self) -> &'static str {
        self.opcode.mnemonic()
    }

    /// Words occupied by the encoded instruction.
    pub fn size(&self) -> usize {
        1 + self.args.len()
    }
}
