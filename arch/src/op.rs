use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::Word;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Opcode {
    HALT,
    CLRR,
    CLRX,
    CLRM,
    CLRB,
    MOVIR,
    MOVRR,
    MOVRM,
    MOVMR,
    MOVXR,
    MOVAR,
    MOVB,
    ADDIR,
    ADDRR,
    ADDMR,
    ADDXR,
    SUBIR,
    SUBRR,
    SUBMR,
    SUBXR,
    MULIR,
    MULRR,
    MULMR,
    MULXR,
    DIVIR,
    DIVRR,
    DIVMR,
    DIVXR,
    JMP,
    SOJZ,
    SOJNZ,
    AOJZ,
    AOJNZ,
    CMPIR,
    CMPRR,
    CMPMR,
    JMPN,
    JMPZ,
    JMPP,
    JSR,
    RET,
    PUSH,
    POP,
    STACKC,
    OUTCI,
    OUTCR,
    OUTCX,
    OUTCB,
    READI,
    PRINTI,
    READC,
    READLN,
    BRK,
    MOVRX,
    MOVXX,
    OUTS,
    NOP,
    JMPNE,
}

impl Opcode {
    /// Decode a memory word. Anything outside `0..=57` is not an opcode.
    pub fn from_word(word: Word) -> Option<Self> {
        u8::try_from(word)
            .ok()
            .and_then(|byte| Self::try_from(byte).ok())
    }

    pub fn word(self) -> Word {
        u8::from(self) as Word
    }

    pub fn mnemonic(self) -> &'static str {
        self.into()
    }
}

/// Operand kinds. `Reg` and `Ind` share the `rN` syntax and are both
/// encoded as a bare register index; only the opcode tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Arg {
    #[strum(serialize = "register")]
    Reg,
    #[strum(serialize = "immediate")]
    Imm,
    #[strum(serialize = "label")]
    Label,
    #[strum(serialize = "indirect")]
    Ind,
}
