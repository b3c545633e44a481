use std::fmt;

use num::ToPrimitive;

use crate::Word;

/// Word emitted for a mnemonic that is not in the instruction table.
/// It never decodes, so executing it is a dispatch fault.
pub const UNMAPPED_OPCODE: Word = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Halt = 0,
    Push = 1,
    Pop = 2,
    Dup = 3,
    Add = 4,
    Sub = 5,
    Mul = 6,
    Div = 7,
    Not = 8,
    And = 9,
    Or = 10,
    Eq = 11,
    Gt = 12,
    Gte = 13,
    Jmp = 14,
    Jif = 15,
    Load = 16,
    Store = 17,
    Call = 18,
    Ret = 19,
}

/// Mnemonic table shared by the assembler and the decoder, indexed by code.
static INSTRUCTION_TABLE: [(&str, Opcode); 20] = [
    ("HALT", Opcode::Halt),
    ("PUSH", Opcode::Push),
    ("POP", Opcode::Pop),
    ("DUP", Opcode::Dup),
    ("ADD", Opcode::Add),
    ("SUB", Opcode::Sub),
    ("MUL", Opcode::Mul),
    ("DIV", Opcode::Div),
    ("NOT", Opcode::Not),
    ("AND", Opcode::And),
    ("OR", Opcode::Or),
    ("EQ", Opcode::Eq),
    ("GT", Opcode::Gt),
    ("GTE", Opcode::Gte),
    ("JMP", Opcode::Jmp),
    ("JIF", Opcode::Jif),
    ("LOAD", Opcode::Load),
    ("STORE", Opcode::Store),
    ("CALL", Opcode::Call),
    ("RET", Opcode::Ret),
];

impl Opcode {
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        INSTRUCTION_TABLE
            .iter()
            .find(|(mnemonic, _)| *mnemonic == name)
            .map(|&(_, op)| op)
    }

    pub fn from_word(word: Word) -> Option<Opcode> {
        word.to_usize()
            .and_then(|idx| INSTRUCTION_TABLE.get(idx))
            .map(|&(_, op)| op)
    }

    pub fn code(self) -> Word {
        self as Word
    }

    pub fn mnemonic(self) -> &'static str {
        INSTRUCTION_TABLE[self as usize].0
    }

    /// Whether the opcode is followed by one immediate operand word.
    pub fn has_immediate(self) -> bool {
        match self {
            Opcode::Push
            | Opcode::Jmp
            | Opcode::Jif
            | Opcode::Load
            | Opcode::Store
            | Opcode::Call => true,
            _ => false,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
