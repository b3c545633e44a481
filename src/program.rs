use std::fmt::Write;

use num::ToPrimitive;

use crate::instructions::Opcode;
use crate::Word;

/// Immutable word memory executed by the processor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    pub fn new(words: Vec<Word>) -> Self {
        Program { words }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `ip`, or `None` when `ip` lies outside the program.
    pub fn fetch(&self, ip: Word) -> Option<Word> {
        ip.to_usize().and_then(|idx| self.words.get(idx)).cloned()
    }

    /// Disassembly, one instruction per line. The instruction starting at
    /// `ip` is marked with `>`.
    pub fn listing(&self, ip: Option<Word>) -> String {
        let mut out = String::new();
        let mut idx = 0;
        while idx < self.words.len() {
            let marker = if ip == Some(idx as Word) { ">" } else { " " };
            let word = self.words[idx];
            let _ = match Opcode::from_word(word) {
                Some(op) if op.has_immediate() => match self.words.get(idx + 1) {
                    Some(arg) => {
                        let line = writeln!(out, "{} [{:0>4}] {} {}", marker, idx, op, arg);
                        idx += 1;
                        line
                    }
                    None => writeln!(out, "{} [{:0>4}] {} <missing>", marker, idx, op),
                },
                Some(op) => writeln!(out, "{} [{:0>4}] {}", marker, idx, op),
                None => writeln!(out, "{} [{:0>4}] ?? {}", marker, idx, word),
            };
            idx += 1;
        }
        out
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Program::new(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_is_bounds_checked() {
        let program = Program::new(vec![1, 42, 0]);
        assert_eq!(program.fetch(0), Some(1));
        assert_eq!(program.fetch(2), Some(0));
        assert_eq!(program.fetch(3), None);
        assert_eq!(program.fetch(-1), None);
    }

    #[test]
    fn listing_marks_current_instruction() {
        let program = Program::new(vec![1, 42, 2, 99, 14]);
        let listing = program.listing(Some(2));
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "  [0000] PUSH 42",
                "> [0002] POP",
                "  [0003] ?? 99",
                "  [0004] JMP <missing>",
            ]
        );
    }
}
