//! Line-oriented mnemonic assembler.
//!
//! Each non-blank line is `NAME` or `NAME INTEGER`. Lines are encoded
//! independently and concatenated; there are no labels, so jump targets are
//! absolute word indices.

use std::str::FromStr;

use thiserror::Error;

use crate::instructions::{Opcode, UNMAPPED_OPCODE};
use crate::program::Program;
use crate::Word;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("line {line}: {mnemonic} expects an integer argument")]
    MissingArgument { line: usize, mnemonic: String },
    #[error("line {line}: invalid integer argument '{token}'")]
    InvalidArgument { line: usize, token: String },
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic { line: usize, mnemonic: String },
}

/// Assembles `lines` into a program. Unknown mnemonics are encoded as
/// [`UNMAPPED_OPCODE`] and only fault once executed.
pub fn assemble<I, S>(lines: I) -> Result<Program, AssembleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    assemble_with(lines, false)
}

/// Like [`assemble`], but rejects unknown mnemonics up front.
pub fn assemble_strict<I, S>(lines: I) -> Result<Program, AssembleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    assemble_with(lines, true)
}

fn assemble_with<I, S>(lines: I, strict: bool) -> Result<Program, AssembleError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        encode_line(idx + 1, line, strict, &mut words)?;
    }
    Ok(Program::new(words))
}

fn encode_line(
    line_no: usize,
    line: &str,
    strict: bool,
    words: &mut Vec<Word>,
) -> Result<(), AssembleError> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or("");
    match Opcode::from_mnemonic(name) {
        Some(op) if op.has_immediate() => {
            let token = parts.next().ok_or_else(|| AssembleError::MissingArgument {
                line: line_no,
                mnemonic: name.to_owned(),
            })?;
            let arg = parse_operand::<Word>(token).ok_or_else(|| AssembleError::InvalidArgument {
                line: line_no,
                token: token.to_owned(),
            })?;
            words.push(op.code());
            words.push(arg);
        }
        Some(op) => words.push(op.code()),
        None if strict => {
            return Err(AssembleError::UnknownMnemonic {
                line: line_no,
                mnemonic: name.to_owned(),
            })
        }
        None => words.push(UNMAPPED_OPCODE),
    }

    match parts.next() {
        Some(token) => Err(AssembleError::UnexpectedToken {
            line: line_no,
            token: token.to_owned(),
        }),
        None => Ok(()),
    }
}

fn parse_operand<T: FromStr>(token: &str) -> Option<T> {
    token.parse::<T>().ok()
}
