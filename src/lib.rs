pub mod assembler;
pub mod cpu;
pub mod fault;
pub mod frame;
pub mod instructions;
pub mod program;

pub use assembler::{assemble, assemble_strict, AssembleError};
pub use cpu::Cpu;
pub use fault::Fault;
pub use frame::Frame;
pub use instructions::{Opcode, UNMAPPED_OPCODE};
pub use program::Program;

/// One unit of program memory: an opcode or an immediate operand.
pub type Word = i64;

/// The numeric value held on the operand stack and in frame slots.
pub type Cell = f64;
