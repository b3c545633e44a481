use thiserror::Error;

/// Illegal-operation conditions recorded by the processor. Every fault is
/// terminal: the processor halts and the fault is never cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Fault {
    /// A two-operand instruction was missing an operand, or divided by zero.
    #[error("binary operation fault")]
    BinaryOp,
    /// A one-operand instruction found the stack empty.
    #[error("unary operation fault")]
    UnaryOp,
    /// POP, DUP, JIF or STORE on an empty stack, or RET with no caller.
    #[error("stack operation fault")]
    StackOp,
    /// Fetched word is not an opcode, lies outside the program, or an
    /// immediate operand is missing.
    #[error("dispatch fault")]
    Dispatch,
}
