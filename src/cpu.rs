use std::mem;

use log::{debug, log_enabled, trace, warn, Level};
use num::{One, Zero};

use crate::fault::Fault;
use crate::frame::{CallFrame, Frame};
use crate::instructions::Opcode;
use crate::program::Program;
use crate::{Cell, Word};

enum ExecutionStatus {
    Normal,
    Halt,
    Call(Word),
    Return,
}

/// Stack processor executing a single [`Program`].
///
/// Faults never escape [`Cpu::step`] or [`Cpu::run`]; they are recorded and
/// the processor halts. Poll [`Cpu::fault`] after running.
pub struct Cpu {
    program: Program,
    ip: Word,
    stack: Vec<Cell>,
    frame: Frame,
    call_stack: Vec<CallFrame>,
    halted: bool,
    fault: Option<Fault>,
}

impl Cpu {
    /// An empty program gives a processor that is already halted and ignores
    /// every operation.
    pub fn new<P: Into<Program>>(program: P) -> Self {
        let program = program.into();
        let halted = program.is_empty();
        Cpu {
            program,
            ip: 0,
            stack: Vec::new(),
            frame: Frame::new(),
            call_stack: Vec::new(),
            halted,
            fault: None,
        }
    }

    pub fn run(&mut self) {
        while !self.halted {
            self.step();
        }
    }

    pub fn step(&mut self) {
        if self.halted {
            return;
        }
        let at = self.ip;
        match self.execute(at) {
            Ok(ExecutionStatus::Normal) => (),
            Ok(ExecutionStatus::Halt) => {
                debug!("Halted at {} with stack depth {}", at, self.stack.len());
                self.halted = true;
            }
            Ok(ExecutionStatus::Call(target)) => {
                debug!("Calling {} from {}, returning to {}", target, at, self.ip);
                let caller = CallFrame {
                    return_address: self.ip,
                    locals: mem::replace(&mut self.frame, Frame::new()),
                };
                self.call_stack.push(caller);
                self.ip = target;
            }
            Ok(ExecutionStatus::Return) => match self.call_stack.pop() {
                Some(caller) => {
                    debug!("Returning from {} to {}", at, caller.return_address);
                    self.frame = caller.locals;
                    self.ip = caller.return_address;
                }
                None => self.raise(Fault::StackOp, at),
            },
            Err(fault) => self.raise(fault, at),
        }
    }

    pub fn ip(&self) -> Word {
        self.ip
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// The recorded fault as an error, for callers that propagate with `?`.
    pub fn check(&self) -> Result<(), Fault> {
        match self.fault {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// Operand stack contents, top first.
    pub fn stack(&self) -> Vec<Cell> {
        self.stack.iter().rev().cloned().collect()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Variables of the currently executing context.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Number of CALLs not yet matched by a RET.
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    fn raise(&mut self, fault: Fault, at: Word) {
        warn!("{} at {}, halting", fault, at);
        if log_enabled!(Level::Debug) {
            debug!("Code:\n{}", self.program.listing(Some(at)));
        }
        self.fault = Some(fault);
        self.halted = true;
    }

    fn fetch(&mut self) -> Option<Word> {
        let word = self.program.fetch(self.ip);
        self.ip = self.ip.saturating_add(1);
        word
    }

    fn fetch_operand(&mut self) -> Result<Word, Fault> {
        self.fetch().ok_or(Fault::Dispatch)
    }

    fn execute(&mut self, at: Word) -> Result<ExecutionStatus, Fault> {
        let op = self
            .fetch()
            .and_then(Opcode::from_word)
            .ok_or(Fault::Dispatch)?;
        trace!("[{:0>4}] {}", at, op);

        match op {
            Opcode::Halt => return Ok(ExecutionStatus::Halt),
            Opcode::Push => {
                let value = self.fetch_operand()?;
                self.stack.push(value as Cell);
            }
            Opcode::Pop => {
                self.stack.pop().ok_or(Fault::StackOp)?;
            }
            Opcode::Dup => {
                let top = self.stack.last().cloned().ok_or(Fault::StackOp)?;
                self.stack.push(top);
            }
            Opcode::Add => self.binary(|a, b| a + b)?,
            Opcode::Sub => self.binary(|a, b| a - b)?,
            Opcode::Mul => self.binary(|a, b| a * b)?,
            Opcode::Div => {
                let (left, right) = self.pop_operands()?;
                if right.is_zero() {
                    return Err(Fault::BinaryOp);
                }
                self.stack.push(left / right);
            }
            Opcode::Not => {
                let value = self.stack.pop().ok_or(Fault::UnaryOp)?;
                self.stack.push(truth(value.is_zero()));
            }
            Opcode::And => self.binary(|a, b| truth(is_truthy(a) && is_truthy(b)))?,
            Opcode::Or => self.binary(|a, b| truth(is_truthy(a) || is_truthy(b)))?,
            Opcode::Eq => self.binary(|a, b| truth(a == b))?,
            Opcode::Gt => self.binary(|a, b| truth(a > b))?,
            Opcode::Gte => self.binary(|a, b| truth(a >= b))?,
            Opcode::Jmp => {
                self.ip = self.fetch_operand()?;
            }
            Opcode::Jif => {
                let target = self.fetch_operand()?;
                let condition = self.stack.pop().ok_or(Fault::StackOp)?;
                if is_truthy(condition) {
                    self.ip = target;
                }
            }
            Opcode::Load => {
                let slot = self.fetch_operand()?;
                let value = self.frame.get(slot);
                self.stack.push(value);
            }
            Opcode::Store => {
                let slot = self.fetch_operand()?;
                let value = self.stack.pop().ok_or(Fault::StackOp)?;
                self.frame.set(slot, value);
            }
            Opcode::Call => return Ok(ExecutionStatus::Call(self.fetch_operand()?)),
            Opcode::Ret => return Ok(ExecutionStatus::Return),
        }
        Ok(ExecutionStatus::Normal)
    }

    /// Pops right then left. Operands that were present stay consumed even
    /// when the other one is missing.
    fn pop_operands(&mut self) -> Result<(Cell, Cell), Fault> {
        let right = self.stack.pop();
        let left = self.stack.pop();
        match (left, right) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(Fault::BinaryOp),
        }
    }

    #[inline(always)]
    fn binary(&mut self, operator: fn(Cell, Cell) -> Cell) -> Result<(), Fault> {
        let (left, right) = self.pop_operands()?;
        self.stack.push(operator(left, right));
        Ok(())
    }
}

fn is_truthy(value: Cell) -> bool {
    !value.is_zero()
}

fn truth(value: bool) -> Cell {
    if value {
        Cell::one()
    } else {
        Cell::zero()
    }
}
