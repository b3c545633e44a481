use std::collections::HashMap;

use num::Zero;

use crate::{Cell, Word};

/// Sparse local variable store. Slots that were never written read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    slots: HashMap<Word, Cell>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Word) -> Cell {
        self.slots.get(&slot).cloned().unwrap_or_else(Cell::zero)
    }

    pub fn set(&mut self, slot: Word, value: Cell) {
        self.slots.insert(slot, value);
    }

    /// Number of slots that have been written.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Word, Cell)> + '_ {
        self.slots.iter().map(|(&slot, &value)| (slot, value))
    }

    pub fn to_map(&self) -> HashMap<Word, Cell> {
        self.slots.clone()
    }
}

/// Caller state saved by CALL and restored by RET.
#[derive(Clone, Debug)]
pub struct CallFrame {
    pub return_address: Word,
    pub locals: Frame,
}
