//! Program representation: an order-keyed instruction table.
//!
//! Order numbers need not be contiguous or input-sorted, but must be
//! distinct and positive. Iteration is always in ascending order.

use std::collections::BTreeMap;

use crate::error::ProgramError;
use crate::instruction::Instruction;

/// A TACode program: instructions keyed by order number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    instructions: BTreeMap<u32, Instruction>,
}

impl Program {
    /// An empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a program from a list of instructions.
    pub fn from_instructions(
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Result<Self, ProgramError> {
        let mut program = Self::new();
        for ins in instructions {
            program.insert(ins)?;
        }
        Ok(program)
    }

    /// Insert one instruction, rejecting a zero order or a duplicate order.
    pub fn insert(&mut self, instruction: Instruction) -> Result<(), ProgramError> {
        if instruction.order == 0 {
            return Err(ProgramError::NonPositiveOrder);
        }
        let order = instruction.order;
        if self.instructions.contains_key(&order) {
            return Err(ProgramError::DuplicateOrder { order });
        }
        self.instructions.insert(order, instruction);
        Ok(())
    }

    /// The instruction at `order`, if any. Gaps are valid.
    pub fn get(&self, order: u32) -> Option<&Instruction> {
        self.instructions.get(&order)
    }

    /// The largest order present, or None for an empty program.
    pub fn max_order(&self) -> Option<u32> {
        self.instructions.keys().next_back().copied()
    }

    /// Instructions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.values()
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
