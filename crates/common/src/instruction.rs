//! Instruction and argument-set representation.

use crate::arg::Arg;
use crate::error::ProgramError;
use crate::opcode::Opcode;

/// Up to three positionally-ordered arguments.
///
/// Positions must be contiguous from the first: an instruction may not
/// carry a third argument without the first two. That check belongs to
/// the core contract, not the front end, so it lives in the constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Args {
    slots: [Option<Arg>; 3],
}

impl Args {
    /// Build an argument set, rejecting gaps in the positions.
    pub fn new(
        arg1: Option<Arg>,
        arg2: Option<Arg>,
        arg3: Option<Arg>,
    ) -> Result<Self, ProgramError> {
        if arg3.is_some() && (arg2.is_none() || arg1.is_none()) {
            return Err(ProgramError::ArgumentGap { position: 3 });
        }
        if arg2.is_some() && arg1.is_none() {
            return Err(ProgramError::ArgumentGap { position: 2 });
        }
        Ok(Self {
            slots: [arg1, arg2, arg3],
        })
    }

    /// An empty argument set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a vector of present arguments (always contiguous).
    pub fn from_vec(args: Vec<Arg>) -> Self {
        let mut it = args.into_iter();
        Self {
            slots: [it.next(), it.next(), it.next()],
        }
    }

    /// Number of present arguments.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|a| a.is_some()).count()
    }

    /// The argument at zero-based position `idx`, if present.
    pub fn get(&self, idx: usize) -> Option<&Arg> {
        self.slots.get(idx).and_then(|a| a.as_ref())
    }
}

/// One decoded instruction: order, opcode, and up to three arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Positive unique integer; storage key and execution sequencing.
    pub order: u32,
    pub opcode: Opcode,
    pub args: Args,
}

impl Instruction {
    pub fn new(order: u32, opcode: Opcode, args: Args) -> Self {
        Self {
            order,
            opcode,
            args,
        }
    }
}
