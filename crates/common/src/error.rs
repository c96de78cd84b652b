//! Structural errors for TACode instruction streams.

use thiserror::Error;

/// Violations of the instruction-stream contract, detected while building
/// a [`crate::Program`] or an argument set.
///
/// All variants map to process status 32.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// Two instructions share the same order number.
    #[error("duplicate instruction order {order}")]
    DuplicateOrder { order: u32 },

    /// An instruction order is not a positive integer.
    #[error("instruction order must be positive")]
    NonPositiveOrder,

    /// A positional argument is present without its predecessors.
    #[error("argument {position} present without earlier arguments")]
    ArgumentGap { position: usize },
}

impl ProgramError {
    /// Process status for this error.
    pub fn status(&self) -> i32 {
        32
    }
}
