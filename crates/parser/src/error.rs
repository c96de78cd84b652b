//! Error types for the TACode source parser.

use tacode_common::ProgramError;
use thiserror::Error;

/// Errors produced while parsing source text into a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The `.TACODE` header line is missing or malformed.
    #[error("missing or invalid .TACODE header")]
    MissingHeader,

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An explicit order prefix is zero or not a decimal number.
    #[error("line {line}: invalid order prefix '{token}'")]
    InvalidOrder { line: usize, token: String },

    /// An instruction has the wrong number of operands.
    #[error("line {line}: {opcode} expects {expected} operand(s), got {got}")]
    WrongOperandCount {
        line: usize,
        opcode: &'static str,
        expected: usize,
        got: usize,
    },

    /// An operand token does not fit its position's kind.
    #[error("line {line}: '{token}' is not a valid {kind} operand")]
    BadOperand {
        line: usize,
        token: String,
        kind: &'static str,
    },

    /// The shared program builder rejected the instruction.
    #[error("line {line}: {source}")]
    Program { line: usize, source: ProgramError },
}

impl ParseError {
    /// Process status for this error: 31 for stream structure, 32 for
    /// lexical or structural faults.
    pub fn status(&self) -> i32 {
        match self {
            ParseError::MissingHeader => 31,
            _ => 32,
        }
    }
}
