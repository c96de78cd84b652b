//! Runtime errors for the TACode engine.
//!
//! Every error carries the order of the instruction that triggered it and
//! maps onto exactly one process status code via [`RuntimeError::status`].
//! The display text is auxiliary; status-code behavior never depends on it.

use thiserror::Error;

/// Errors that terminate a run. Fail-fast: the first violation ends the
/// whole execution with the associated status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Wrong number of arguments for an opcode.
    #[error("{opcode} at order {order}: expected {expected} argument(s), got {got}")]
    BadArity {
        opcode: &'static str,
        order: u32,
        expected: usize,
        got: usize,
    },

    /// Variable reference without a frame separator or with a bad name.
    #[error("malformed variable '{text}' at order {order}")]
    MalformedVariable { text: String, order: u32 },

    /// Frame designator is not GF, LF, or TF.
    #[error("unknown frame designator '{text}' at order {order}")]
    UnknownFrame { text: String, order: u32 },

    /// A literal's text fails its type-specific grammar.
    #[error("malformed {tag} literal '{text}' at order {order}")]
    MalformedLiteral {
        tag: &'static str,
        text: String,
        order: u32,
    },

    /// A label name is empty or contains whitespace.
    #[error("malformed label at order {order}")]
    MalformedLabel { order: u32 },

    /// An argument required to be a variable reference is not one.
    #[error("operand at order {order} is not a variable")]
    OperandNotVariable { order: u32 },

    /// An argument required to be a label is not one.
    #[error("operand at order {order} is not a label")]
    OperandNotLabel { order: u32 },

    /// READ's type operand is not one of int/string/bool.
    #[error("invalid type name '{text}' at order {order}")]
    InvalidTypeName { text: String, order: u32 },

    /// Operand or result type does not fit the operation.
    #[error("{opcode} at order {order}: operand type mismatch")]
    TypeMismatch { opcode: &'static str, order: u32 },

    /// INT2CHAR operand does not name a valid character.
    #[error("invalid code point {code} at order {order}")]
    InvalidCodePoint { code: i64, order: u32 },

    /// A variable was declared twice in the same frame.
    #[error("variable '{name}' redefined at order {order}")]
    RedefinedVariable { name: String, order: u32 },

    /// A label was registered twice.
    #[error("label '{name}' redefined at order {order}")]
    RedefinedLabel { name: String, order: u32 },

    /// A jump/call names a label never declared.
    #[error("undefined label '{name}' at order {order}")]
    UndefinedLabel { name: String, order: u32 },

    /// A variable was read or written without being declared.
    #[error("undeclared variable '{name}' at order {order}")]
    UndeclaredVariable { name: String, order: u32 },

    /// The designated frame is not currently live.
    #[error("frame {frame} not live at order {order}")]
    FrameNotLive { frame: &'static str, order: u32 },

    /// A declared variable was read before any assignment.
    #[error("variable '{name}' read before assignment at order {order}")]
    UnsetVariable { name: String, order: u32 },

    /// POPS on an empty data stack.
    #[error("pop from empty data stack at order {order}")]
    EmptyDataStack { order: u32 },

    /// RETURN with an empty call stack.
    #[error("return with empty call stack at order {order}")]
    EmptyCallStack { order: u32 },

    /// POPFRAME with an empty frame stack.
    #[error("pop from empty frame stack at order {order}")]
    EmptyFrameStack { order: u32 },

    /// IDIV with a zero divisor.
    #[error("division by zero at order {order}")]
    DivisionByZero { order: u32 },

    /// EXIT operand outside [0, 49].
    #[error("exit code {code} out of range at order {order}")]
    ExitCodeOutOfRange { code: i64, order: u32 },

    /// String index outside the valid range.
    #[error("index {index} out of bounds (length {length}) at order {order}")]
    IndexOutOfBounds {
        index: i64,
        length: usize,
        order: u32,
    },
}

impl RuntimeError {
    /// Process status this error terminates the run with.
    pub fn status(&self) -> i32 {
        match self {
            RuntimeError::BadArity { .. }
            | RuntimeError::MalformedVariable { .. }
            | RuntimeError::UnknownFrame { .. }
            | RuntimeError::MalformedLiteral { .. }
            | RuntimeError::MalformedLabel { .. } => 32,

            RuntimeError::RedefinedVariable { .. }
            | RuntimeError::RedefinedLabel { .. }
            | RuntimeError::UndefinedLabel { .. } => 52,

            RuntimeError::OperandNotVariable { .. }
            | RuntimeError::OperandNotLabel { .. }
            | RuntimeError::InvalidTypeName { .. }
            | RuntimeError::TypeMismatch { .. }
            | RuntimeError::InvalidCodePoint { .. } => 53,

            RuntimeError::UndeclaredVariable { .. } => 54,

            RuntimeError::FrameNotLive { .. } | RuntimeError::EmptyFrameStack { .. } => 55,

            RuntimeError::UnsetVariable { .. }
            | RuntimeError::EmptyDataStack { .. }
            | RuntimeError::EmptyCallStack { .. } => 56,

            RuntimeError::DivisionByZero { .. } | RuntimeError::ExitCodeOutOfRange { .. } => 57,

            RuntimeError::IndexOutOfBounds { .. } => 58,
        }
    }
}
