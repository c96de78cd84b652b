//! TACode virtual machine — executes order-keyed instruction programs.
//!
//! The machine models three variable scopes (a global frame, a stack of
//! local frames, and a temporary staging frame), a data stack for PUSHS
//! and POPS, and a call stack of return positions. A pre-pass registers
//! every label before the first instruction runs, so forward jumps work.
//!
//! # Usage
//!
//! ```
//! use tacode_common::{Arg, Args, Instruction, Opcode, Program};
//! use tacode_vm::{run, Input};
//!
//! let program = Program::from_instructions(vec![Instruction::new(
//!     1,
//!     Opcode::Write,
//!     Args::from_vec(vec![Arg::new(tacode_common::ArgTag::String, "hi")]),
//! )])
//! .unwrap();
//!
//! let mut out = Vec::new();
//! let mut diag = Vec::new();
//! let status = run(&program, Input::from_text(""), &mut out, &mut diag).unwrap();
//! assert_eq!(status, 0);
//! assert_eq!(out, b"hi");
//! ```

pub mod error;
pub mod execute;
pub mod frame;
pub mod input;
pub mod machine;
mod operand;

pub use error::RuntimeError;
pub use frame::{Frame, FrameKind};
pub use input::Input;
pub use machine::Interpreter;

use std::io::Write;

use tacode_common::Program;

/// Execute a program and return its process status.
///
/// This is the primary entry point for the machine. It:
/// 1. Builds a fresh execution context over `program`
/// 2. Runs the label pre-pass
/// 3. Executes until the counter passes the last order, or EXIT
///
/// `Ok(0)` means the program ran off the end; any other `Ok` value is an
/// EXIT operand. Regular output goes to `out`, DPRINT and BREAK go to
/// `diag`.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails; [`RuntimeError::status`]
/// gives the process status the failure maps to.
pub fn run(
    program: &Program,
    input: Input,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<i32, RuntimeError> {
    let mut interpreter = Interpreter::new(program, input, out, diag);
    interpreter.execute()
}
