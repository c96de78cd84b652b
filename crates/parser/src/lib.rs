//! TACode source parser — text → order-keyed instruction program.
//!
//! The source format is line-oriented: a `.TACODE` header, then one
//! instruction per line, with `#` comments and an optional explicit
//! `N:` order prefix. Without a prefix, orders run consecutively from 1.
//!
//! # Usage
//!
//! ```
//! use tacode_parser::parse;
//!
//! let program = parse(
//!     ".TACODE
//!     DEFVAR GF@x          # declare
//!     MOVE GF@x int@42
//!     WRITE GF@x",
//! )
//! .unwrap();
//! assert_eq!(program.len(), 3);
//! ```

pub mod error;

mod lexer;
mod parser;

pub use error::ParseError;

use lexer::tokenize_line;
use parser::parse_line;
use tacode_common::Program;

/// Parse TACode source text into a program.
///
/// Returns the first error encountered. Header problems are status 31;
/// everything else is a lexical/structural fault (32).
pub fn parse(text: &str) -> Result<Program, ParseError> {
    let mut lines = text.lines().enumerate();

    // The first meaningful line must be the header.
    let mut saw_header = false;
    for (_, line) in lines.by_ref() {
        let tokens = tokenize_line(line);
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() == 1 && tokens[0].eq_ignore_ascii_case(".TACODE") {
            saw_header = true;
        }
        break;
    }
    if !saw_header {
        return Err(ParseError::MissingHeader);
    }

    let mut program = Program::new();
    let mut next_order: u32 = 1;
    for (idx, line) in lines {
        let line_num = idx + 1;
        let tokens = tokenize_line(line);
        if let Some(ins) = parse_line(&tokens, line_num, next_order)? {
            next_order = ins.order.saturating_add(1);
            program
                .insert(ins)
                .map_err(|source| ParseError::Program {
                    line: line_num,
                    source,
                })?;
        }
    }
    Ok(program)
}
