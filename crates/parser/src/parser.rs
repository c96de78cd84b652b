//! Parser for TACode source tokens → instructions.
//!
//! Each line is classified against the opcode's operand signature. Tokens
//! keep their raw text; grammar validation beyond token shape belongs to
//! the engine.

use tacode_common::{Arg, ArgTag, Args, Instruction, Opcode, OperandKind};

use crate::error::ParseError;

/// Parse one line of tokens into an instruction.
///
/// `default_order` applies when the line carries no explicit `N:` prefix.
/// Returns `Ok(None)` for an empty token list.
pub(crate) fn parse_line(
    tokens: &[&str],
    line: usize,
    default_order: u32,
) -> Result<Option<Instruction>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let (order, rest) = match parse_order_prefix(tokens[0], line)? {
        Some(order) => (order, &tokens[1..]),
        None => (default_order, tokens),
    };

    let mnemonic = match rest.first() {
        Some(token) => *token,
        None => {
            // A bare order prefix with nothing after it.
            return Err(ParseError::InvalidOrder {
                line,
                token: tokens[0].to_string(),
            });
        }
    };
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| ParseError::UnknownOpcode {
        line,
        token: mnemonic.to_string(),
    })?;

    let operands = &rest[1..];
    let signature = opcode.signature();
    if operands.len() != signature.len() {
        return Err(ParseError::WrongOperandCount {
            line,
            opcode: opcode.mnemonic(),
            expected: signature.len(),
            got: operands.len(),
        });
    }

    let mut args = Vec::with_capacity(operands.len());
    for (&token, &kind) in operands.iter().zip(signature) {
        args.push(classify(token, kind, line)?);
    }

    Ok(Some(Instruction::new(order, opcode, Args::from_vec(args))))
}

/// An explicit `N:` order prefix, if the token is one.
fn parse_order_prefix(token: &str, line: usize) -> Result<Option<u32>, ParseError> {
    let digits = match token.strip_suffix(':') {
        Some(digits) => digits,
        None => return Ok(None),
    };
    let order: u32 = digits.parse().map_err(|_| ParseError::InvalidOrder {
        line,
        token: token.to_string(),
    })?;
    if order == 0 {
        return Err(ParseError::InvalidOrder {
            line,
            token: token.to_string(),
        });
    }
    Ok(Some(order))
}

const VAR_PREFIXES: [&str; 3] = ["GF", "LF", "TF"];

/// Classify one operand token against its position's kind.
fn classify(token: &str, kind: OperandKind, line: usize) -> Result<Arg, ParseError> {
    let bad = |kind: &'static str| ParseError::BadOperand {
        line,
        token: token.to_string(),
        kind,
    };
    match kind {
        OperandKind::Var => match token.split_once('@') {
            Some((prefix, _)) if VAR_PREFIXES.contains(&prefix) => Ok(Arg::var(token)),
            _ => Err(bad("var")),
        },
        OperandKind::Symb => match token.split_once('@') {
            Some((prefix, _)) if VAR_PREFIXES.contains(&prefix) => Ok(Arg::var(token)),
            Some((prefix, rest)) => match ArgTag::literal_from_prefix(prefix) {
                Some(tag) => Ok(Arg::new(tag, rest)),
                None => Err(bad("symb")),
            },
            None => Err(bad("symb")),
        },
        OperandKind::Label => {
            if token.contains('@') {
                return Err(bad("label"));
            }
            Ok(Arg::label(token))
        }
        OperandKind::Type => {
            if token.contains('@') {
                return Err(bad("type"));
            }
            Ok(Arg::new(ArgTag::Type, token))
        }
    }
}
