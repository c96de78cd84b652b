//! The main execution loop and per-opcode semantics.
//!
//! Execution is fail-fast: the first violated contract ends the run with
//! that error's status. The program counter walks order numbers upward;
//! gaps between orders are skipped, jumps assign the counter directly.

use std::cmp::Ordering;
use std::io::Write;

use tacode_common::{decode_escapes, Arg, ArgTag, Instruction, Opcode, Value};

use crate::error::RuntimeError;
use crate::frame::Frame;
use crate::machine::Interpreter;

/// What the counter does after one instruction.
pub(crate) enum Flow {
    /// Advance to the next order.
    Continue,
    /// Transfer to this order.
    Jump(u32),
    /// Stop the run with this status.
    Exit(i32),
}

impl Interpreter<'_> {
    /// Run the program to completion and return the process status.
    ///
    /// Status 0 means the counter walked past the last order; any other
    /// value came from EXIT. Contract violations surface as errors.
    pub fn execute(&mut self) -> Result<i32, RuntimeError> {
        self.resolve_labels()?;
        let program = self.program;
        let max_order = match program.max_order() {
            Some(max) => max,
            None => return Ok(0),
        };

        self.pc = 1;
        while self.pc <= max_order {
            let ins = match program.get(self.pc) {
                Some(ins) => ins,
                None => {
                    self.pc += 1;
                    continue;
                }
            };
            let flow = self.step(ins)?;
            self.executed += 1;
            match flow {
                Flow::Continue => {
                    self.pc = match self.pc.checked_add(1) {
                        Some(next) => next,
                        None => break,
                    }
                }
                Flow::Jump(target) => self.pc = target,
                Flow::Exit(code) => return Ok(code),
            }
        }
        Ok(0)
    }

    /// Execute one instruction.
    fn step(&mut self, ins: &Instruction) -> Result<Flow, RuntimeError> {
        let order = ins.order;
        let expected = ins.opcode.arity();
        let got = ins.args.count();
        if expected != got {
            return Err(RuntimeError::BadArity {
                opcode: ins.opcode.mnemonic(),
                order,
                expected,
                got,
            });
        }

        match ins.opcode {
            Opcode::CreateFrame => {
                self.temporary = Some(Frame::new());
            }
            Opcode::PushFrame => {
                let frame = self
                    .temporary
                    .take()
                    .ok_or(RuntimeError::FrameNotLive { frame: "TF", order })?;
                self.frame_stack.push(frame);
            }
            Opcode::PopFrame => {
                let frame = self
                    .frame_stack
                    .pop()
                    .ok_or(RuntimeError::EmptyFrameStack { order })?;
                self.temporary = Some(frame);
            }
            Opcode::DefVar => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let name = var.name.clone();
                if !self.frame_mut(var.kind, order)?.declare(&var.name) {
                    return Err(RuntimeError::RedefinedVariable { name, order });
                }
            }
            Opcode::Move => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let value = self.resolve_symbol(arg(ins, 1)?, order)?;
                self.store_var(&var, value, order)?;
            }
            Opcode::Pushs => {
                let value = self.resolve_symbol(arg(ins, 0)?, order)?;
                self.data_stack.push(value);
            }
            Opcode::Pops => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                self.ensure_declared(&var, order)?;
                let value = self
                    .data_stack
                    .pop()
                    .ok_or(RuntimeError::EmptyDataStack { order })?;
                self.store_var(&var, value, order)?;
            }

            // Registered by the pre-pass; a no-op in the main loop.
            Opcode::Label => {}
            Opcode::Jump => {
                let name = crate::operand::resolve_label(arg(ins, 0)?, order)?;
                return Ok(Flow::Jump(self.label_target(name, order)?));
            }
            Opcode::JumpIfEq | Opcode::JumpIfNeq => {
                let name = crate::operand::resolve_label(arg(ins, 0)?, order)?.to_string();
                let lhs = self.resolve_symbol(arg(ins, 1)?, order)?;
                let rhs = self.resolve_symbol(arg(ins, 2)?, order)?;
                let equal = jump_equal(&lhs, &rhs, ins.opcode.mnemonic(), order)?;
                // The label is consulted only when the branch is taken.
                if equal == (ins.opcode == Opcode::JumpIfEq) {
                    return Ok(Flow::Jump(self.label_target(&name, order)?));
                }
            }
            Opcode::Call => {
                let name = crate::operand::resolve_label(arg(ins, 0)?, order)?;
                let target = self.label_target(name, order)?;
                self.call_stack.push(order);
                return Ok(Flow::Jump(target));
            }
            Opcode::Return => {
                let call_site = self
                    .call_stack
                    .pop()
                    .ok_or(RuntimeError::EmptyCallStack { order })?;
                // Resume past the call site; Continue advances from there.
                self.pc = call_site;
            }

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Idiv => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let mnemonic = ins.opcode.mnemonic();
                let a = self.int_operand(arg(ins, 1)?, mnemonic, order)?;
                let b = self.int_operand(arg(ins, 2)?, mnemonic, order)?;
                let result = match ins.opcode {
                    Opcode::Add => a.wrapping_add(b),
                    Opcode::Sub => a.wrapping_sub(b),
                    Opcode::Mul => a.wrapping_mul(b),
                    _ => {
                        if b == 0 {
                            return Err(RuntimeError::DivisionByZero { order });
                        }
                        floor_div(a, b)
                    }
                };
                self.store_var(&var, Value::Int(result), order)?;
            }

            Opcode::Lt | Opcode::Gt => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let lhs = self.resolve_symbol(arg(ins, 1)?, order)?;
                let rhs = self.resolve_symbol(arg(ins, 2)?, order)?;
                let ordering = compare(&lhs, &rhs, ins.opcode.mnemonic(), order)?;
                let result = match ins.opcode {
                    Opcode::Lt => ordering == Ordering::Less,
                    _ => ordering == Ordering::Greater,
                };
                self.store_var(&var, Value::Bool(result), order)?;
            }
            Opcode::Eq => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let lhs = self.resolve_symbol(arg(ins, 1)?, order)?;
                let rhs = self.resolve_symbol(arg(ins, 2)?, order)?;
                let equal = strict_equal(&lhs, &rhs).ok_or(RuntimeError::TypeMismatch {
                    opcode: "EQ",
                    order,
                })?;
                self.store_var(&var, Value::Bool(equal), order)?;
            }

            Opcode::And | Opcode::Or => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let mnemonic = ins.opcode.mnemonic();
                let a = self.bool_operand(arg(ins, 1)?, mnemonic, order)?;
                let b = self.bool_operand(arg(ins, 2)?, mnemonic, order)?;
                let result = match ins.opcode {
                    Opcode::And => a && b,
                    _ => a || b,
                };
                self.store_var(&var, Value::Bool(result), order)?;
            }
            Opcode::Not => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let a = self.bool_operand(arg(ins, 1)?, "NOT", order)?;
                self.store_var(&var, Value::Bool(!a), order)?;
            }

            Opcode::Int2Char => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let code = self.int_operand(arg(ins, 1)?, "INT2CHAR", order)?;
                let ch = u32::try_from(code)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(RuntimeError::InvalidCodePoint { code, order })?;
                self.store_var(&var, Value::Str(ch.to_string()), order)?;
            }
            Opcode::Stri2Int => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let text = self.str_operand(arg(ins, 1)?, "STRI2INT", order)?;
                let index = self.int_operand(arg(ins, 2)?, "STRI2INT", order)?;
                let ch = char_at(&text, index, order)?;
                self.store_var(&var, Value::Int(ch as i64), order)?;
            }
            Opcode::Concat => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let mut text = self.str_operand(arg(ins, 1)?, "CONCAT", order)?;
                text.push_str(&self.str_operand(arg(ins, 2)?, "CONCAT", order)?);
                self.store_var(&var, Value::Str(text), order)?;
            }
            Opcode::Strlen => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let text = self.str_operand(arg(ins, 1)?, "STRLEN", order)?;
                self.store_var(&var, Value::Int(text.chars().count() as i64), order)?;
            }
            Opcode::GetChar => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let text = self.str_operand(arg(ins, 1)?, "GETCHAR", order)?;
                let index = self.int_operand(arg(ins, 2)?, "GETCHAR", order)?;
                let ch = char_at(&text, index, order)?;
                self.store_var(&var, Value::Str(ch.to_string()), order)?;
            }
            Opcode::SetChar => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let target = match self.load_var(&var, false, order)? {
                    Some(Value::Str(text)) => text,
                    Some(_) => {
                        return Err(RuntimeError::TypeMismatch {
                            opcode: "SETCHAR",
                            order,
                        })
                    }
                    None => {
                        return Err(RuntimeError::UnsetVariable {
                            name: var.name.clone(),
                            order,
                        })
                    }
                };
                let index = self.int_operand(arg(ins, 1)?, "SETCHAR", order)?;
                let replacement = self.str_operand(arg(ins, 2)?, "SETCHAR", order)?;
                let first = replacement.chars().next().ok_or(
                    // An empty replacement has no character to substitute.
                    RuntimeError::IndexOutOfBounds {
                        index: 0,
                        length: 0,
                        order,
                    },
                )?;
                let mut chars: Vec<char> = target.chars().collect();
                let len = chars.len();
                let slot = usize::try_from(index)
                    .ok()
                    .filter(|&i| i < len)
                    .ok_or(RuntimeError::IndexOutOfBounds {
                        index,
                        length: len,
                        order,
                    })?;
                chars[slot] = first;
                self.store_var(&var, Value::Str(chars.into_iter().collect()), order)?;
            }

            Opcode::Read => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                self.ensure_declared(&var, order)?;
                let type_arg = arg(ins, 1)?;
                if type_arg.tag != ArgTag::Type {
                    return Err(RuntimeError::InvalidTypeName {
                        text: type_arg.text.clone(),
                        order,
                    });
                }
                let requested = type_arg.text.as_str();
                if !matches!(requested, "int" | "string" | "bool") {
                    return Err(RuntimeError::InvalidTypeName {
                        text: requested.to_string(),
                        order,
                    });
                }
                let value = match self.input.next_line() {
                    None => Value::Nil,
                    Some(line) => match requested {
                        "int" => match line.trim().parse::<i64>() {
                            Ok(n) => Value::Int(n),
                            Err(_) => Value::Nil,
                        },
                        // Anything whose lowercase form is not "true" reads
                        // as false.
                        "bool" => Value::Bool(line.to_lowercase() == "true"),
                        _ => Value::Str(line),
                    },
                };
                self.store_var(&var, value, order)?;
            }
            Opcode::Write => {
                let value = self.resolve_symbol(arg(ins, 0)?, order)?;
                let text = match &value {
                    Value::Nil => String::new(),
                    Value::Str(raw) => decode_escapes(raw),
                    other => other.raw_text(),
                };
                // Output failures have no slot in the status taxonomy.
                let _ = self.out.write_all(text.as_bytes());
            }
            Opcode::Type => {
                let var = self.resolve_var(arg(ins, 0)?, order)?;
                let text = match self.resolve_symbol_or_unset(arg(ins, 1)?, true, order)? {
                    Some(value) => value.type_name().to_string(),
                    None => String::new(),
                };
                self.store_var(&var, Value::Str(text), order)?;
            }

            Opcode::Exit => {
                let code = self.int_operand(arg(ins, 0)?, "EXIT", order)?;
                if !(0..=49).contains(&code) {
                    return Err(RuntimeError::ExitCodeOutOfRange { code, order });
                }
                return Ok(Flow::Exit(code as i32));
            }
            Opcode::Dprint => {
                let value = self.resolve_symbol(arg(ins, 0)?, order)?;
                // Like WRITE, no separator is added after the payload.
                let _ = self.diag.write_all(value.raw_text().as_bytes());
            }
            Opcode::Break => {
                let snapshot = self.snapshot();
                let _ = self.diag.write_all(snapshot.as_bytes());
            }
        }
        Ok(Flow::Continue)
    }

    fn int_operand(
        &self,
        arg: &Arg,
        opcode: &'static str,
        order: u32,
    ) -> Result<i64, RuntimeError> {
        match self.resolve_symbol(arg, order)? {
            Value::Int(n) => Ok(n),
            _ => Err(RuntimeError::TypeMismatch { opcode, order }),
        }
    }

    fn bool_operand(
        &self,
        arg: &Arg,
        opcode: &'static str,
        order: u32,
    ) -> Result<bool, RuntimeError> {
        match self.resolve_symbol(arg, order)? {
            Value::Bool(b) => Ok(b),
            _ => Err(RuntimeError::TypeMismatch { opcode, order }),
        }
    }

    fn str_operand(
        &self,
        arg: &Arg,
        opcode: &'static str,
        order: u32,
    ) -> Result<String, RuntimeError> {
        match self.resolve_symbol(arg, order)? {
            Value::Str(s) => Ok(s),
            _ => Err(RuntimeError::TypeMismatch { opcode, order }),
        }
    }
}

/// Convenience accessor; arity is checked before any handler runs.
fn arg<'i>(ins: &'i Instruction, idx: usize) -> Result<&'i Arg, RuntimeError> {
    ins.args.get(idx).ok_or(RuntimeError::BadArity {
        opcode: ins.opcode.mnemonic(),
        order: ins.order,
        expected: ins.opcode.arity(),
        got: ins.args.count(),
    })
}

/// Floor division: the quotient rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Native ordering for same-typed operands. String operands compare with
/// the sides swapped; that direction is pinned by test.
fn compare(
    lhs: &Value,
    rhs: &Value,
    opcode: &'static str,
    order: u32,
) -> Result<Ordering, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(b.cmp(a)),
        _ => Err(RuntimeError::TypeMismatch { opcode, order }),
    }
}

/// Equality over identically-typed operands; None for a type mismatch.
fn strict_equal(lhs: &Value, rhs: &Value) -> Option<bool> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a == b),
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        (Value::Str(a), Value::Str(b)) => Some(a == b),
        (Value::Nil, Value::Nil) => Some(true),
        _ => None,
    }
}

/// Conditional-jump equality: one nil operand compares unequal to any
/// non-nil operand instead of failing.
fn jump_equal(
    lhs: &Value,
    rhs: &Value,
    opcode: &'static str,
    order: u32,
) -> Result<bool, RuntimeError> {
    match strict_equal(lhs, rhs) {
        Some(equal) => Ok(equal),
        None if *lhs == Value::Nil || *rhs == Value::Nil => Ok(false),
        None => Err(RuntimeError::TypeMismatch { opcode, order }),
    }
}

/// The character at a zero-based index, or the out-of-bounds error.
fn char_at(text: &str, index: i64, order: u32) -> Result<char, RuntimeError> {
    let chars: Vec<char> = text.chars().collect();
    usize::try_from(index)
        .ok()
        .filter(|&i| i < chars.len())
        .map(|i| chars[i])
        .ok_or(RuntimeError::IndexOutOfBounds {
            index,
            length: chars.len(),
            order,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(6, 3), 2);
        assert_eq!(floor_div(-6, 3), -2);
    }

    #[test]
    fn string_comparison_swaps_sides() {
        let a = Value::Str("abc".into());
        let b = Value::Str("abd".into());
        // abc < abd lexically, but string operands compare swapped.
        assert_eq!(compare(&a, &b, "LT", 1).unwrap(), Ordering::Greater);
        assert_eq!(compare(&b, &a, "LT", 1).unwrap(), Ordering::Less);
    }

    #[test]
    fn integer_comparison_is_unswapped() {
        assert_eq!(
            compare(&Value::Int(1), &Value::Int(2), "LT", 1).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_type_comparison_fails() {
        let err = compare(&Value::Int(1), &Value::Bool(true), "LT", 3).unwrap_err();
        assert_eq!(err.status(), 53);
    }

    #[test]
    fn strict_equality_requires_same_type() {
        assert_eq!(strict_equal(&Value::Int(1), &Value::Int(1)), Some(true));
        assert_eq!(strict_equal(&Value::Nil, &Value::Nil), Some(true));
        assert_eq!(strict_equal(&Value::Int(1), &Value::Nil), None);
    }

    #[test]
    fn jump_equality_tolerates_one_sided_nil() {
        assert_eq!(jump_equal(&Value::Int(1), &Value::Nil, "JUMPIFEQ", 1), Ok(false));
        assert_eq!(jump_equal(&Value::Nil, &Value::Nil, "JUMPIFEQ", 1), Ok(true));
        let err = jump_equal(&Value::Int(1), &Value::Bool(true), "JUMPIFEQ", 1).unwrap_err();
        assert_eq!(err.status(), 53);
    }

    #[test]
    fn char_at_bounds() {
        assert_eq!(char_at("abc", 0, 1).unwrap(), 'a');
        assert_eq!(char_at("abc", 2, 1).unwrap(), 'c');
        assert_eq!(char_at("abc", 3, 1).unwrap_err().status(), 58);
        assert_eq!(char_at("abc", -1, 1).unwrap_err().status(), 58);
        assert_eq!(char_at("", 0, 1).unwrap_err().status(), 58);
    }
}
