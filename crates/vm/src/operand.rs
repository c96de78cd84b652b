//! Operand resolution: the three contracts nearly every opcode uses.
//!
//! Resolution validates textual grammars at the point of use. Variable
//! references resolve to a frame designator plus name; symbols resolve to
//! a typed [`Value`]; labels resolve to a validated name. Each failure
//! mode has its own error kind and status.

use tacode_common::{Arg, ArgTag, Value};

use crate::error::RuntimeError;
use crate::frame::FrameKind;
use crate::machine::Interpreter;

/// A validated variable reference: frame designator plus name. Not yet a
/// value; reads and writes go through the interpreter's frame lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VarRef {
    pub kind: FrameKind,
    pub name: String,
}

/// First identifier character: a restricted symbol set or a letter.
fn is_ident_start(c: char) -> bool {
    matches!(c, '!' | '$' | '%' | '&' | '*' | '_' | '-' | '?') || c.is_ascii_alphabetic()
}

/// Identifier grammar: start character, then start characters or digits.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => {}
        _ => return false,
    }
    chars.all(|c| is_ident_start(c) || c.is_ascii_digit())
}

/// Integer literal: optional sign, then one or more digits.
pub(crate) fn is_valid_int_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// String literal: any run of non-whitespace characters, where every
/// backslash starts a three-decimal-digit escape sequence.
pub(crate) fn is_valid_string_literal(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            if i + 4 > chars.len() || !chars[i + 1..i + 4].iter().all(|c| c.is_ascii_digit()) {
                return false;
            }
            i += 4;
        } else {
            if chars[i].is_whitespace() {
                return false;
            }
            i += 1;
        }
    }
    true
}

/// Label name: any non-empty token without whitespace.
fn is_valid_label(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(|c| c.is_whitespace())
}

/// Resolve a label argument to its validated name.
pub(crate) fn resolve_label(arg: &Arg, order: u32) -> Result<&str, RuntimeError> {
    if arg.tag != ArgTag::Label {
        return Err(RuntimeError::OperandNotLabel { order });
    }
    if !is_valid_label(&arg.text) {
        return Err(RuntimeError::MalformedLabel { order });
    }
    Ok(&arg.text)
}

impl Interpreter<'_> {
    /// Resolve a variable argument to a frame designator plus name.
    ///
    /// Checks, in order: the argument is tagged as a variable (53), the
    /// text has a frame separator and a known designator (32), the frame
    /// is currently live (55), and the name fits the identifier grammar
    /// (32).
    pub(crate) fn resolve_var(&self, arg: &Arg, order: u32) -> Result<VarRef, RuntimeError> {
        if arg.tag != ArgTag::Var {
            return Err(RuntimeError::OperandNotVariable { order });
        }
        let (designator, name) =
            arg.text
                .split_once('@')
                .ok_or_else(|| RuntimeError::MalformedVariable {
                    text: arg.text.clone(),
                    order,
                })?;
        let kind =
            FrameKind::from_designator(designator).ok_or_else(|| RuntimeError::UnknownFrame {
                text: designator.to_string(),
                order,
            })?;
        self.frame(kind, order)?;
        if !is_valid_identifier(name) {
            return Err(RuntimeError::MalformedVariable {
                text: arg.text.clone(),
                order,
            });
        }
        Ok(VarRef {
            kind,
            name: name.to_string(),
        })
    }

    /// Fail unless the reference names a declared variable. Used where a
    /// destination must be checked before consuming other state.
    pub(crate) fn ensure_declared(&self, var: &VarRef, order: u32) -> Result<(), RuntimeError> {
        if self.frame(var.kind, order)?.get(&var.name).is_none() {
            return Err(RuntimeError::UndeclaredVariable {
                name: var.name.clone(),
                order,
            });
        }
        Ok(())
    }

    /// Read the current value of a resolved reference. `allow_unset`
    /// turns the unset-read failure into `Ok(None)` (TYPE's tolerance).
    pub(crate) fn load_var(
        &self,
        var: &VarRef,
        allow_unset: bool,
        order: u32,
    ) -> Result<Option<Value>, RuntimeError> {
        let frame = self.frame(var.kind, order)?;
        match frame.get(&var.name) {
            None => Err(RuntimeError::UndeclaredVariable {
                name: var.name.clone(),
                order,
            }),
            Some(None) if allow_unset => Ok(None),
            Some(None) => Err(RuntimeError::UnsetVariable {
                name: var.name.clone(),
                order,
            }),
            Some(Some(value)) => Ok(Some(value.clone())),
        }
    }

    /// Store a value through a resolved reference.
    pub(crate) fn store_var(
        &mut self,
        var: &VarRef,
        value: Value,
        order: u32,
    ) -> Result<(), RuntimeError> {
        let name = var.name.clone();
        let frame = self.frame_mut(var.kind, order)?;
        if !frame.set(&name, value) {
            return Err(RuntimeError::UndeclaredVariable { name, order });
        }
        Ok(())
    }

    /// Resolve a symbol argument to its value: variables are read through
    /// their frame, literals are validated against their grammar.
    pub(crate) fn resolve_symbol(&self, arg: &Arg, order: u32) -> Result<Value, RuntimeError> {
        match self.resolve_symbol_or_unset(arg, false, order)? {
            Some(value) => Ok(value),
            // allow_unset=false never yields None.
            None => Err(RuntimeError::UnsetVariable {
                name: arg.text.clone(),
                order,
            }),
        }
    }

    /// Like [`Self::resolve_symbol`], but a declared-unset variable
    /// resolves to `Ok(None)` when `allow_unset` is set.
    pub(crate) fn resolve_symbol_or_unset(
        &self,
        arg: &Arg,
        allow_unset: bool,
        order: u32,
    ) -> Result<Option<Value>, RuntimeError> {
        if arg.tag == ArgTag::Var {
            let var = self.resolve_var(arg, order)?;
            return self.load_var(&var, allow_unset, order);
        }

        let value = match arg.tag {
            ArgTag::Int => {
                if !is_valid_int_literal(&arg.text) {
                    return Err(malformed(arg, "int", order));
                }
                let n: i64 = arg
                    .text
                    .parse()
                    .map_err(|_| malformed(arg, "int", order))?;
                Value::Int(n)
            }
            ArgTag::String => {
                if !is_valid_string_literal(&arg.text) {
                    return Err(malformed(arg, "string", order));
                }
                Value::Str(arg.text.clone())
            }
            ArgTag::Bool => match arg.text.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(malformed(arg, "bool", order)),
            },
            ArgTag::Nil => {
                if arg.text != "nil" {
                    return Err(malformed(arg, "nil", order));
                }
                Value::Nil
            }
            // Type and label tags never appear in symbol position.
            ArgTag::Type | ArgTag::Label | ArgTag::Var => {
                return Err(RuntimeError::TypeMismatch {
                    opcode: "symbol",
                    order,
                })
            }
        };
        Ok(Some(value))
    }
}

fn malformed(arg: &Arg, tag: &'static str, order: u32) -> RuntimeError {
    RuntimeError::MalformedLiteral {
        tag,
        text: arg.text.clone(),
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Input;
    use tacode_common::Program;

    fn with_interpreter<T>(f: impl FnOnce(&mut Interpreter) -> T) -> T {
        let program = Program::new();
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let mut interp = Interpreter::new(&program, Input::from_text(""), &mut out, &mut diag);
        f(&mut interp)
    }

    #[test]
    fn identifier_grammar() {
        assert!(is_valid_identifier("x"));
        assert!(is_valid_identifier("_tmp-1"));
        assert!(is_valid_identifier("$foo?"));
        assert!(is_valid_identifier("Counter42"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1x"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("x@y"));
    }

    #[test]
    fn int_literal_grammar() {
        assert!(is_valid_int_literal("0"));
        assert!(is_valid_int_literal("-42"));
        assert!(is_valid_int_literal("+7"));
        assert!(!is_valid_int_literal(""));
        assert!(!is_valid_int_literal("-"));
        assert!(!is_valid_int_literal("3.14"));
        assert!(!is_valid_int_literal("5x"));
    }

    #[test]
    fn string_literal_grammar() {
        assert!(is_valid_string_literal(""));
        assert!(is_valid_string_literal("hello"));
        assert!(is_valid_string_literal("a\\032b"));
        assert!(!is_valid_string_literal("a b"));
        assert!(!is_valid_string_literal("bad\\9x"));
        assert!(!is_valid_string_literal("trail\\"));
    }

    #[test]
    fn label_resolution() {
        assert_eq!(resolve_label(&Arg::label("loop"), 1).unwrap(), "loop");
        let err = resolve_label(&Arg::new(ArgTag::Int, "5"), 1).unwrap_err();
        assert_eq!(err, RuntimeError::OperandNotLabel { order: 1 });
    }

    #[test]
    fn resolve_var_happy_path() {
        with_interpreter(|interp| {
            let var = interp.resolve_var(&Arg::var("GF@x"), 1).unwrap();
            assert_eq!(var.kind, FrameKind::Global);
            assert_eq!(var.name, "x");
        });
    }

    #[test]
    fn resolve_var_rejects_non_var_tag() {
        with_interpreter(|interp| {
            let err = interp
                .resolve_var(&Arg::new(ArgTag::Int, "5"), 2)
                .unwrap_err();
            assert_eq!(err, RuntimeError::OperandNotVariable { order: 2 });
        });
    }

    #[test]
    fn resolve_var_missing_separator_is_32() {
        with_interpreter(|interp| {
            let err = interp.resolve_var(&Arg::var("GFx"), 1).unwrap_err();
            assert_eq!(err.status(), 32);
        });
    }

    #[test]
    fn resolve_var_unknown_designator_is_32() {
        with_interpreter(|interp| {
            let err = interp.resolve_var(&Arg::var("XF@x"), 1).unwrap_err();
            assert_eq!(
                err,
                RuntimeError::UnknownFrame {
                    text: "XF".into(),
                    order: 1
                }
            );
        });
    }

    #[test]
    fn resolve_var_dead_frame_is_55() {
        with_interpreter(|interp| {
            let err = interp.resolve_var(&Arg::var("LF@x"), 3).unwrap_err();
            assert_eq!(err.status(), 55);
        });
    }

    #[test]
    fn resolve_var_bad_name_is_32() {
        with_interpreter(|interp| {
            let err = interp.resolve_var(&Arg::var("GF@9lives"), 1).unwrap_err();
            assert_eq!(err.status(), 32);
        });
    }

    #[test]
    fn resolve_symbol_literals() {
        with_interpreter(|interp| {
            assert_eq!(
                interp
                    .resolve_symbol(&Arg::new(ArgTag::Int, "-3"), 1)
                    .unwrap(),
                Value::Int(-3)
            );
            assert_eq!(
                interp
                    .resolve_symbol(&Arg::new(ArgTag::Bool, "true"), 1)
                    .unwrap(),
                Value::Bool(true)
            );
            assert_eq!(
                interp
                    .resolve_symbol(&Arg::new(ArgTag::String, "a\\032b"), 1)
                    .unwrap(),
                Value::Str("a\\032b".into())
            );
            assert_eq!(
                interp
                    .resolve_symbol(&Arg::new(ArgTag::Nil, "nil"), 1)
                    .unwrap(),
                Value::Nil
            );
        });
    }

    #[test]
    fn resolve_symbol_bad_literals_are_32() {
        with_interpreter(|interp| {
            for (tag, text) in [
                (ArgTag::Int, "abc"),
                (ArgTag::Bool, "True"),
                (ArgTag::Nil, "null"),
                (ArgTag::String, "with space"),
            ] {
                let err = interp
                    .resolve_symbol(&Arg::new(tag, text), 1)
                    .unwrap_err();
                assert_eq!(err.status(), 32, "{tag:?} {text}");
            }
        });
    }

    #[test]
    fn resolve_symbol_undeclared_variable_is_54() {
        with_interpreter(|interp| {
            let err = interp.resolve_symbol(&Arg::var("GF@ghost"), 4).unwrap_err();
            assert_eq!(err.status(), 54);
        });
    }

    #[test]
    fn resolve_symbol_unset_variable_is_56() {
        with_interpreter(|interp| {
            interp.global.declare("x");
            let err = interp.resolve_symbol(&Arg::var("GF@x"), 5).unwrap_err();
            assert_eq!(err.status(), 56);
        });
    }

    #[test]
    fn resolve_symbol_unset_tolerated_for_type_introspection() {
        with_interpreter(|interp| {
            interp.global.declare("x");
            let value = interp
                .resolve_symbol_or_unset(&Arg::var("GF@x"), true, 5)
                .unwrap();
            assert_eq!(value, None);
        });
    }
}
