//! Runtime value representation.
//!
//! Values are what variables and data-stack slots hold. String payloads
//! keep their raw literal text, escape sequences included; equality and
//! ordering are defined over raw text, and [`decode_escapes`] is applied
//! only when producing final output.

/// A typed runtime datum. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Native signed integer.
    Int(i64),
    /// Canonical two-valued flag.
    Bool(bool),
    /// Text with escape sequences (`\DDD`) left undecoded.
    Str(String),
    /// Nil carries no payload. Distinct from "declared but unset".
    Nil,
}

impl Value {
    /// The declared type name, as reported by the TYPE instruction.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
        }
    }

    /// The raw payload text, used by the diagnostic channel (DPRINT and
    /// the BREAK snapshot). Unlike WRITE, nil renders as `nil` and string
    /// escapes stay undecoded.
    pub fn raw_text(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Str(s) => s.clone(),
            Value::Nil => "nil".to_string(),
        }
    }
}

/// Decode `\DDD` escape sequences (three decimal digits, giving a code
/// point) in a raw string. Pure; used only at output time.
///
/// A backslash not followed by three digits, or one naming an invalid
/// code point, is passed through untouched. Validated literals never
/// contain either, but values read at runtime may.
pub fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' && i + 4 <= chars.len() {
            let digits = &chars[i + 1..i + 4];
            if digits.iter().all(|c| c.is_ascii_digit()) {
                let code: u32 = digits.iter().collect::<String>().parse().unwrap_or(0);
                if let Some(c) = char::from_u32(code) {
                    out.push(c);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Value::Int(42).type_name(), "int");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Str("x".into()).type_name(), "string");
        assert_eq!(Value::Nil.type_name(), "nil");
    }

    #[test]
    fn raw_text_rendering() {
        assert_eq!(Value::Int(-7).raw_text(), "-7");
        assert_eq!(Value::Bool(false).raw_text(), "false");
        assert_eq!(Value::Str("a\\065b".into()).raw_text(), "a\\065b");
        assert_eq!(Value::Nil.raw_text(), "nil");
    }

    #[test]
    fn decode_single_escape() {
        assert_eq!(decode_escapes("\\085"), "U");
    }

    #[test]
    fn decode_escape_inside_text() {
        assert_eq!(decode_escapes("a\\032b"), "a b");
    }

    #[test]
    fn decode_repeated_escapes() {
        assert_eq!(decode_escapes("\\072\\072"), "HH");
    }

    #[test]
    fn decode_leaves_plain_text_alone() {
        assert_eq!(decode_escapes("hello"), "hello");
        assert_eq!(decode_escapes(""), "");
    }

    #[test]
    fn decode_leaves_short_escape_alone() {
        // Fewer than three digits after the backslash: not an escape.
        assert_eq!(decode_escapes("\\07"), "\\07");
        assert_eq!(decode_escapes("tail\\"), "tail\\");
    }

    #[test]
    fn decode_leaves_non_digit_escape_alone() {
        assert_eq!(decode_escapes("\\abc"), "\\abc");
    }

    #[test]
    fn equality_is_raw_text() {
        // `\065` is not equal to the decoded "A"; raw text is canonical.
        assert_ne!(Value::Str("\\065".into()), Value::Str("A".into()));
    }
}
