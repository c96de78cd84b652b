//! Variable frames and frame designators.

use std::collections::HashMap;

use tacode_common::Value;

/// The three frame designators a variable reference can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    /// Persistent for the whole run; always live.
    Global,
    /// Top of the frame stack; live iff the stack is non-empty.
    Local,
    /// Staging area; live iff created and not yet pushed.
    Temporary,
}

impl FrameKind {
    /// Source-form designator (`GF`, `LF`, `TF`).
    pub fn designator(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }

    /// Parse a source-form designator. Case-sensitive.
    pub fn from_designator(text: &str) -> Option<FrameKind> {
        match text {
            "GF" => Some(FrameKind::Global),
            "LF" => Some(FrameKind::Local),
            "TF" => Some(FrameKind::Temporary),
            _ => None,
        }
    }
}

/// One variable scope: name → optional value.
///
/// A name maps to `None` between declaration and first assignment; that
/// state is distinct from holding [`Value::Nil`].
#[derive(Debug, Clone, Default)]
pub struct Frame {
    vars: HashMap<String, Option<Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a name. Returns false if the name already exists.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.vars.contains_key(name) {
            return false;
        }
        self.vars.insert(name.to_string(), None);
        true
    }

    /// Assign a value to a declared name. Returns false if undeclared.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Current state of a name: None if undeclared, Some(None) if
    /// declared but unset, Some(Some(v)) once assigned.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.vars.get(name)
    }

    /// Number of declared names.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Declared names with their render text, sorted, for the diagnostic
    /// snapshot.
    pub fn snapshot_entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .vars
            .iter()
            .map(|(name, slot)| {
                let rendered = match slot {
                    Some(value) => format!("{}@{}", value.type_name(), value.raw_text()),
                    None => "<unset>".to_string(),
                };
                (name.clone(), rendered)
            })
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn designator_roundtrip() {
        for kind in [FrameKind::Global, FrameKind::Local, FrameKind::Temporary] {
            assert_eq!(FrameKind::from_designator(kind.designator()), Some(kind));
        }
    }

    #[test]
    fn designator_is_case_sensitive() {
        assert_eq!(FrameKind::from_designator("gf"), None);
        assert_eq!(FrameKind::from_designator("XF"), None);
        assert_eq!(FrameKind::from_designator(""), None);
    }

    #[test]
    fn declare_then_set_then_get() {
        let mut frame = Frame::new();
        assert!(frame.declare("x"));
        assert_eq!(frame.get("x"), Some(&None));
        assert!(frame.set("x", Value::Int(5)));
        assert_eq!(frame.get("x"), Some(&Some(Value::Int(5))));
    }

    #[test]
    fn redeclaration_fails() {
        let mut frame = Frame::new();
        assert!(frame.declare("x"));
        assert!(!frame.declare("x"));
        // The original slot is untouched.
        assert_eq!(frame.get("x"), Some(&None));
    }

    #[test]
    fn set_undeclared_fails() {
        let mut frame = Frame::new();
        assert!(!frame.set("ghost", Value::Nil));
        assert_eq!(frame.get("ghost"), None);
    }

    #[test]
    fn nil_is_distinct_from_unset() {
        let mut frame = Frame::new();
        frame.declare("x");
        frame.set("x", Value::Nil);
        assert_eq!(frame.get("x"), Some(&Some(Value::Nil)));
    }

    #[test]
    fn snapshot_is_sorted() {
        let mut frame = Frame::new();
        frame.declare("b");
        frame.declare("a");
        frame.set("b", Value::Bool(true));
        let entries = frame.snapshot_entries();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), "<unset>".to_string()),
                ("b".to_string(), "bool@true".to_string()),
            ]
        );
    }
}
