//! Typed instruction arguments as delivered by the front end.
//!
//! An argument is a tag plus raw text. The engine validates the text
//! against the tag's grammar at resolve time; the front end only decides
//! which tag a token carries.

/// The declared kind of an instruction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgTag {
    /// Variable reference (`FRAME@name`).
    Var,
    /// Integer literal.
    Int,
    /// String literal (escape sequences left undecoded).
    String,
    /// Boolean literal (`true` / `false`).
    Bool,
    /// Nil literal (`nil`).
    Nil,
    /// Type name (`int`, `string`, `bool`).
    Type,
    /// Label name.
    Label,
}

impl ArgTag {
    /// Returns the source name of this tag.
    pub fn name(&self) -> &'static str {
        match self {
            ArgTag::Var => "var",
            ArgTag::Int => "int",
            ArgTag::String => "string",
            ArgTag::Bool => "bool",
            ArgTag::Nil => "nil",
            ArgTag::Type => "type",
            ArgTag::Label => "label",
        }
    }

    /// Look up a literal tag by its source prefix (`int@`, `string@`, ...).
    /// Variable prefixes (`GF`/`LF`/`TF`) are not literal tags and return None.
    pub fn literal_from_prefix(prefix: &str) -> Option<ArgTag> {
        match prefix {
            "int" => Some(ArgTag::Int),
            "string" => Some(ArgTag::String),
            "bool" => Some(ArgTag::Bool),
            "nil" => Some(ArgTag::Nil),
            _ => None,
        }
    }
}

/// One instruction argument: a tag and the raw token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub tag: ArgTag,
    pub text: String,
}

impl Arg {
    pub fn new(tag: ArgTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    /// Shorthand for a variable-reference argument.
    pub fn var(text: impl Into<String>) -> Self {
        Self::new(ArgTag::Var, text)
    }

    /// Shorthand for a label-name argument.
    pub fn label(text: impl Into<String>) -> Self {
        Self::new(ArgTag::Label, text)
    }
}
