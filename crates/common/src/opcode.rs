//! Opcode definitions for the TACode instruction set.

/// The kind of operand an opcode position accepts.
///
/// `Symb` covers both variable references and typed literals; the engine
/// resolves whichever it is given at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A writable variable reference (`GF@x`, `LF@x`, `TF@x`).
    Var,
    /// A variable reference or a typed literal.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `string`, `bool`).
    Type,
}

/// Identifies the operation to perform.
///
/// The set is closed: unrecognized mnemonics are rejected at the parsing
/// boundary, never at dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frame management
    CreateFrame,
    PushFrame,
    PopFrame,

    // Variables
    DefVar,
    Move,

    // Data stack
    Pushs,
    Pops,

    // Control flow
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    Call,
    Return,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Idiv,

    // Relational
    Lt,
    Gt,
    Eq,

    // Logical
    And,
    Or,
    Not,

    // Strings and conversions
    Int2Char,
    Stri2Int,
    Concat,
    Strlen,
    GetChar,
    SetChar,

    // I/O
    Read,
    Write,

    // Introspection
    Type,

    // Termination
    Exit,

    // Debug
    Dprint,
    Break,
}

/// All valid opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::DefVar,
    Opcode::Move,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Call,
    Opcode::Return,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::GetChar,
    Opcode::SetChar,
    Opcode::Read,
    Opcode::Write,
    Opcode::Type,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::DefVar => "DEFVAR",
            Opcode::Move => "MOVE",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::GetChar => "GETCHAR",
            Opcode::SetChar => "SETCHAR",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Type => "TYPE",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Look up an opcode by its mnemonic. Case-insensitive, matching the
    /// source language convention.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        let upper = mnemonic.to_ascii_uppercase();
        ALL_OPCODES.iter().find(|op| op.mnemonic() == upper).copied()
    }

    /// The positional operand pattern this opcode requires.
    pub fn signature(&self) -> &'static [OperandKind] {
        use OperandKind::{Label, Symb, Type, Var};
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],

            Opcode::DefVar | Opcode::Pops => &[Var],

            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[Symb],

            Opcode::Label | Opcode::Jump | Opcode::Call => &[Label],

            Opcode::Move | Opcode::Not | Opcode::Int2Char | Opcode::Strlen | Opcode::Type => {
                &[Var, Symb]
            }

            Opcode::Read => &[Var, Type],

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::GetChar
            | Opcode::SetChar => &[Var, Symb, Symb],

            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[Label, Symb, Symb],
        }
    }

    /// Number of operands this opcode requires.
    pub fn arity(&self) -> usize {
        self.signature().len()
    }
}
