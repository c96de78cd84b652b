//! TACode common types and instruction model.
//!
//! This crate provides the foundational data structures shared by the
//! front end and the execution engine:
//!
//! - [`Opcode`] — the closed set of 35 operations, with per-opcode
//!   operand signatures
//! - [`ArgTag`] / [`Arg`] — typed raw-text instruction arguments
//! - [`Args`] / [`Instruction`] — up to three positional arguments plus
//!   order and opcode
//! - [`Program`] — the order-keyed instruction table
//! - [`Value`] — runtime values, with [`decode_escapes`] for output
//! - [`ProgramError`] — violations of the stream contract
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod arg;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use arg::{Arg, ArgTag};
pub use error::ProgramError;
pub use instruction::{Args, Instruction};
pub use opcode::{Opcode, OperandKind};
pub use program::Program;
pub use value::{decode_escapes, Value};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy that generates a random valid Opcode.
    fn arb_opcode() -> impl Strategy<Value = Opcode> {
        prop::sample::select(&opcode::ALL_OPCODES[..])
    }

    proptest! {
        /// Every mnemonic round-trips through the lookup, in any case mix.
        #[test]
        fn mnemonic_lookup_total(op in arb_opcode(), upper in any::<bool>()) {
            let m = if upper {
                op.mnemonic().to_string()
            } else {
                op.mnemonic().to_lowercase()
            };
            prop_assert_eq!(Opcode::from_mnemonic(&m), Some(op));
        }

        /// Text with no backslash decodes to itself.
        #[test]
        fn decode_is_identity_without_backslash(s in "[a-zA-Z0-9 @#]{0,40}") {
            prop_assert_eq!(decode_escapes(&s), s);
        }

        /// Any three-digit escape decodes to exactly the named code point.
        #[test]
        fn decode_three_digit_escape(code in 1u32..1000) {
            let raw = format!("\\{code:03}");
            let expected: String = char::from_u32(code).unwrap().to_string();
            prop_assert_eq!(decode_escapes(&raw), expected);
        }

        /// Distinct positive orders always build a program; iteration is sorted.
        #[test]
        fn program_accepts_unique_positive_orders(
            orders in prop::collection::btree_set(1u32..10_000, 0..50)
        ) {
            let instructions: Vec<Instruction> = orders
                .iter()
                .map(|&o| Instruction::new(o, Opcode::Break, Args::empty()))
                .collect();
            let program = Program::from_instructions(instructions).unwrap();
            let seen: Vec<u32> = program.iter().map(|i| i.order).collect();
            let sorted: Vec<u32> = orders.into_iter().collect();
            prop_assert_eq!(seen, sorted);
        }
    }
}
