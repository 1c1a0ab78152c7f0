//! # Ferrite VM Bytecode
//!
//! The instruction catalog shared by the compiler and the dispatch loop.
//!
//! ## Numbering
//!
//! Opcodes live in two disjoint integer ranges:
//!
//! - **Bytecode tokens** (`2..=83`) are shared with the general token
//!   enumeration used by the parser.
//! - **Extended opcodes** (`0..=-86`) are interpreter-only codes, packed as a
//!   contiguous descending sequence starting at zero.
//!
//! Validity of an integer is decided by range membership alone, so the
//! dispatch loop can use the raw value (shifted by [`MIN_ICODE`]) as a
//! jump-table index. Names exist only for tracing and disassembly.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

/// Declares a `#[repr(i32)]` opcode enum together with its decode table,
/// raw accessor and diagnostic names.
macro_rules! opcode_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr(i32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every member in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Decode a raw integer, `None` if it is not a member
            pub const fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The raw integer used by the dispatch loop
            #[inline]
            pub const fn raw(self) -> i32 {
                self as i32
            }

            /// Human-readable name, for tracing and disassembly only
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub mod error;
pub mod icode;
pub mod instruction;
pub mod token;

pub use error::BytecodeError;
pub use icode::{Icode, MIN_ICODE};
pub use instruction::{
    DISPATCH_TABLE_LEN, Opcode, dispatch_index, is_valid_icode, is_valid_opcode,
    is_valid_token_code, opcode_name,
};
pub use token::{FIRST_BYTECODE_TOKEN, LAST_BYTECODE_TOKEN, Token};
