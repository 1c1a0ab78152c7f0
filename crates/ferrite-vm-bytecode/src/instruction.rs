//! The unified opcode view used by the dispatch loop

use serde::{Deserialize, Serialize};

use crate::error::{BytecodeError, Result};
use crate::icode::{Icode, MIN_ICODE};
use crate::token::{FIRST_BYTECODE_TOKEN, LAST_BYTECODE_TOKEN, Token};

/// Number of slots in a jump table covering every valid opcode.
///
/// The table spans `MIN_ICODE..=LAST_BYTECODE_TOKEN`; the single hole at `1`
/// (between the last extended opcode and the first token) stays empty.
pub const DISPATCH_TABLE_LEN: usize = (LAST_BYTECODE_TOKEN - MIN_ICODE + 1) as usize;

/// Whether `raw` is an extended opcode
#[inline]
pub const fn is_valid_icode(raw: i32) -> bool {
    MIN_ICODE <= raw && raw <= 0
}

/// Whether `raw` is a bytecode token
#[inline]
pub const fn is_valid_token_code(raw: i32) -> bool {
    FIRST_BYTECODE_TOKEN <= raw && raw <= LAST_BYTECODE_TOKEN
}

/// Whether `raw` is any valid opcode. Pure range membership.
#[inline]
pub const fn is_valid_opcode(raw: i32) -> bool {
    is_valid_icode(raw) || is_valid_token_code(raw)
}

/// Diagnostic name of a raw opcode
pub fn opcode_name(raw: i32) -> Result<&'static str> {
    Opcode::from_raw(raw).map(Opcode::name)
}

/// Zero-based jump-table slot of a raw opcode
#[inline]
pub fn dispatch_index(raw: i32) -> Result<usize> {
    if is_valid_opcode(raw) {
        Ok((raw - MIN_ICODE) as usize)
    } else {
        Err(BytecodeError::InvalidOpcode(raw))
    }
}

/// Any opcode the dispatch loop may encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Shared with the token enumeration
    Token(Token),
    /// Interpreter-only
    Icode(Icode),
}

impl Opcode {
    /// Decode a raw integer
    pub fn from_raw(raw: i32) -> Result<Self> {
        if is_valid_icode(raw) {
            Icode::from_raw(raw).map(Self::Icode)
        } else if is_valid_token_code(raw) {
            Token::from_raw(raw).map(Self::Token)
        } else {
            None
        }
        .ok_or(BytecodeError::InvalidOpcode(raw))
    }

    /// The raw integer
    #[inline]
    pub const fn raw(self) -> i32 {
        match self {
            Self::Token(t) => t.raw(),
            Self::Icode(i) => i.raw(),
        }
    }

    /// Human-readable name, never used for dispatch
    pub const fn name(self) -> &'static str {
        match self {
            Self::Token(t) => t.name(),
            Self::Icode(i) => i.name(),
        }
    }

    /// Jump-table slot of this opcode
    #[inline]
    pub const fn dispatch_index(self) -> usize {
        (self.raw() - MIN_ICODE) as usize
    }

    /// Opcodes that suspend or finish a generator frame
    pub const fn is_generator_op(self) -> bool {
        matches!(
            self,
            Self::Token(Token::Yield)
                | Self::Icode(
                    Icode::Generator
                        | Icode::GeneratorEnd
                        | Icode::GeneratorReturn
                        | Icode::YieldStar
                )
        )
    }

    /// Every opcode, extended opcodes first, in raw ascending order
    pub fn iter() -> impl Iterator<Item = Opcode> {
        Icode::ALL
            .iter()
            .rev()
            .copied()
            .map(Self::Icode)
            .chain(Token::ALL.iter().copied().map(Self::Token))
    }
}

impl From<Token> for Opcode {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Icode> for Opcode {
    fn from(icode: Icode) -> Self {
        Self::Icode(icode)
    }
}

impl TryFrom<i32> for Opcode {
    type Error = BytecodeError;

    fn try_from(raw: i32) -> Result<Self> {
        Self::from_raw(raw)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
