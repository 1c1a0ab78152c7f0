//! Instruction catalog errors

use thiserror::Error;

/// Errors raised by the instruction catalog.
///
/// These are engine invariant violations: a well-formed compiler never emits
/// an opcode outside the catalog, so the dispatch loop treats them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    /// Integer is neither a bytecode token nor an extended opcode
    #[error("Invalid opcode: {0}")]
    InvalidOpcode(i32),
}

/// Result type for catalog lookups
pub type Result<T> = std::result::Result<T, BytecodeError>;
