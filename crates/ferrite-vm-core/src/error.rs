//! VM error types

use std::sync::Arc;

use crate::value::Value;
use thiserror::Error;

/// VM execution errors
#[derive(Debug, Error)]
pub enum VmError {
    /// Wrong capability (not an object, not callable, not a constructor...)
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Numeric bound exceeded (safe-integer overflow during enumeration)
    #[error("RangeError: {0}")]
    RangeError(String),

    /// A generator was resumed while it was already running
    #[error("Generator is already running")]
    Reentrancy,

    /// An out-of-range opcode reached the catalog
    #[error("Bytecode error: {0}")]
    Bytecode(#[from] ferrite_vm_bytecode::BytecodeError),

    /// Thrown script value
    #[error("Uncaught exception: {0}")]
    Exception(Box<ThrownValue>),

    /// Internal error
    #[error("InternalError: {0}")]
    InternalError(String),
}

/// A thrown script value
#[derive(Debug, Clone)]
pub struct ThrownValue {
    /// The thrown value
    pub value: Value,
    /// The thrown value (as a string representation)
    pub message: String,
    /// Where the value was thrown, if the thrower knew
    pub location: Option<SourceLocation>,
}

impl std::fmt::Display for ThrownValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({})", self.message, location),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Source position attached to a thrown value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line number
    pub line: u32,
    /// Source name (file or script id)
    pub source: Arc<str>,
}

impl SourceLocation {
    /// Create a location
    pub fn new(source: impl Into<Arc<str>>, line: u32) -> Self {
        Self {
            line,
            source: source.into(),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.source, self.line)
    }
}

impl VmError {
    /// Create a type error
    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a range error
    pub fn range_error(msg: impl Into<String>) -> Self {
        Self::RangeError(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Create an exception from a thrown script value
    pub fn exception(value: Value) -> Self {
        Self::exception_at(value, None)
    }

    /// Create an exception carrying the location it was thrown from
    pub fn exception_at(value: Value, location: Option<SourceLocation>) -> Self {
        let message = value.display_string();
        Self::Exception(Box::new(ThrownValue {
            value,
            message,
            location,
        }))
    }

    /// Engine invariant violations. These are never caught by script-level
    /// recovery paths and never turned into script values.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Reentrancy | Self::Bytecode(_) | Self::InternalError(_)
        )
    }

    /// The thrown value, for `Exception` errors
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            Self::Exception(thrown) => Some(&thrown.value),
            _ => None,
        }
    }
}

/// Result type for VM operations
pub type VmResult<T> = std::result::Result<T, VmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ferrite_vm_bytecode::BytecodeError;

    #[test]
    fn test_fatal_classification() {
        assert!(VmError::Reentrancy.is_fatal());
        assert!(VmError::from(BytecodeError::InvalidOpcode(1)).is_fatal());
        assert!(VmError::internal("broken").is_fatal());
        assert!(!VmError::type_error("x").is_fatal());
        assert!(!VmError::range_error("x").is_fatal());
        assert!(!VmError::exception(Value::number(1.0)).is_fatal());
    }

    #[test]
    fn test_exception_display() {
        let err = VmError::exception_at(Value::string("boom"), Some(SourceLocation::new("a.js", 3)));
        assert_eq!(err.to_string(), "Uncaught exception: boom (a.js#3)");
        assert_eq!(err.thrown_value(), Some(&Value::string("boom")));
    }
}
