//! Realm configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! strict = true
//! max_iterations = 1000000
//! enumerate_indices_first = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest integer a script number represents exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Errors raised while loading a [`RealmConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config '{path}': {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The TOML was malformed or had the wrong shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-realm behavior switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    /// Failed property writes raise a TypeError even when the caller asked
    /// for silent failure (strict-mode scripts).
    /// Default: false
    pub strict: bool,

    /// Upper bound on enumeration loops (grouping, array-like reads).
    /// Default: 2^53 - 1
    pub max_iterations: u64,

    /// Report integer keys first, in ascending order. When false, integer
    /// keys keep their insertion position among string keys.
    /// Default: true
    pub enumerate_indices_first: bool,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_iterations: MAX_SAFE_INTEGER,
            enumerate_indices_first: true,
        }
    }
}

impl RealmConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict failed-write semantics.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Set the enumeration bound.
    pub fn max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = limit;
        self
    }

    /// Choose the own-key ordering.
    pub fn enumerate_indices_first(mut self, enabled: bool) -> Self {
        self.enumerate_indices_first = enabled;
        self
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
