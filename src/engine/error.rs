//! Engine error type

use std::fmt;

/// Validation failure from a timer engine operation.
///
/// These are always recoverable: the engine keeps its previous valid state
/// and the caller surfaces the message to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A configured duration was zero or unparsable
    InvalidDuration(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDuration(msg) => write!(f, "invalid duration: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
