//! Error types for query generation.
//!
//! Only two failure modes exist: a caller invoked a capability the dialect
//! does not have, or handed input the generator cannot build a statement
//! from. Neither is transient; both propagate directly.

use thiserror::Error;

/// Result alias for generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Query-generation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The dialect has no SQL equivalent for the requested operation.
    #[error("{operation} is not supported by the {dialect} dialect")]
    UnsupportedOperation {
        /// Dialect name.
        dialect: &'static str,
        /// Operation name as exposed to callers.
        operation: &'static str,
    },

    /// The supplied metadata cannot produce a valid statement; a caller or
    /// model misconfiguration, never retried.
    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// Unsupported-operation constructor.
    #[must_use]
    pub const fn unsupported(dialect: &'static str, operation: &'static str) -> Self {
        Error::UnsupportedOperation { dialect, operation }
    }

    /// Invalid-input constructor.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message() {
        let err = Error::unsupported("mssql", "createTrigger");
        assert_eq!(
            err.to_string(),
            "createTrigger is not supported by the mssql dialect"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::invalid_input("Primary Key or Unique key should be passed to upsert query");
        assert_eq!(
            err.to_string(),
            "Primary Key or Unique key should be passed to upsert query"
        );
    }
}
