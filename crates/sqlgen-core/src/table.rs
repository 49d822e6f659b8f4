//! Table references.

use serde::{Deserialize, Serialize};

/// A table name plus optional schema.
///
/// Quoting is dialect-owned; this record only carries the parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    /// Table name.
    pub name: String,
    /// Optional schema qualifier.
    pub schema: Option<String>,
}

impl TableRef {
    /// Unqualified table reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    /// Schema-qualified table reference.
    pub fn with_schema(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Some(schema.into()),
        }
    }
}

impl From<&str> for TableRef {
    fn from(name: &str) -> Self {
        TableRef::new(name)
    }
}
