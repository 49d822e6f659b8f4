//! Transaction descriptors.

use serde::{Deserialize, Serialize};

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    ReadUncommitted,
    /// Only committed data visible.
    ReadCommitted,
    /// Read locks held until transaction end.
    RepeatableRead,
    /// Full serializable isolation.
    Serializable,
    /// Statement-level snapshot (SQL Server).
    Snapshot,
}

impl IsolationLevel {
    /// Get the SQL representation of this level.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::Snapshot => "SNAPSHOT",
        }
    }
}

/// A handle describing one transaction in a (possibly nested) stack.
///
/// A descriptor with a parent is a savepoint; only top-level transactions
/// get BEGIN/COMMIT statements and isolation-level changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    /// Transaction (or savepoint) name.
    pub id: String,
    /// Enclosing transaction id, present iff nested.
    pub parent: Option<String>,
}

impl TransactionDescriptor {
    /// A top-level transaction.
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
        }
    }

    /// A savepoint inside `parent`.
    pub fn nested(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
        }
    }

    /// Whether this is a savepoint rather than a top-level transaction.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.parent.is_some()
    }
}
