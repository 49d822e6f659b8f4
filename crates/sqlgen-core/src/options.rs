//! Per-operation option records.
//!
//! Each builder takes the record naming exactly what it consumes, instead
//! of a shared untyped option bag.

use serde::{Deserialize, Serialize};

use crate::version::ServerVersion;

/// A (possibly named) multi-column unique constraint group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Constraint name; unnamed groups are auto-named by the generator.
    pub name: Option<String>,
    /// Member columns.
    pub columns: Vec<String>,
}

impl UniqueKey {
    /// Unnamed unique key over the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            name: None,
            columns,
        }
    }

    /// Named unique key.
    pub fn named(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            columns,
        }
    }
}

/// Options for CREATE TABLE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableOptions {
    /// Multi-column unique constraint groups appended after the columns.
    pub unique_keys: Vec<UniqueKey>,
}

/// Options for INSERT statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOptions {
    /// Emit an OUTPUT clause returning the inserted rows.
    pub returning: bool,
}

/// Options for DELETE statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptions {
    /// Row cap. `None` means the dialect default of one row; zero
    /// suppresses the cap entirely.
    pub limit: Option<u64>,
    /// Truncate the table instead of deleting. Truncation cannot be
    /// filtered, so any condition or limit is ignored.
    pub truncate: bool,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Ordered column.
    pub column: String,
    /// Descending order when set.
    pub descending: bool,
}

impl OrderBy {
    /// Ascending order on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    /// Descending order on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Options for SELECT statements and their paging fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOptions {
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Rows to skip. Meaningful only with a deterministic order; the
    /// generator synthesizes a primary-key order when none is supplied.
    pub offset: Option<u64>,
    /// Caller-supplied ordering.
    pub order: Vec<OrderBy>,
    /// Server version used to select the paging strategy. Absent or
    /// invalid versions select the modern path.
    pub version: Option<ServerVersion>,
}

impl SelectOptions {
    /// Whether any paging was requested.
    #[must_use]
    pub fn wants_paging(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }
}
