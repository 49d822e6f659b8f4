//! Column definitions handed to DDL builders.

use serde::{Deserialize, Serialize};

use crate::table::TableRef;
use crate::value::Value;

/// Referential action for foreign key constraints (ON DELETE / ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// No action - raise error if any references exist.
    #[default]
    NoAction,
    /// Restrict - same as NO ACTION (alias for compatibility).
    Restrict,
    /// Cascade - automatically delete/update referencing rows.
    Cascade,
    /// Set null - set referencing columns to NULL.
    SetNull,
    /// Set default - set referencing columns to their default values.
    SetDefault,
}

impl ReferentialAction {
    /// Get the SQL representation of this action.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }

    /// Whether this action cascades changes to referencing rows.
    #[must_use]
    pub const fn is_cascading(&self) -> bool {
        matches!(
            self,
            ReferentialAction::Cascade | ReferentialAction::SetNull | ReferentialAction::SetDefault
        )
    }
}

/// A foreign key reference carried by a column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table.
    pub table: TableRef,
    /// Referenced column; defaults to `id` when absent.
    pub key: Option<String>,
    /// Action on delete of the referenced row.
    pub on_delete: Option<ReferentialAction>,
    /// Action on update of the referenced key.
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKeyRef {
    /// Reference `table (id)` with no actions.
    pub fn new(table: TableRef) -> Self {
        Self {
            table,
            key: None,
            on_delete: None,
            on_update: None,
        }
    }

    /// Set the referenced column.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the ON DELETE action.
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Set the ON UPDATE action.
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// The declared type of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    /// A scalar SQL type, carried verbatim (e.g. `INTEGER`, `NVARCHAR(255)`).
    Scalar(String),
    /// An enumerated type with its explicit value set; rendered as a text
    /// column plus a CHECK-IN constraint.
    Enum(Vec<String>),
}

impl ColumnType {
    /// Scalar type from any string-ish.
    pub fn scalar(ty: impl Into<String>) -> Self {
        ColumnType::Scalar(ty.into())
    }

    /// Whether this is a large-object type (text/binary). LOB columns
    /// cannot carry a schemable DEFAULT.
    #[must_use]
    pub fn is_lob(&self) -> bool {
        match self {
            ColumnType::Scalar(ty) => {
                let upper = ty.to_uppercase();
                upper.starts_with("TEXT")
                    || upper.starts_with("NTEXT")
                    || upper.contains("MAX")
                    || upper.starts_with("IMAGE")
                    || upper.starts_with("VARBINARY")
                    || upper.starts_with("BLOB")
            }
            ColumnType::Enum(_) => false,
        }
    }
}

/// Metadata for one column, as resolved by the calling ORM layer.
///
/// Attribute maps are ordered slices of these records; generators emit
/// columns in input order so repeated calls produce identical DDL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub column_type: ColumnType,
    /// Whether NULL is allowed.
    pub allow_null: bool,
    /// Whether this column is (part of) the primary key.
    pub primary_key: bool,
    /// Whether this column auto-increments (IDENTITY on SQL Server).
    pub auto_increment: bool,
    /// Whether this column carries a single-column UNIQUE constraint.
    pub unique: bool,
    /// Default value; never schemable for LOB types.
    pub default: Option<Value>,
    /// Foreign key reference, if any.
    pub references: Option<ForeignKeyRef>,
}

impl ColumnSpec {
    /// Create a column with the given name and type; flags default off,
    /// NULL allowed.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            allow_null: true,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    /// Disallow NULL.
    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Mark as primary key (implies NOT NULL in emitted DDL).
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as auto-incrementing.
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Add a single-column UNIQUE constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set a foreign key reference.
    pub fn references(mut self, fk: ForeignKeyRef) -> Self {
        self.references = Some(fk);
        self
    }

    /// Whether the default value can appear in DDL: present, non-null,
    /// and the column type is not a large object.
    #[must_use]
    pub fn has_schemable_default(&self) -> bool {
        matches!(&self.default, Some(v) if !v.is_null()) && !self.column_type.is_lob()
    }
}
