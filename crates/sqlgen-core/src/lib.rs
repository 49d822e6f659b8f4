//! Core types and traits for SQLGen Rust.
//!
//! `sqlgen-core` is the **contract layer** shared by every dialect generator.
//! It defines the metadata records a caller hands to a generator and the
//! trait each dialect implements.
//!
//! # Role In The Architecture
//!
//! - **Capability contract**: [`QueryGenerator`] is the trait implemented by
//!   dialect crates; its default methods fail fast for capabilities a
//!   dialect does not support.
//! - **Data model**: [`Value`], [`ColumnSpec`], [`TableRef`], and
//!   [`Condition`] describe tables, columns, and DML payloads without any
//!   dialect-specific syntax.
//! - **Per-operation options**: small typed records ([`CreateTableOptions`],
//!   [`SelectOptions`], ...) replace a shared untyped option bag, so each
//!   builder states exactly what it consumes.
//!
//! # Who Uses This Crate
//!
//! - Dialect crates (`sqlgen-mssql`, ...) implement [`QueryGenerator`] and
//!   render these records into SQL text.
//! - The calling ORM layer resolves model metadata into these records
//!   immediately before each generator call; nothing here is persisted.
//!
//! Every structure is a transient per-call value. Generators hold no state
//! beyond a frozen dialect configuration, so all of this is safe to share
//! across threads.

pub mod column;
pub mod condition;
pub mod error;
pub mod generator;
pub mod options;
pub mod table;
pub mod transaction;
pub mod value;
pub mod version;

pub use column::{ColumnSpec, ColumnType, ForeignKeyRef, ReferentialAction};
pub use condition::Condition;
pub use error::{Error, Result};
pub use generator::QueryGenerator;
pub use options::{
    CreateTableOptions, DeleteOptions, InsertOptions, OrderBy, SelectOptions, UniqueKey,
};
pub use table::TableRef;
pub use transaction::{IsolationLevel, TransactionDescriptor};
pub use value::Value;
pub use version::ServerVersion;
