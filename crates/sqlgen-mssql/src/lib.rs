//! Microsoft SQL Server query generation.
//!
//! `sqlgen-mssql` renders the dialect-neutral records from `sqlgen-core`
//! into T-SQL text, covering the quirks that distinguish SQL Server from
//! the other dialects:
//!
//! - `[bracket]` identifier quoting and `N'...'` unicode string literals
//! - `IDENTITY(1,1)` auto-increment columns, which reject explicit values
//!   unless the session toggles `IDENTITY_INSERT`
//! - upsert via `MERGE ... WITH(HOLDLOCK)` instead of `ON CONFLICT`
//! - two paging strategies: `OFFSET...FETCH` on SQL Server 2012+ and a
//!   nested `ROW_NUMBER()` emulation on older servers
//! - `sp_rename` / `sp_executesql` procedure idioms for renames and
//!   dynamic schema creation
//!
//! Every builder is a pure synchronous function from metadata to one SQL
//! string (or a `;`-joined batch). The generator itself holds no state, so
//! one instance can be shared freely across threads; the `HOLDLOCK` and
//! `IDENTITY_INSERT` devices in the emitted text protect concurrent
//! *execution* of the statements, not the generator.

use std::sync::OnceLock;

use regex::Regex;

use sqlgen_core::{QueryGenerator, TableRef, Value};

mod ddl;
mod dml;
mod introspect;
mod select;
mod transaction;

/// Dialect name exposed to the dispatching layer.
pub const DIALECT: &str = "mssql";

/// Characters scrubbed from identifiers before bracket-quoting.
///
/// Stripping rather than doubling keeps quoting idempotent: re-quoting an
/// already-bracketed name removes the old brackets first.
fn strip_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\[\]']+").expect("valid identifier scrub pattern"))
}

/// Query generator for Microsoft SQL Server.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlQueryGenerator;

impl MssqlQueryGenerator {
    /// Create a new generator instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Escape the content of a single-quoted SQL string literal.
    pub(crate) fn escape_string(raw: &str) -> String {
        raw.replace('\'', "''")
    }

    /// Render a unicode string literal.
    pub(crate) fn string_literal(raw: &str) -> String {
        format!("N'{}'", Self::escape_string(raw))
    }
}

impl QueryGenerator for MssqlQueryGenerator {
    fn dialect(&self) -> &'static str {
        DIALECT
    }

    /// Bracket-quote an identifier.
    ///
    /// Embedded brackets and single quotes are stripped first, so quoting
    /// is idempotent and safe for any printable identifier. The wildcard
    /// `*` passes through unchanged.
    fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        format!("[{}]", strip_pattern().replace_all(name, ""))
    }

    fn quote_table(&self, table: &TableRef) -> String {
        match &table.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&table.name)
            ),
            None => self.quote_identifier(&table.name),
        }
    }

    /// Render a value as a T-SQL literal.
    ///
    /// SQL Server has no boolean literal, so booleans render as 1/0.
    /// Non-finite floats have no literal form and degrade to NULL.
    fn escape(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.boolean_value(*b).to_string(),
            Value::TinyInt(i) => i.to_string(),
            Value::SmallInt(i) => i.to_string(),
            Value::Int(i) => i.to_string(),
            Value::BigInt(i) => i.to_string(),
            Value::Float(f) => {
                if f.is_finite() {
                    f.to_string()
                } else {
                    "NULL".to_string()
                }
            }
            Value::Double(f) => {
                if f.is_finite() {
                    f.to_string()
                } else {
                    "NULL".to_string()
                }
            }
            Value::Text(s) => Self::string_literal(s),
            Value::Bytes(b) => {
                let mut literal = String::with_capacity(2 + b.len() * 2);
                literal.push_str("0x");
                for byte in b {
                    literal.push_str(&format!("{byte:02x}"));
                }
                literal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_name() {
        assert_eq!(MssqlQueryGenerator::new().dialect(), "mssql");
    }

    #[test]
    fn test_quote_identifier() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.quote_identifier("myTable"), "[myTable]");
        assert_eq!(g.quote_identifier("Users"), "[Users]");
    }

    #[test]
    fn test_quote_identifier_idempotent() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.quote_identifier("[myTable]"), "[myTable]");
        assert_eq!(
            g.quote_identifier(&g.quote_identifier("myTable")),
            "[myTable]"
        );
    }

    #[test]
    fn test_quote_identifier_strips_injection() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.quote_identifier("ta]ble'"), "[table]");
        assert_eq!(g.quote_identifier("[a]'[b]"), "[ab]");
    }

    #[test]
    fn test_quote_identifier_wildcard_passthrough() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.quote_identifier("*"), "*");
    }

    #[test]
    fn test_quote_table() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.quote_table(&TableRef::new("Users")), "[Users]");
        assert_eq!(
            g.quote_table(&TableRef::with_schema("Users", "app")),
            "[app].[Users]"
        );
    }

    #[test]
    fn test_escape_values() {
        let g = MssqlQueryGenerator::new();
        assert_eq!(g.escape(&Value::Null), "NULL");
        assert_eq!(g.escape(&Value::Bool(true)), "1");
        assert_eq!(g.escape(&Value::Bool(false)), "0");
        assert_eq!(g.escape(&Value::Int(42)), "42");
        assert_eq!(g.escape(&Value::Text("O'Brien".to_string())), "N'O''Brien'");
        assert_eq!(g.escape(&Value::Bytes(vec![0xde, 0xad])), "0xdead");
        assert_eq!(g.escape(&Value::Double(f64::NAN)), "NULL");
    }

    #[test]
    fn test_unsupported_capabilities() {
        let g = MssqlQueryGenerator::new();
        let table = TableRef::new("Users");
        assert!(g.create_trigger_query(&table, "trg").is_err());
        assert!(g.drop_trigger_query("trg").is_err());
        assert!(g.rename_trigger_query(&table, "a", "b").is_err());
        assert!(g.create_function_query("fn").is_err());
        assert!(g.drop_function_query("fn").is_err());
        assert!(g.rename_function_query("a", "b").is_err());

        let err = g.drop_trigger_query("trg").unwrap_err();
        assert_eq!(
            err.to_string(),
            "dropTrigger is not supported by the mssql dialect"
        );
    }
}
