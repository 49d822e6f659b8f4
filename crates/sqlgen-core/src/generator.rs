//! The dialect capability contract.

use crate::error::{Error, Result};
use crate::table::TableRef;
use crate::value::Value;

/// Capability contract implemented by each dialect generator.
///
/// Dialects override the quoting/escaping primitives and whichever DDL
/// capabilities they have. The trigger/function methods default to an
/// unsupported-operation error so a dialect without them fails fast
/// instead of returning empty SQL.
pub trait QueryGenerator {
    /// The dialect-identifying constant, used by callers to dispatch
    /// per-database behavior.
    fn dialect(&self) -> &'static str;

    /// Quote a single identifier for this dialect.
    fn quote_identifier(&self, name: &str) -> String;

    /// Quote a table reference, including its schema qualifier.
    fn quote_table(&self, table: &TableRef) -> String;

    /// Render a value as a SQL literal.
    fn escape(&self, value: &Value) -> String;

    /// Render a boolean for dialects without a native boolean literal.
    fn boolean_value(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    /// Build CREATE TRIGGER.
    fn create_trigger_query(&self, _table: &TableRef, _trigger_name: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "createTrigger"))
    }

    /// Build DROP TRIGGER.
    fn drop_trigger_query(&self, _trigger_name: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "dropTrigger"))
    }

    /// Build a trigger rename.
    fn rename_trigger_query(&self, _table: &TableRef, _old: &str, _new: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "renameTrigger"))
    }

    /// Build CREATE FUNCTION.
    fn create_function_query(&self, _function_name: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "createFunction"))
    }

    /// Build DROP FUNCTION.
    fn drop_function_query(&self, _function_name: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "dropFunction"))
    }

    /// Build a function rename.
    fn rename_function_query(&self, _old: &str, _new: &str) -> Result<String> {
        Err(Error::unsupported(self.dialect(), "renameFunction"))
    }
}
