//! Catalog introspection queries.
//!
//! Read-only templated queries over `INFORMATION_SCHEMA` and `sys.*`. The
//! generator never touches the database itself; it hands these strings to
//! the caller for execution.

use sqlgen_core::{QueryGenerator, TableRef};

use crate::MssqlQueryGenerator;

impl MssqlQueryGenerator {
    /// Quoted table name as an `OBJECT_ID` argument literal.
    fn object_id_literal(&self, table: &TableRef) -> String {
        format!("N'{}'", Self::escape_string(&self.quote_table(table)))
    }

    /// List user schemas, excluding the built-in ones and the `db_*`
    /// role schemas.
    pub fn list_schemas_query(&self) -> String {
        "SELECT name AS schema_name FROM sys.schemas WHERE name NOT IN (N'guest', N'INFORMATION_SCHEMA', N'sys') AND name NOT LIKE N'db_%' ORDER BY name;".to_string()
    }

    /// List base tables, optionally restricted to one schema.
    pub fn list_tables_query(&self, schema: Option<&str>) -> String {
        let mut sql = "SELECT TABLE_NAME, TABLE_SCHEMA FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = N'BASE TABLE'".to_string();
        if let Some(schema) = schema {
            sql.push_str(&format!(
                " AND TABLE_SCHEMA = N'{}'",
                Self::escape_string(schema)
            ));
        }
        sql.push_str(" ORDER BY TABLE_SCHEMA, TABLE_NAME;");
        sql
    }

    /// Describe a table's columns: type, length, nullability, default,
    /// and PRIMARY KEY / UNIQUE constraint membership.
    pub fn describe_table_query(&self, table: &TableRef) -> String {
        let mut sql = format!(
            "SELECT c.COLUMN_NAME AS 'Name', c.DATA_TYPE AS 'Type', c.CHARACTER_MAXIMUM_LENGTH AS 'Length', c.IS_NULLABLE AS 'IsNull', c.COLUMN_DEFAULT AS 'Default', pk.CONSTRAINT_TYPE AS 'Constraint' FROM INFORMATION_SCHEMA.COLUMNS c LEFT JOIN (SELECT tc.CONSTRAINT_TYPE, kcu.TABLE_NAME, kcu.TABLE_SCHEMA, kcu.COLUMN_NAME FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME WHERE tc.CONSTRAINT_TYPE IN (N'PRIMARY KEY', N'UNIQUE')) pk ON pk.TABLE_NAME = c.TABLE_NAME AND pk.TABLE_SCHEMA = c.TABLE_SCHEMA AND pk.COLUMN_NAME = c.COLUMN_NAME WHERE c.TABLE_NAME = N'{}'",
            Self::escape_string(&table.name)
        );
        if let Some(schema) = &table.schema {
            sql.push_str(&format!(
                " AND c.TABLE_SCHEMA = N'{}'",
                Self::escape_string(schema)
            ));
        }
        sql.push_str(" ORDER BY c.ORDINAL_POSITION;");
        sql
    }

    /// List every foreign key constraint on a table.
    pub fn foreign_keys_query(&self, table: &TableRef) -> String {
        format!(
            "SELECT fk.name AS constraint_name, OBJECT_NAME(fk.parent_object_id) AS table_name, c.name AS column_name, OBJECT_NAME(fk.referenced_object_id) AS referenced_table_name, rc.name AS referenced_column_name FROM sys.foreign_keys fk JOIN sys.foreign_key_columns fkc ON fk.object_id = fkc.constraint_object_id JOIN sys.columns c ON fkc.parent_object_id = c.object_id AND fkc.parent_column_id = c.column_id JOIN sys.columns rc ON fkc.referenced_object_id = rc.object_id AND fkc.referenced_column_id = rc.column_id WHERE fk.parent_object_id = OBJECT_ID({});",
            self.object_id_literal(table)
        )
    }

    /// Find the foreign key constraints attached to one column, needed to
    /// drop them by name before the column itself can go.
    pub fn foreign_key_by_column_query(&self, table: &TableRef, column: &str) -> String {
        format!(
            "SELECT fk.name AS constraint_name FROM sys.foreign_keys fk JOIN sys.foreign_key_columns fkc ON fk.object_id = fkc.constraint_object_id JOIN sys.columns c ON fkc.parent_object_id = c.object_id AND fkc.parent_column_id = c.column_id WHERE fk.parent_object_id = OBJECT_ID({}) AND c.name = N'{}';",
            self.object_id_literal(table),
            Self::escape_string(column)
        )
    }

    /// Find the autogenerated default-constraint name for a column.
    ///
    /// SQL Server names DEFAULT constraints itself and requires dropping
    /// them by that name before the column can be dropped or altered.
    pub fn default_constraint_query(&self, table: &TableRef, column: &str) -> String {
        let object_id = self.object_id_literal(table);
        format!(
            "SELECT name FROM sys.default_constraints WHERE parent_object_id = OBJECT_ID({object_id}) AND parent_column_id = (SELECT column_id FROM sys.columns WHERE object_id = OBJECT_ID({object_id}) AND name = N'{}');",
            Self::escape_string(column)
        )
    }

    /// Drop a named constraint.
    pub fn drop_constraint_query(&self, table: &TableRef, constraint: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {};",
            self.quote_table(table),
            self.quote_identifier(constraint)
        )
    }

    /// Fetch the server version as `Major.Minor.Patch`.
    ///
    /// `SERVERPROPERTY('ProductVersion')` reports a trailing build number;
    /// T-SQL has no split-from-right, so the string is reversed, cut at
    /// the first dot, and reversed back.
    pub fn version_query(&self) -> String {
        "DECLARE @ms_ver NVARCHAR(20); SET @ms_ver = REVERSE(CONVERT(NVARCHAR(20), SERVERPROPERTY('ProductVersion'))); SELECT REVERSE(SUBSTRING(@ms_ver, CHARINDEX('.', @ms_ver) + 1, 20)) AS 'version';".to_string()
    }
}
