//! Schema DDL builders.
//!
//! SQL Server forbids inline `REFERENCES` clauses in some column positions,
//! so `create_table_query` hoists primary-key and foreign-key fragments out
//! of the column list into trailing table constraints. CREATE/DROP TABLE
//! are wrapped in `OBJECT_ID` existence guards so repeated execution is a
//! no-op.

use sqlgen_core::{ColumnSpec, ColumnType, CreateTableOptions, QueryGenerator, TableRef};

use crate::{DIALECT, MssqlQueryGenerator};

impl MssqlQueryGenerator {
    /// Build a guarded dynamic CREATE SCHEMA statement.
    ///
    /// The existence check uses a string literal; the created schema is a
    /// quoted identifier inside the `sp_executesql` payload.
    pub fn create_schema_query(&self, schema: &str) -> String {
        format!(
            "IF NOT EXISTS (SELECT schema_name FROM information_schema.schemata WHERE schema_name = N'{}') BEGIN EXEC sp_executesql N'CREATE SCHEMA {}' END;",
            Self::escape_string(schema),
            self.quote_identifier(schema)
        )
    }

    /// Render one column definition, without the leading column name.
    ///
    /// Clause order is fixed: base type, NOT NULL/NULL, IDENTITY, DEFAULT,
    /// UNIQUE, PRIMARY KEY, REFERENCES with its actions. Enumerated types
    /// render as a text column plus CHECK-IN and skip every other clause.
    /// `table` is the table being defined; a reference back to it drops the
    /// ON DELETE/ON UPDATE actions, which SQL Server rejects on
    /// self-referential constraints.
    pub fn attribute_to_sql(&self, attr: &ColumnSpec, table: &TableRef) -> String {
        let base = match &attr.column_type {
            ColumnType::Enum(values) => {
                let rendered: Vec<String> =
                    values.iter().map(|v| Self::string_literal(v)).collect();
                return format!(
                    "VARCHAR(255) CHECK ({} IN ({}))",
                    self.quote_identifier(&attr.name),
                    rendered.join(", ")
                );
            }
            ColumnType::Scalar(ty) => ty.clone(),
        };

        let mut fragments = vec![base];

        if !attr.allow_null {
            fragments.push("NOT NULL".to_string());
        } else if !attr.primary_key && !attr.has_schemable_default() {
            fragments.push("NULL".to_string());
        }

        if attr.auto_increment {
            fragments.push("IDENTITY(1,1)".to_string());
        }

        if attr.has_schemable_default() {
            if let Some(default) = &attr.default {
                fragments.push(format!("DEFAULT {}", self.escape(default)));
            }
        }

        if attr.unique {
            fragments.push("UNIQUE".to_string());
        }

        if attr.primary_key {
            fragments.push("PRIMARY KEY".to_string());
        }

        if let Some(fk) = &attr.references {
            let key = fk.key.as_deref().unwrap_or("id");
            fragments.push(format!(
                "REFERENCES {} ({})",
                self.quote_table(&fk.table),
                self.quote_identifier(key)
            ));

            let self_reference = fk.table.name == table.name;
            if self_reference && (fk.on_delete.is_some() || fk.on_update.is_some()) {
                tracing::warn!(
                    table = %table.name,
                    column = %attr.name,
                    "MSSQL does not support self-referential ON DELETE/ON UPDATE actions, dropping them"
                );
            }
            if !self_reference {
                if let Some(action) = fk.on_delete {
                    fragments.push(format!("ON DELETE {}", action.as_sql()));
                }
                if let Some(action) = fk.on_update {
                    fragments.push(format!("ON UPDATE {}", action.as_sql()));
                }
            }
        }

        fragments.join(" ")
    }

    /// Render a whole attribute map into `(name, definition)` pairs,
    /// applying the dialect-wide foreign-key restrictions first:
    /// `ON UPDATE` actions are never enforceable and are cleared from every
    /// reference; only the first reference to a given target table keeps
    /// its `ON DELETE` action.
    pub fn attributes_to_sql(
        &self,
        attrs: &[ColumnSpec],
        table: &TableRef,
    ) -> Vec<(String, String)> {
        let mut seen_targets: Vec<String> = Vec::new();
        let mut out = Vec::with_capacity(attrs.len());

        for attr in attrs {
            let mut attr = attr.clone();
            if let Some(fk) = attr.references.as_mut() {
                fk.on_update = None;
                if seen_targets.contains(&fk.table.name) {
                    fk.on_delete = None;
                } else {
                    seen_targets.push(fk.table.name.clone());
                }
            }
            let sql = self.attribute_to_sql(&attr, table);
            out.push((attr.name, sql));
        }

        out
    }

    /// Build a guarded CREATE TABLE statement from rendered attribute
    /// definitions (the output of [`Self::attributes_to_sql`]).
    ///
    /// `PRIMARY KEY` tokens are collected into one trailing composite
    /// clause and `REFERENCES` tails are relocated into trailing
    /// `FOREIGN KEY` clauses. Unique-key groups from `options` append as
    /// named `CONSTRAINT ... UNIQUE` clauses; unnamed groups are named
    /// `uniq_<table>_<col1>_<col2>`.
    pub fn create_table_query(
        &self,
        table: &TableRef,
        attributes: &[(String, String)],
        options: &CreateTableOptions,
    ) -> String {
        tracing::debug!(dialect = DIALECT, table = %table.name, "Generating CREATE TABLE");

        let mut columns = Vec::with_capacity(attributes.len());
        let mut primary_keys: Vec<String> = Vec::new();
        let mut foreign_keys: Vec<String> = Vec::new();

        for (name, definition) in attributes {
            let quoted = self.quote_identifier(name);
            let mut definition = definition.clone();

            if definition.contains("PRIMARY KEY") {
                primary_keys.push(quoted.clone());
                definition = definition.replace(" PRIMARY KEY", "");
            }

            if let Some(pos) = definition.find("REFERENCES") {
                foreign_keys.push(format!("FOREIGN KEY ({}) {}", quoted, &definition[pos..]));
                definition.truncate(pos);
            }

            columns.push(format!("{} {}", quoted, definition.trim_end()));
        }

        let mut clauses = columns;
        if !primary_keys.is_empty() {
            clauses.push(format!("PRIMARY KEY ({})", primary_keys.join(", ")));
        }
        for unique_key in &options.unique_keys {
            let name = unique_key
                .name
                .clone()
                .unwrap_or_else(|| format!("uniq_{}_{}", table.name, unique_key.columns.join("_")));
            let cols: Vec<String> = unique_key
                .columns
                .iter()
                .map(|c| self.quote_identifier(c))
                .collect();
            clauses.push(format!(
                "CONSTRAINT {} UNIQUE ({})",
                self.quote_identifier(&name),
                cols.join(", ")
            ));
        }
        clauses.extend(foreign_keys);

        let quoted_table = self.quote_table(table);
        format!(
            "IF OBJECT_ID(N'{quoted_table}', 'U') IS NULL CREATE TABLE {quoted_table} ({});",
            clauses.join(", ")
        )
    }

    /// Build a guarded DROP TABLE statement.
    pub fn drop_table_query(&self, table: &TableRef) -> String {
        let quoted = self.quote_table(table);
        format!("IF OBJECT_ID(N'{quoted}', 'U') IS NOT NULL DROP TABLE {quoted};")
    }

    /// Build a table rename via the `sp_rename` procedure.
    pub fn rename_table_query(&self, before: &TableRef, after: &TableRef) -> String {
        format!(
            "EXEC sp_rename N'{}', N'{}';",
            self.quote_table(before),
            Self::escape_string(&after.name)
        )
    }

    /// Build ALTER TABLE ... ADD for one column.
    pub fn add_column_query(&self, table: &TableRef, attr: &ColumnSpec) -> String {
        format!(
            "ALTER TABLE {} ADD {} {};",
            self.quote_table(table),
            self.quote_identifier(&attr.name),
            self.attribute_to_sql(attr, table)
        )
    }

    /// Build ALTER TABLE ... DROP COLUMN.
    pub fn remove_column_query(&self, table: &TableRef, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.quote_table(table),
            self.quote_identifier(column)
        )
    }

    /// Build one ALTER TABLE statement redefining the given columns.
    ///
    /// Plain redefinitions become `ALTER COLUMN` entries; definitions
    /// carrying a `REFERENCES` tail instead become named
    /// `ADD CONSTRAINT <col>_foreign_idx FOREIGN KEY` entries. Both groups
    /// are concatenated into a single statement.
    pub fn change_column_query(
        &self,
        table: &TableRef,
        attributes: &[(String, String)],
    ) -> String {
        let mut alters: Vec<String> = Vec::new();
        let mut constraints: Vec<String> = Vec::new();

        for (name, definition) in attributes {
            if let Some(pos) = definition.find("REFERENCES") {
                constraints.push(format!(
                    "{} FOREIGN KEY ({}) {}",
                    self.quote_identifier(&format!("{name}_foreign_idx")),
                    self.quote_identifier(name),
                    &definition[pos..]
                ));
            } else {
                alters.push(format!("{} {}", self.quote_identifier(name), definition));
            }
        }

        let mut body = String::new();
        if !alters.is_empty() {
            body.push_str("ALTER COLUMN ");
            body.push_str(&alters.join(", "));
        }
        if !alters.is_empty() && !constraints.is_empty() {
            body.push(' ');
        }
        if !constraints.is_empty() {
            body.push_str("ADD CONSTRAINT ");
            body.push_str(&constraints.join(", "));
        }

        format!("ALTER TABLE {} {body};", self.quote_table(table))
    }

    /// Build a column rename via `sp_rename` with the `'COLUMN'` object
    /// type.
    pub fn rename_column_query(&self, table: &TableRef, before: &str, after: &str) -> String {
        format!(
            "EXEC sp_rename N'{}.{}', N'{}', 'COLUMN';",
            self.quote_table(table),
            self.quote_identifier(before),
            Self::escape_string(after)
        )
    }
}
