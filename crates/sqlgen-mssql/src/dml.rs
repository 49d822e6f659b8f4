//! DML builders: bulk insert, MERGE upsert, delete.
//!
//! Identity columns shape all three builders: SQL Server rejects explicit
//! values for an `IDENTITY` column unless the batch toggles
//! `SET IDENTITY_INSERT`, and rejects updating one inside a MERGE, so the
//! builders classify columns against the caller-supplied metadata before
//! emitting anything.

use sqlgen_core::{
    ColumnSpec, Condition, DeleteOptions, Error, InsertOptions, QueryGenerator, Result, TableRef,
    Value,
};

use crate::{DIALECT, MssqlQueryGenerator};

impl MssqlQueryGenerator {
    /// Render a condition as a WHERE-clause body.
    ///
    /// Flat maps become an equality conjunction (`IS NULL` for null
    /// values); disjunctions wrap each clause in parentheses joined with
    /// OR. Empty conditions render as an empty string.
    pub fn where_clause(&self, condition: &Condition) -> String {
        match condition {
            Condition::All(clause) => self.render_conjunction(clause),
            Condition::Any(clauses) => {
                let parts: Vec<String> = clauses
                    .iter()
                    .filter(|clause| !clause.is_empty())
                    .map(|clause| format!("({})", self.render_conjunction(clause)))
                    .collect();
                parts.join(" OR ")
            }
        }
    }

    fn render_conjunction(&self, clause: &[(String, Value)]) -> String {
        let parts: Vec<String> = clause
            .iter()
            .map(|(column, value)| {
                let quoted = self.quote_identifier(column);
                if value.is_null() {
                    format!("{quoted} IS NULL")
                } else {
                    format!("{quoted} = {}", self.escape(value))
                }
            })
            .collect();
        parts.join(" AND ")
    }

    /// Build a batched INSERT over several value maps.
    ///
    /// The column list is the superset of all row columns in first-seen
    /// order. A column omitted from a row renders as `DEFAULT`; an
    /// explicit null renders as `NULL`. A row consisting solely of a null
    /// auto-increment column becomes a separate `DEFAULT VALUES`
    /// statement. If any row carries an explicit value for an identity
    /// column, the whole batch is wrapped in `SET IDENTITY_INSERT`.
    pub fn bulk_insert_query(
        &self,
        table: &TableRef,
        rows: &[Vec<(String, Value)>],
        options: &InsertOptions,
        meta: &[ColumnSpec],
    ) -> String {
        tracing::debug!(dialect = DIALECT, table = %table.name, rows = rows.len(), "Generating bulk INSERT");

        if rows.is_empty() {
            return String::new();
        }

        let identity: Vec<&str> = meta
            .iter()
            .filter(|c| c.auto_increment)
            .map(|c| c.name.as_str())
            .collect();
        let is_identity = |name: &str| identity.contains(&name);

        let mut needs_identity_wrapper = false;
        for row in rows {
            for (name, value) in row {
                if is_identity(name) && !value.is_null() {
                    needs_identity_wrapper = true;
                }
            }
        }

        // Identity columns stay out of the column list unless some row
        // actually supplies a value for them.
        let mut columns: Vec<&str> = Vec::new();
        for row in rows {
            for (name, _) in row {
                if columns.contains(&name.as_str()) {
                    continue;
                }
                if is_identity(name) && !needs_identity_wrapper {
                    continue;
                }
                columns.push(name);
            }
        }

        let mut tuples: Vec<String> = Vec::new();
        let mut default_rows = 0usize;
        for row in rows {
            let only_null_identity =
                row.len() == 1 && is_identity(&row[0].0) && row[0].1.is_null();
            if only_null_identity {
                default_rows += 1;
                continue;
            }
            let rendered: Vec<String> = columns
                .iter()
                .map(|col| match row.iter().find(|(name, _)| name == col) {
                    Some((_, value)) => self.escape(value),
                    None => "DEFAULT".to_string(),
                })
                .collect();
            tuples.push(format!("({})", rendered.join(", ")));
        }

        let quoted_table = self.quote_table(table);
        let output = if options.returning {
            " OUTPUT INSERTED.*"
        } else {
            ""
        };

        let mut statements: Vec<String> = Vec::new();
        if !tuples.is_empty() {
            let quoted_columns: Vec<String> =
                columns.iter().map(|c| self.quote_identifier(c)).collect();
            statements.push(format!(
                "INSERT INTO {quoted_table} ({}){output} VALUES {};",
                quoted_columns.join(", "),
                tuples.join(", ")
            ));
        }
        for _ in 0..default_rows {
            statements.push(format!("INSERT INTO {quoted_table}{output} DEFAULT VALUES;"));
        }

        let sql = statements.join(" ");
        if needs_identity_wrapper {
            format!(
                "SET IDENTITY_INSERT {quoted_table} ON; {sql} SET IDENTITY_INSERT {quoted_table} OFF;"
            )
        } else {
            sql
        }
    }

    /// Build an insert-or-update as a `MERGE` statement.
    ///
    /// The `HOLDLOCK` hint on the target closes the race where two
    /// concurrent merges on the same key both observe "not matched" and
    /// double-insert.
    ///
    /// The join condition comes from `where_condition`: candidate clauses
    /// with a missing or falsy value are discarded (a partial composite
    /// key cannot identify a row), a clause led by a primary-key column
    /// selects an equality conjunction over all primary-key columns, and
    /// otherwise a clause led by a unique column selects one over all
    /// unique columns. No usable clause is a caller misconfiguration and
    /// fails with [`Error::InvalidInput`].
    pub fn upsert_query(
        &self,
        table: &TableRef,
        insert_values: &[(String, Value)],
        update_values: &[(String, Value)],
        where_condition: &Condition,
        meta: &[ColumnSpec],
    ) -> Result<String> {
        tracing::debug!(dialect = DIALECT, table = %table.name, "Generating MERGE upsert");

        let primary_keys: Vec<&str> = meta
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.as_str())
            .collect();
        let unique_keys: Vec<&str> = meta
            .iter()
            .filter(|c| c.unique && !c.primary_key)
            .map(|c| c.name.as_str())
            .collect();
        let identity_keys: Vec<&str> = meta
            .iter()
            .filter(|c| c.auto_increment)
            .map(|c| c.name.as_str())
            .collect();

        let candidates: Vec<&[(String, Value)]> = where_condition
            .disjuncts()
            .into_iter()
            .filter(|clause| !clause.is_empty() && clause.iter().all(|(_, v)| !v.is_falsy()))
            .collect();

        let mut pk_join = false;
        let mut unique_join = false;
        for clause in &candidates {
            let first_key = clause[0].0.as_str();
            if primary_keys.contains(&first_key) {
                pk_join = true;
                break;
            }
            if unique_keys.contains(&first_key) {
                unique_join = true;
            }
        }
        let join_columns: &[&str] = if pk_join {
            &primary_keys
        } else if unique_join && !unique_keys.is_empty() {
            &unique_keys
        } else {
            return Err(Error::invalid_input(
                "Primary Key or Unique key should be passed to upsert query",
            ));
        };

        let target_alias = self.quote_identifier(&format!("{}_target", table.name));
        let source_alias = self.quote_identifier(&format!("{}_source", table.name));

        let join_condition: Vec<String> = join_columns
            .iter()
            .map(|col| {
                let quoted = self.quote_identifier(col);
                format!("{target_alias}.{quoted} = {source_alias}.{quoted}")
            })
            .collect();

        let insert_columns: Vec<String> = insert_values
            .iter()
            .map(|(name, _)| self.quote_identifier(name))
            .collect();
        let insert_literals: Vec<String> = insert_values
            .iter()
            .map(|(_, value)| self.escape(value))
            .collect();

        // The dialect disallows updating an identity column inside MERGE.
        let update_sets: Vec<String> = update_values
            .iter()
            .filter(|(name, _)| !identity_keys.contains(&name.as_str()))
            .map(|(name, value)| {
                format!(
                    "{target_alias}.{} = {}",
                    self.quote_identifier(name),
                    self.escape(value)
                )
            })
            .collect();

        let has_identity_value = |values: &[(String, Value)]| {
            values
                .iter()
                .any(|(name, v)| identity_keys.contains(&name.as_str()) && !v.is_null())
        };
        let needs_identity_wrapper =
            has_identity_value(insert_values) || has_identity_value(update_values);

        let quoted_table = self.quote_table(table);
        let mut sql = format!(
            "MERGE INTO {quoted_table} WITH(HOLDLOCK) AS {target_alias} USING (VALUES({})) AS {source_alias}({}) ON {}",
            insert_literals.join(", "),
            insert_columns.join(", "),
            join_condition.join(" AND ")
        );
        if !update_sets.is_empty() {
            sql.push_str(" WHEN MATCHED THEN UPDATE SET ");
            sql.push_str(&update_sets.join(", "));
        }
        sql.push_str(&format!(
            " WHEN NOT MATCHED THEN INSERT ({}) VALUES ({})",
            insert_columns.join(", "),
            insert_literals.join(", ")
        ));
        sql.push_str(" OUTPUT $action, INSERTED.*;");

        if needs_identity_wrapper {
            sql = format!(
                "SET IDENTITY_INSERT {quoted_table} ON; {sql} SET IDENTITY_INSERT {quoted_table} OFF;"
            );
        }
        Ok(sql)
    }

    /// Build a DELETE (or TRUNCATE) statement.
    ///
    /// Truncation cannot be filtered in this dialect, so `truncate`
    /// ignores any condition or limit. The delete form caps at one row
    /// unless a limit is given (zero removes the cap) and always appends
    /// the `@@ROWCOUNT` select, the only way to report the affected-row
    /// count back to the caller.
    pub fn delete_query(
        &self,
        table: &TableRef,
        where_condition: &Condition,
        options: &DeleteOptions,
    ) -> String {
        let quoted_table = self.quote_table(table);
        if options.truncate {
            return format!("TRUNCATE TABLE {quoted_table}");
        }

        let top = match options.limit {
            Some(0) => String::new(),
            Some(n) => format!(" TOP({n})"),
            None => " TOP(1)".to_string(),
        };
        let where_sql = self.where_clause(where_condition);
        let where_fragment = if where_sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {where_sql}")
        };

        format!(
            "DELETE{top} FROM {quoted_table}{where_fragment}; SELECT @@ROWCOUNT AS AFFECTEDROWS;"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_core::ColumnType;

    fn generator() -> MssqlQueryGenerator {
        MssqlQueryGenerator::new()
    }

    fn users_meta() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("id", ColumnType::scalar("INTEGER"))
                .primary_key()
                .auto_increment(),
            ColumnSpec::new("name", ColumnType::scalar("NVARCHAR(255)")).not_null(),
            ColumnSpec::new("email", ColumnType::scalar("NVARCHAR(255)")).unique(),
        ]
    }

    fn row(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_bulk_insert_basic() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[
                row(&[("name", Value::from("Alice")), ("age", Value::Int(30))]),
                row(&[("name", Value::from("Bob")), ("age", Value::Int(41))]),
            ],
            &InsertOptions::default(),
            &users_meta(),
        );
        assert_eq!(
            sql,
            "INSERT INTO [Users] ([name], [age]) VALUES (N'Alice', 30), (N'Bob', 41);"
        );
    }

    #[test]
    fn test_bulk_insert_omitted_vs_null() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[
                row(&[("name", Value::from("Alice")), ("age", Value::Int(30))]),
                row(&[("name", Value::Null)]),
            ],
            &InsertOptions::default(),
            &users_meta(),
        );
        // Second row: explicit NULL for name, DEFAULT for the omitted age.
        assert!(sql.contains("(NULL, DEFAULT)"));
    }

    #[test]
    fn test_bulk_insert_default_values_special_case() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[
                row(&[("id", Value::Null)]),
                row(&[("name", Value::from("Alice"))]),
            ],
            &InsertOptions::default(),
            &users_meta(),
        );
        assert_eq!(
            sql,
            "INSERT INTO [Users] ([name]) VALUES (N'Alice'); INSERT INTO [Users] DEFAULT VALUES;"
        );
    }

    #[test]
    fn test_bulk_insert_identity_wrapper() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[row(&[("id", Value::Int(7)), ("name", Value::from("Alice"))])],
            &InsertOptions::default(),
            &users_meta(),
        );
        assert!(sql.starts_with("SET IDENTITY_INSERT [Users] ON; "));
        assert!(sql.ends_with(" SET IDENTITY_INSERT [Users] OFF;"));
        assert!(sql.contains("INSERT INTO [Users] ([id], [name]) VALUES (7, N'Alice');"));
    }

    #[test]
    fn test_bulk_insert_null_identity_excluded_from_columns() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[row(&[("id", Value::Null), ("name", Value::from("Alice"))])],
            &InsertOptions::default(),
            &users_meta(),
        );
        assert_eq!(sql, "INSERT INTO [Users] ([name]) VALUES (N'Alice');");
    }

    #[test]
    fn test_bulk_insert_returning() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[row(&[("name", Value::from("Alice"))])],
            &InsertOptions { returning: true },
            &users_meta(),
        );
        assert_eq!(
            sql,
            "INSERT INTO [Users] ([name]) OUTPUT INSERTED.* VALUES (N'Alice');"
        );
    }

    #[test]
    fn test_bulk_insert_empty() {
        let sql = generator().bulk_insert_query(
            &TableRef::new("Users"),
            &[],
            &InsertOptions::default(),
            &users_meta(),
        );
        assert!(sql.is_empty());
    }

    #[test]
    fn test_upsert_primary_key_join() {
        let sql = generator()
            .upsert_query(
                &TableRef::new("Users"),
                &row(&[("id", Value::Null), ("name", Value::from("Alice"))]),
                &row(&[("name", Value::from("Alice"))]),
                &Condition::eq("id", 7i32),
                &users_meta(),
            )
            .unwrap();
        assert!(sql.contains("MERGE INTO [Users] WITH(HOLDLOCK) AS [Users_target]"));
        assert!(sql.contains("ON [Users_target].[id] = [Users_source].[id]"));
        assert!(sql.contains("WHEN MATCHED THEN UPDATE SET [Users_target].[name] = N'Alice'"));
        assert!(sql.contains("WHEN NOT MATCHED THEN INSERT ([id], [name]) VALUES (NULL, N'Alice')"));
        assert!(sql.ends_with("OUTPUT $action, INSERTED.*;"));
    }

    #[test]
    fn test_upsert_falsy_clause_falls_back_to_unique() {
        let condition = Condition::Any(vec![
            vec![("id".to_string(), Value::Null)],
            vec![("email".to_string(), Value::from("a@b.com"))],
        ]);
        let sql = generator()
            .upsert_query(
                &TableRef::new("Users"),
                &row(&[("email", Value::from("a@b.com")), ("name", Value::from("A"))]),
                &row(&[("name", Value::from("A"))]),
                &condition,
                &users_meta(),
            )
            .unwrap();
        assert!(sql.contains("ON [Users_target].[email] = [Users_source].[email]"));
    }

    #[test]
    fn test_upsert_without_key_errors() {
        let err = generator()
            .upsert_query(
                &TableRef::new("Users"),
                &row(&[("name", Value::from("A"))]),
                &row(&[("name", Value::from("A"))]),
                &Condition::eq("name", "A"),
                &users_meta(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Primary Key or Unique key should be passed to upsert query"
        );
    }

    #[test]
    fn test_upsert_identity_excluded_from_update() {
        let sql = generator()
            .upsert_query(
                &TableRef::new("Users"),
                &row(&[("id", Value::Int(9)), ("name", Value::from("A"))]),
                &row(&[("id", Value::Int(9)), ("name", Value::from("A"))]),
                &Condition::eq("id", 9i32),
                &users_meta(),
            )
            .unwrap();
        // Statement-wide identity wrapper, but no identity assignment in
        // the UPDATE branch.
        assert!(sql.starts_with("SET IDENTITY_INSERT [Users] ON; "));
        assert!(sql.ends_with(" SET IDENTITY_INSERT [Users] OFF;"));
        assert!(!sql.contains("UPDATE SET [Users_target].[id]"));
        assert!(sql.contains("UPDATE SET [Users_target].[name]"));
    }

    #[test]
    fn test_delete_defaults_to_single_row() {
        let sql = generator().delete_query(
            &TableRef::new("Users"),
            &Condition::eq("name", "Alice"),
            &DeleteOptions::default(),
        );
        assert_eq!(
            sql,
            "DELETE TOP(1) FROM [Users] WHERE [name] = N'Alice'; SELECT @@ROWCOUNT AS AFFECTEDROWS;"
        );
    }

    #[test]
    fn test_delete_explicit_limit_and_zero() {
        let g = generator();
        let table = TableRef::new("Users");
        let cond = Condition::eq("age", 30i32);

        let sql = g.delete_query(
            &table,
            &cond,
            &DeleteOptions {
                limit: Some(10),
                truncate: false,
            },
        );
        assert!(sql.starts_with("DELETE TOP(10) FROM [Users]"));

        let sql = g.delete_query(
            &table,
            &cond,
            &DeleteOptions {
                limit: Some(0),
                truncate: false,
            },
        );
        assert!(sql.starts_with("DELETE FROM [Users]"));
    }

    #[test]
    fn test_delete_truncate_ignores_where_and_limit() {
        let sql = generator().delete_query(
            &TableRef::new("Users"),
            &Condition::eq("name", "Alice"),
            &DeleteOptions {
                limit: Some(10),
                truncate: true,
            },
        );
        assert_eq!(sql, "TRUNCATE TABLE [Users]");
    }

    #[test]
    fn test_where_clause_null_and_or() {
        let g = generator();
        let cond = Condition::Any(vec![
            vec![("deletedAt".to_string(), Value::Null)],
            vec![
                ("age".to_string(), Value::Int(30)),
                ("name".to_string(), Value::from("A")),
            ],
        ]);
        assert_eq!(
            g.where_clause(&cond),
            "([deletedAt] IS NULL) OR ([age] = 30 AND [name] = N'A')"
        );
    }
}
