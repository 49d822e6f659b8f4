//! SELECT fragments and paging.
//!
//! Two incompatible strategies, selected by server version:
//!
//! - SQL Server 2012+ (>= 11.0.0) takes standard `OFFSET ... FETCH NEXT`
//!   as a postfix fragment from [`MssqlQueryGenerator::add_limit_and_offset`].
//! - Older servers have no OFFSET; [`MssqlQueryGenerator::select_from_table_fragment`]
//!   emulates it with a nested `ROW_NUMBER()` query, and a limit without an
//!   offset degrades to a plain `TOP`.
//!
//! An absent or unparseable version means "modern". Either strategy needs a
//! deterministic order, so a primary-key `ORDER BY` is synthesized when the
//! caller supplies none.

use sqlgen_core::{OrderBy, QueryGenerator, SelectOptions, TableRef};

use crate::MssqlQueryGenerator;

impl MssqlQueryGenerator {
    fn uses_legacy_paging(options: &SelectOptions) -> bool {
        options
            .version
            .is_some_and(|v| !v.supports_offset_fetch())
    }

    fn render_order(&self, order: &[OrderBy]) -> String {
        let parts: Vec<String> = order
            .iter()
            .map(|term| {
                let quoted = self.quote_identifier(&term.column);
                if term.descending {
                    format!("{quoted} DESC")
                } else {
                    quoted
                }
            })
            .collect();
        parts.join(", ")
    }

    /// Build the `SELECT ... FROM ...` head of a query.
    ///
    /// On the modern path this is a plain select head; WHERE/ORDER/paging
    /// are appended by the caller. On the legacy path a requested offset
    /// folds the whole query (including `where_sql`) into the nested
    /// ROW_NUMBER emulation, and a limit alone becomes a `TOP` prefix.
    pub fn select_from_table_fragment(
        &self,
        options: &SelectOptions,
        table: &TableRef,
        attributes: &[String],
        main_alias: Option<&str>,
        where_sql: Option<&str>,
        primary_key: &str,
    ) -> String {
        let quoted_attrs: Vec<String> = attributes
            .iter()
            .map(|a| self.quote_identifier(a))
            .collect();
        let attrs = quoted_attrs.join(", ");
        let quoted_table = self.quote_table(table);
        let alias_fragment = main_alias
            .map(|a| format!(" AS {}", self.quote_identifier(a)))
            .unwrap_or_default();

        if !Self::uses_legacy_paging(options) {
            return format!("SELECT {attrs} FROM {quoted_table}{alias_fragment}");
        }

        let offset = options.offset.filter(|o| *o > 0);
        if let Some(offset) = offset {
            let order = if options.order.is_empty() {
                self.quote_identifier(primary_key)
            } else {
                self.render_order(&options.order)
            };
            let where_fragment = where_sql
                .filter(|w| !w.is_empty())
                .map(|w| format!(" WHERE {w}"))
                .unwrap_or_default();
            let top = options
                .limit
                .map(|l| format!("TOP {l} "))
                .unwrap_or_default();
            format!(
                "SELECT TOP 100 PERCENT {attrs} FROM (SELECT {top}* FROM (SELECT ROW_NUMBER() OVER (ORDER BY {order}) AS row_num, {attrs} FROM {quoted_table}{alias_fragment}{where_fragment}) AS sub WHERE sub.row_num > {offset}) AS paged"
            )
        } else if let Some(limit) = options.limit {
            format!("SELECT TOP({limit}) {attrs} FROM {quoted_table}{alias_fragment}")
        } else {
            format!("SELECT {attrs} FROM {quoted_table}{alias_fragment}")
        }
    }

    /// Build the paging postfix for the modern OFFSET...FETCH path.
    ///
    /// OFFSET is rejected without an ORDER BY, so a primary-key order is
    /// synthesized when the caller supplied none. On the legacy path this
    /// returns an empty fragment; paging is handled entirely by the
    /// from-fragment.
    pub fn add_limit_and_offset(&self, options: &SelectOptions, primary_key: &str) -> String {
        if Self::uses_legacy_paging(options) || !options.wants_paging() {
            return String::new();
        }

        let mut fragment = String::new();
        if options.order.is_empty() {
            fragment.push_str(&format!(" ORDER BY {}", self.quote_identifier(primary_key)));
        }
        fragment.push_str(&format!(" OFFSET {} ROWS", options.offset.unwrap_or(0)));
        if let Some(limit) = options.limit {
            fragment.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
        }
        fragment
    }
}
