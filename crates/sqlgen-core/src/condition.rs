//! Equality conditions for DML builders.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A row-matching condition: either one flat equality conjunction, or a
/// disjunction of such conjunctions.
///
/// Upsert uses the disjunction form to offer several candidate key lookups
/// (primary key, then each unique key); delete renders whichever form it
/// is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `k1 = v1 AND k2 = v2 AND ...`
    All(Vec<(String, Value)>),
    /// `(clause1) OR (clause2) OR ...` where each clause is a flat
    /// equality conjunction.
    Any(Vec<Vec<(String, Value)>>),
}

impl Condition {
    /// Single-column equality.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::All(vec![(column.into(), value.into())])
    }

    /// The candidate clauses, viewed uniformly as a disjunct list.
    #[must_use]
    pub fn disjuncts(&self) -> Vec<&[(String, Value)]> {
        match self {
            Condition::All(clause) => vec![clause.as_slice()],
            Condition::Any(clauses) => clauses.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Whether there is nothing to match on.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::All(clause) => clause.is_empty(),
            Condition::Any(clauses) => clauses.iter().all(Vec::is_empty),
        }
    }
}
