//! Transaction statement builders.
//!
//! Nested transactions map to named savepoints (`SAVE TRANSACTION`); only
//! top-level transactions emit BEGIN/COMMIT and accept an isolation level.
//! Committing a savepoint is a no-op (the enclosing transaction owns the
//! outcome), so those builders return `None` and the caller skips the
//! round-trip.

use rand::Rng;

use sqlgen_core::{IsolationLevel, QueryGenerator, TransactionDescriptor};

use crate::MssqlQueryGenerator;

impl MssqlQueryGenerator {
    /// Build the statement opening a transaction or savepoint.
    pub fn start_transaction_query(&self, transaction: &TransactionDescriptor) -> String {
        if transaction.is_nested() {
            format!("SAVE TRANSACTION {};", self.quote_identifier(&transaction.id))
        } else {
            "BEGIN TRANSACTION;".to_string()
        }
    }

    /// Build the commit statement; `None` for savepoints.
    pub fn commit_transaction_query(
        &self,
        transaction: &TransactionDescriptor,
    ) -> Option<String> {
        if transaction.is_nested() {
            return None;
        }
        Some("COMMIT TRANSACTION;".to_string())
    }

    /// Build the rollback statement; savepoints roll back by name.
    pub fn rollback_transaction_query(&self, transaction: &TransactionDescriptor) -> String {
        if transaction.is_nested() {
            format!(
                "ROLLBACK TRANSACTION {};",
                self.quote_identifier(&transaction.id)
            )
        } else {
            "ROLLBACK TRANSACTION;".to_string()
        }
    }

    /// Build the isolation-level statement; `None` for savepoints, which
    /// cannot carry their own isolation level.
    pub fn set_isolation_level_query(
        &self,
        level: IsolationLevel,
        transaction: &TransactionDescriptor,
    ) -> Option<String> {
        if transaction.is_nested() {
            return None;
        }
        Some(format!(
            "SET TRANSACTION ISOLATION LEVEL {};",
            level.as_sql()
        ))
    }

    /// Generate a random 20-hex-character transaction/savepoint name.
    pub fn generate_transaction_id(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 10] = rng.random();
        let mut id = String::with_capacity(20);
        for byte in bytes {
            id.push_str(&format!("{byte:02x}"));
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> MssqlQueryGenerator {
        MssqlQueryGenerator::new()
    }

    #[test]
    fn test_top_level_transaction() {
        let g = generator();
        let tx = TransactionDescriptor::root("abc123");
        assert_eq!(g.start_transaction_query(&tx), "BEGIN TRANSACTION;");
        assert_eq!(
            g.commit_transaction_query(&tx).as_deref(),
            Some("COMMIT TRANSACTION;")
        );
        assert_eq!(g.rollback_transaction_query(&tx), "ROLLBACK TRANSACTION;");
    }

    #[test]
    fn test_nested_transaction_uses_savepoints() {
        let g = generator();
        let tx = TransactionDescriptor::nested("cafe01", "abc123");
        assert_eq!(g.start_transaction_query(&tx), "SAVE TRANSACTION [cafe01];");
        assert_eq!(g.commit_transaction_query(&tx), None);
        assert_eq!(
            g.rollback_transaction_query(&tx),
            "ROLLBACK TRANSACTION [cafe01];"
        );
    }

    #[test]
    fn test_isolation_level() {
        let g = generator();
        let root = TransactionDescriptor::root("abc123");
        assert_eq!(
            g.set_isolation_level_query(IsolationLevel::Serializable, &root)
                .as_deref(),
            Some("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE;")
        );

        let nested = TransactionDescriptor::nested("cafe01", "abc123");
        assert_eq!(
            g.set_isolation_level_query(IsolationLevel::Serializable, &nested),
            None
        );
    }

    #[test]
    fn test_generate_transaction_id() {
        let g = generator();
        let id = g.generate_transaction_id();
        assert_eq!(id.len(), 20);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

        // Two draws colliding would mean the generator is not random.
        assert_ne!(id, g.generate_transaction_id());
    }
}
