use crate::{db::query::SelectQuery, value::Value};
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// One storage row, keyed by column name.
pub type Row = BTreeMap<String, Value>;

///
/// StorageError
///
/// Connector failure surface. Propagates to the caller unmodified: the
/// runtime performs no implicit retry and no compensating rollback.
///

#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("storage connection failed: {0}")]
    ConnectionFailed(String),

    #[error("storage constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("storage operation timed out: {0}")]
    Timeout(String),
}

///
/// StorageConnector
///
/// External persistence port. The runtime issues single-row mutations and
/// parameterized selects; every call may suspend. Implemented elsewhere —
/// this core depends only on the trait.
///

#[async_trait]
pub trait StorageConnector: Send + Sync {
    /// Insert one row; returns the storage-assigned identity.
    async fn insert(
        &self,
        table: &str,
        columns: Vec<(String, Value)>,
    ) -> Result<Value, StorageError>;

    /// Update columns on the row matching `key`; returns the affected
    /// row count.
    async fn update(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
        columns: Vec<(String, Value)>,
    ) -> Result<u64, StorageError>;

    /// Delete the row matching `key`; returns the affected row count.
    async fn delete(&self, table: &str, key_column: &str, key: &Value)
    -> Result<u64, StorageError>;

    /// Run a parameterized select.
    async fn query(&self, query: SelectQuery) -> Result<Vec<Row>, StorageError>;
}
