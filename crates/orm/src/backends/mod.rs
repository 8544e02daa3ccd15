//! Query execution boundary
//!
//! The core never owns a database driver. It consumes this abstraction:
//! execute a parameterized statement, get back rows mappable to entities
//! by column name. Concrete adapters (postgres, sqlite, an in-memory
//! double) live outside the crate; the provided methods compose the fixed
//! templated lookups through the one required `fetch` call.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{OrmError, OrmResult};
use crate::query::{FindOptions, QueryBuilder, QueryOperator};

/// A result row: column name to value
pub type Row = HashMap<String, Value>;

/// Errors raised inside boundary adapters
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("connection failure: {0}")]
    Connection(String),
    #[error("query execution failed: {0}")]
    Execution(String),
}

impl From<BackendError> for OrmError {
    fn from(err: BackendError) -> Self {
        OrmError::Database(err.to_string())
    }
}

/// Abstract query execution boundary.
///
/// One blocking round-trip per call; retries, timeouts, and cancellation
/// are the adapter's business, not the core's. Failures propagate to the
/// caller unchanged.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
    /// Execute a parameterized statement and return the result rows
    async fn fetch(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>>;

    /// Fetch a single row by a key column value
    async fn find_by_key(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
    ) -> OrmResult<Option<Row>> {
        let (sql, params) = QueryBuilder::table(table)
            .filter(key_column, QueryOperator::Equal, key.clone())
            .build();
        let rows = self.fetch(&sql, &params).await?;
        Ok(rows.into_iter().next())
    }

    /// Fetch all rows matching the given options
    async fn find_all(&self, table: &str, options: &FindOptions) -> OrmResult<Vec<Row>> {
        let (sql, params) = QueryBuilder::table(table).options(options).build();
        self.fetch(&sql, &params).await
    }

    /// Fetch all rows where a column equals a value
    async fn find_all_by_column(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> OrmResult<Vec<Row>> {
        let options = FindOptions::new().filter(column, QueryOperator::Equal, value.clone());
        self.find_all(table, &options).await
    }
}
