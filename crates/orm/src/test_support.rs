//! In-memory backend double for tests
//!
//! Holds tables as plain row vectors, interprets the structured lookup
//! capabilities directly, and keeps a query log so tests can assert on
//! how many round-trips a code path issued. The one raw-SQL entry point
//! only understands the junction-join shape the core emits.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::{BackendError, DatabaseBackend, Row};
use crate::error::OrmResult;
use crate::query::{FindOptions, QueryOperator, SortDirection, WhereCondition};

pub(crate) fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[derive(Default)]
pub(crate) struct MockBackend {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    log: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, table: &str, row: Row) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn query_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn log(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn table(&self, name: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn matches(row: &Row, condition: &WhereCondition) -> bool {
        let actual = row.get(&condition.column).unwrap_or(&Value::Null);
        match condition.operator {
            QueryOperator::Equal => actual == &condition.value,
            QueryOperator::NotEqual => actual != &condition.value,
            QueryOperator::GreaterThan
            | QueryOperator::GreaterThanOrEqual
            | QueryOperator::LessThan
            | QueryOperator::LessThanOrEqual => {
                let (lhs, rhs) = match (actual.as_f64(), condition.value.as_f64()) {
                    (Some(lhs), Some(rhs)) => (lhs, rhs),
                    _ => return false,
                };
                match condition.operator {
                    QueryOperator::GreaterThan => lhs > rhs,
                    QueryOperator::GreaterThanOrEqual => lhs >= rhs,
                    QueryOperator::LessThan => lhs < rhs,
                    QueryOperator::LessThanOrEqual => lhs <= rhs,
                    _ => unreachable!(),
                }
            }
        }
    }

    fn apply(&self, table: &str, options: &FindOptions) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .table(table)
            .into_iter()
            .filter(|row| options.conditions.iter().all(|c| Self::matches(row, c)))
            .collect();

        for order in options.order.iter().rev() {
            rows.sort_by(|a, b| {
                let left = a.get(&order.column).and_then(Value::as_f64).unwrap_or(0.0);
                let right = b.get(&order.column).and_then(Value::as_f64).unwrap_or(0.0);
                let ordering = left.partial_cmp(&right).unwrap_or(std::cmp::Ordering::Equal);
                match order.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        rows
    }

    /// Interpret the one raw statement shape the core emits: the
    /// many-to-many junction join rendered by the query builder.
    fn junction_join(&self, sql: &str, params: &[Value]) -> Option<Vec<Row>> {
        let tokens: Vec<&str> = sql.split_whitespace().collect();
        let after = |keyword: &str| {
            tokens
                .iter()
                .position(|t| *t == keyword)
                .and_then(|i| tokens.get(i + 1).copied())
        };

        let target_table = after("FROM")?;
        let junction_table = after("JOIN")?;
        let on = tokens.iter().position(|t| *t == "ON")?;
        let target_pk = tokens.get(on + 1)?.strip_prefix("t1.")?;
        let target_link = tokens.get(on + 3)?.strip_prefix("j1.")?;
        let own_link = after("WHERE")?.strip_prefix("j1.")?;
        let own_key = params.first()?;

        let targets = self.table(target_table);
        let mut rows = Vec::new();
        for junction_row in self.table(junction_table) {
            if junction_row.get(own_link) != Some(own_key) {
                continue;
            }
            let wanted = junction_row.get(target_link)?;
            if let Some(found) = targets.iter().find(|t| t.get(target_pk) == Some(wanted)) {
                rows.push(found.clone());
            }
        }
        Some(rows)
    }
}

#[async_trait]
impl DatabaseBackend for MockBackend {
    async fn fetch(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.log(format!("fetch: {}", sql));
        self.junction_join(sql, params)
            .ok_or_else(|| BackendError::Execution(format!("unsupported statement: {}", sql)).into())
    }

    async fn find_by_key(&self, table: &str, key_column: &str, key: &Value) -> OrmResult<Option<Row>> {
        self.log(format!("find_by_key: {}.{}", table, key_column));
        Ok(self
            .table(table)
            .into_iter()
            .find(|row| row.get(key_column) == Some(key)))
    }

    async fn find_all(&self, table: &str, options: &FindOptions) -> OrmResult<Vec<Row>> {
        self.log(format!("find_all: {}", table));
        Ok(self.apply(table, options))
    }
}
