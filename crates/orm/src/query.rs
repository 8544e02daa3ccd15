//! Query fragments - the fixed, small set of templated conditions and joins
//!
//! This is deliberately not a general query builder: the core only ever
//! composes a handful of templated lookups (find by key, find all with
//! conditions/ordering, one junction-table join). Statements are rendered
//! with `$N` placeholders and a separate parameter list.

use std::fmt;

use serde_json::Value;

/// Comparison operators usable in a where condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperator::Equal => write!(f, "="),
            QueryOperator::NotEqual => write!(f, "!="),
            QueryOperator::GreaterThan => write!(f, ">"),
            QueryOperator::GreaterThanOrEqual => write!(f, ">="),
            QueryOperator::LessThan => write!(f, "<"),
            QueryOperator::LessThanOrEqual => write!(f, "<="),
        }
    }
}

/// A single parameterized where condition
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Value,
}

/// Sort direction for an order clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASC"),
            SortDirection::Descending => write!(f, "DESC"),
        }
    }
}

/// A single order-by term
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// Options accepted by the "find all" capability: optional conditions
/// (combined with AND) and an optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub conditions: Vec<WhereCondition>,
    pub order: Vec<OrderBy>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, ANDed with any previous ones
    pub fn filter(mut self, column: impl Into<String>, operator: QueryOperator, value: Value) -> Self {
        self.conditions.push(WhereCondition {
            column: column.into(),
            operator,
            value,
        });
        self
    }

    /// Add an ascending order term
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction: SortDirection::Ascending,
        });
        self
    }

    /// Add a descending order term
    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction: SortDirection::Descending,
        });
        self
    }
}

/// Renders the templated SELECT statements the core issues
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    select: Vec<String>,
    from: String,
    from_alias: Option<String>,
    joins: Vec<(String, String, String)>,
    conditions: Vec<WhereCondition>,
    order: Vec<OrderBy>,
}

impl QueryBuilder {
    /// Start a `SELECT * FROM table` statement
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            select: vec!["*".to_string()],
            from: table.into(),
            from_alias: None,
            joins: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Replace the select list
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.select = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Alias the from table
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.from_alias = Some(alias.into());
        self
    }

    /// Add an inner join with an alias and an ON fragment
    pub fn join(mut self, table: impl Into<String>, alias: impl Into<String>, on: impl Into<String>) -> Self {
        self.joins.push((table.into(), alias.into(), on.into()));
        self
    }

    /// Add a parameterized where condition
    pub fn filter(mut self, column: impl Into<String>, operator: QueryOperator, value: Value) -> Self {
        self.conditions.push(WhereCondition {
            column: column.into(),
            operator,
            value,
        });
        self
    }

    /// Apply conditions and ordering from find options
    pub fn options(mut self, options: &FindOptions) -> Self {
        self.conditions.extend(options.conditions.iter().cloned());
        self.order.extend(options.order.iter().cloned());
        self
    }

    /// Render the SQL string and its parameter list
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", self.select.join(", "), self.from);
        if let Some(ref alias) = self.from_alias {
            sql.push_str(&format!(" AS {}", alias));
        }

        for (table, alias, on) in &self.joins {
            sql.push_str(&format!(" INNER JOIN {} AS {} ON {}", table, alias, on));
        }

        let mut params = Vec::with_capacity(self.conditions.len());
        for (i, condition) in self.conditions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!(
                "{} {} ${}",
                condition.column,
                condition.operator,
                i + 1
            ));
            params.push(condition.value.clone());
        }

        if !self.order.is_empty() {
            let terms: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("{} {}", o.column, o.direction))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
        }

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_select() {
        let (sql, params) = QueryBuilder::table("users").build();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_conditions_are_parameterized_in_order() {
        let (sql, params) = QueryBuilder::table("categories")
            .filter("__lft", QueryOperator::GreaterThan, json!(2))
            .filter("__rgt", QueryOperator::LessThanOrEqual, json!(7))
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM categories WHERE __lft > $1 AND __rgt <= $2"
        );
        assert_eq!(params, vec![json!(2), json!(7)]);
    }

    #[test]
    fn test_order_by_rendering() {
        let options = FindOptions::new().order_by("__lft");
        let (sql, _) = QueryBuilder::table("categories").options(&options).build();
        assert_eq!(sql, "SELECT * FROM categories ORDER BY __lft ASC");
    }

    #[test]
    fn test_junction_join_shape() {
        let (sql, params) = QueryBuilder::table("tags")
            .alias("t1")
            .select(&["t1.*"])
            .join("posts_to_tags", "j1", "t1.__id = j1.__tag_id")
            .filter("j1.__post_id", QueryOperator::Equal, json!(5))
            .build();
        assert_eq!(
            sql,
            "SELECT t1.* FROM tags AS t1 INNER JOIN posts_to_tags AS j1 \
             ON t1.__id = j1.__tag_id WHERE j1.__post_id = $1"
        );
        assert_eq!(params, vec![json!(5)]);
    }

    #[test]
    fn test_find_options_builder() {
        let options = FindOptions::new()
            .filter("__lvl", QueryOperator::Equal, json!(1))
            .order_by_desc("__rgt");
        assert_eq!(options.conditions.len(), 1);
        assert_eq!(options.order[0].direction, SortDirection::Descending);
    }
}
