//! Entity instances
//!
//! A mutable record of column values plus a lazily populated cache of
//! resolved relation values. Cache entries persist for the instance's
//! lifetime with no automatic invalidation: stale reads are possible if
//! the store changes underneath, which is an accepted limitation of the
//! per-instance memoization, not a defect to paper over.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::backends::Row;
use crate::collection::Collection;
use crate::schema::EntitySchema;

/// A resolved relation slot on an entity instance
#[derive(Debug, Clone)]
pub enum RelationValue {
    /// Singular relation: the related entity, or none
    One(Option<Box<Entity>>),
    /// Plural relation: an ordered collection
    Many(Collection),
    /// Uncoerced value stored by the mutator for kinds it leaves alone
    Raw(Value),
}

impl RelationValue {
    pub fn entity(&self) -> Option<&Entity> {
        match self {
            RelationValue::One(Some(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn collection(&self) -> Option<&Collection> {
        match self {
            RelationValue::Many(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RelationValue::One(None))
    }
}

/// A single entity instance bound to its type's schema
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<EntitySchema>,
    values: HashMap<String, Value>,
    relation_cache: HashMap<String, RelationValue>,
}

impl Entity {
    /// Create an empty instance of the given type
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            relation_cache: HashMap::new(),
        }
    }

    /// Hydrate an instance from a result row, mapping by column name
    pub fn from_row(schema: Arc<EntitySchema>, row: Row) -> Self {
        Self {
            schema,
            values: row,
            relation_cache: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// Short name of this instance's entity type
    pub fn entity_type(&self) -> &str {
        self.schema.name()
    }

    /// Read a column value
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Write a column value
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// The primary key value, if set and non-null
    pub fn primary_key(&self) -> Option<&Value> {
        match self.values.get(self.schema.primary_key()) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Previously resolved value for a relation key, if any
    pub fn cached_relation(&self, key: &str) -> Option<&RelationValue> {
        self.relation_cache.get(key)
    }

    /// Store a resolved relation value against its key
    pub fn cache_relation(&mut self, key: impl Into<String>, value: RelationValue) {
        self.relation_cache.insert(key.into(), value);
    }

    /// Drop one cached relation, forcing the next resolution to query
    pub fn forget_relation(&mut self, key: &str) -> Option<RelationValue> {
        self.relation_cache.remove(key)
    }
}
