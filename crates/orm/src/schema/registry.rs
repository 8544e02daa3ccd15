//! Schema registry - explicit, injected store of assembled schemas
//!
//! No hidden global: the application builds one registry at startup,
//! registers each entity type, and passes it by reference (or in an
//! `Arc`) to the finder and resolver.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{OrmError, OrmResult};
use crate::schema::entity::EntitySchema;

/// Registry of entity-type schemas, keyed by short type name
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<EntitySchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an assembled schema; a second registration under the
    /// same name is a configuration error
    pub fn register(&mut self, schema: EntitySchema) -> OrmResult<Arc<EntitySchema>> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(OrmError::Configuration(format!(
                "entity type '{}' is already registered",
                name
            )));
        }
        debug!(entity = %name, table = %schema.table(), "registered entity schema");
        let schema = Arc::new(schema);
        self.schemas.insert(name, schema.clone());
        Ok(schema)
    }

    /// Look up a schema by entity-type name
    pub fn get(&self, name: &str) -> OrmResult<Arc<EntitySchema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| OrmError::Schema(format!("unknown entity type '{}'", name)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
