//! Finder - the lookup capabilities consumed by entity code
//!
//! Wraps the schema registry and the query execution boundary, hydrates
//! rows into entities, and fans named extension calls out across an
//! entity type's extensions.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::backends::DatabaseBackend;
use crate::collection::Collection;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::extensions::tree::{FIND_ALL_CHILDREN, FIND_ALL_TREE, FIND_SUB_TREE};
use crate::query::{FindOptions, QueryBuilder, QueryOperator};
use crate::schema::{EntitySchema, SchemaRegistry};

/// Entity lookup over a schema registry and an execution boundary
#[derive(Clone)]
pub struct Finder {
    registry: Arc<SchemaRegistry>,
    backend: Arc<dyn DatabaseBackend>,
}

impl Finder {
    pub fn new(registry: Arc<SchemaRegistry>, backend: Arc<dyn DatabaseBackend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Find a single entity by primary key; a miss is `None`, not an error
    pub async fn find_by_pk(&self, entity_type: &str, key: &Value) -> OrmResult<Option<Entity>> {
        let schema = self.registry.get(entity_type)?;
        let row = self
            .backend
            .find_by_key(schema.table(), schema.primary_key(), key)
            .await?;
        Ok(row.map(|row| Entity::from_row(schema.clone(), row)))
    }

    /// Find all entities of a type matching the given options
    pub async fn find_all(&self, entity_type: &str, options: FindOptions) -> OrmResult<Collection> {
        let schema = self.registry.get(entity_type)?;
        let rows = self.backend.find_all(schema.table(), &options).await?;
        Ok(Self::hydrate(&schema, rows))
    }

    /// Find all entities of a type where a column equals a value
    pub async fn find_all_by_column(
        &self,
        entity_type: &str,
        column: &str,
        value: &Value,
    ) -> OrmResult<Collection> {
        let schema = self.registry.get(entity_type)?;
        let rows = self
            .backend
            .find_all_by_column(schema.table(), column, value)
            .await?;
        Ok(Self::hydrate(&schema, rows))
    }

    /// Resolve a many-to-many relation through its junction table:
    /// select the target's rows joined on the junction, filtered by the
    /// owning side's primary key
    pub(crate) async fn find_via_junction(
        &self,
        target: &Arc<EntitySchema>,
        junction_table: &str,
        target_link_column: &str,
        own_link_column: &str,
        own_key: &Value,
    ) -> OrmResult<Vec<Entity>> {
        let (sql, params) = QueryBuilder::table(target.table())
            .alias("t1")
            .select(&["t1.*"])
            .join(
                junction_table,
                "j1",
                format!("t1.{} = j1.{}", target.primary_key(), target_link_column),
            )
            .filter(
                format!("j1.{}", own_link_column),
                QueryOperator::Equal,
                own_key.clone(),
            )
            .build();
        debug!(target = %target.name(), junction = junction_table, "junction lookup");

        let rows = self.backend.fetch(&sql, &params).await?;
        Ok(rows
            .into_iter()
            .map(|row| Entity::from_row(target.clone(), row))
            .collect())
    }

    /// Dispatch a named extension query at the type-level entry point.
    /// Each extension either handles the method or declines; when all
    /// decline the last refusal surfaces.
    pub async fn extension_static_call(
        &self,
        entity_type: &str,
        method: &str,
    ) -> OrmResult<Collection> {
        let schema = self.registry.get(entity_type)?;
        let mut refusal = None;
        for extension in schema.extensions() {
            match extension.call_static(self, &schema, method).await {
                Err(err @ OrmError::UnsupportedExtensionMethod { .. }) => refusal = Some(err),
                other => return other,
            }
        }
        Err(refusal.unwrap_or_else(|| {
            OrmError::Configuration(format!(
                "entity type '{}' has no extensions to handle '{}'",
                entity_type, method
            ))
        }))
    }

    /// Dispatch a named extension query at the instance entry point
    pub async fn extension_call(&self, entity: &Entity, method: &str) -> OrmResult<Collection> {
        let mut refusal = None;
        for extension in entity.schema().extensions() {
            match extension.call(self, entity, method).await {
                Err(err @ OrmError::UnsupportedExtensionMethod { .. }) => refusal = Some(err),
                other => return other,
            }
        }
        Err(refusal.unwrap_or_else(|| {
            OrmError::Configuration(format!(
                "entity type '{}' has no extensions to handle '{}'",
                entity.entity_type(),
                method
            ))
        }))
    }

    /// All nodes of a tree-enabled entity type, in pre-order
    pub async fn find_all_tree(&self, entity_type: &str) -> OrmResult<Collection> {
        self.extension_static_call(entity_type, FIND_ALL_TREE).await
    }

    /// Proper descendants of a node, pre-order, excluding the node itself
    pub async fn find_all_children(&self, entity: &Entity) -> OrmResult<Collection> {
        self.extension_call(entity, FIND_ALL_CHILDREN).await
    }

    /// A node's subtree, pre-order, including the node itself
    pub async fn find_sub_tree(&self, entity: &Entity) -> OrmResult<Collection> {
        self.extension_call(entity, FIND_SUB_TREE).await
    }

    fn hydrate(schema: &Arc<EntitySchema>, rows: Vec<crate::backends::Row>) -> Collection {
        let entities = rows
            .into_iter()
            .map(|row| Entity::from_row(schema.clone(), row))
            .collect();
        Collection::from_stored(entities)
    }
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
