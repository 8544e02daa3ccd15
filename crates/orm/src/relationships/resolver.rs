//! Relation resolver - lazy loading of related entities
//!
//! Resolution is an explicit call, not property interception: entity
//! code asks for a relation by key, the resolver dispatches on the
//! relation kind, issues at most one boundary round-trip, and memoizes
//! the result on the instance. A second resolution of the same key on
//! the same instance returns the cached value without querying.

use serde_json::Value;
use tracing::debug;

use crate::collection::Collection;
use crate::entity::{Entity, RelationValue};
use crate::error::{OrmError, OrmResult};
use crate::finder::Finder;
use crate::relationships::metadata::RelationKind;
use crate::relationships::naming;

/// Resolves and assigns relations for entity instances
#[derive(Debug, Clone)]
pub struct RelationResolver {
    finder: Finder,
}

impl RelationResolver {
    pub fn new(finder: Finder) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &Finder {
        &self.finder
    }

    /// Lazily resolve the relation `key` on `entity`.
    ///
    /// Singular kinds yield `One(None)` on an empty link or a
    /// primary-key miss; plural kinds always yield a collection. An
    /// unknown relation key is a programming error. Boundary failures
    /// propagate unchanged.
    pub async fn resolve(&self, entity: &mut Entity, key: &str) -> OrmResult<RelationValue> {
        if let Some(cached) = entity.cached_relation(key) {
            debug!(entity = %entity.entity_type(), relation = key, "relation cache hit");
            return Ok(cached.clone());
        }

        let schema = entity.schema().clone();
        let relation = schema
            .relation(key)
            .ok_or_else(|| OrmError::UnknownRelation {
                entity: schema.name().to_string(),
                relation: key.to_string(),
            })?;
        let target = self.finder.registry().get(&relation.target)?;
        debug!(
            entity = %schema.name(),
            relation = key,
            kind = ?relation.kind,
            target = %target.name(),
            "resolving relation"
        );

        let value = match relation.kind {
            RelationKind::HasOne | RelationKind::BelongsTo => {
                let link = naming::link_column(&schema, relation, &target);
                match entity.get(&link) {
                    Some(Value::Null) | None => RelationValue::One(None),
                    Some(link_value) => {
                        let link_value = link_value.clone();
                        let related = self.finder.find_by_pk(target.name(), &link_value).await?;
                        RelationValue::One(related.map(Box::new))
                    }
                }
            }
            RelationKind::HasMany => {
                let link = naming::link_column(&schema, relation, &target);
                match entity.primary_key() {
                    None => RelationValue::Many(Collection::new()),
                    Some(pk) => {
                        let pk = pk.clone();
                        let related = self
                            .finder
                            .find_all_by_column(target.name(), &link, &pk)
                            .await?;
                        RelationValue::Many(related)
                    }
                }
            }
            RelationKind::ManyToMany => {
                let junction = naming::link_column(&schema, relation, &target);
                match entity.primary_key() {
                    None => RelationValue::Many(Collection::new()),
                    Some(pk) => {
                        let pk = pk.clone();
                        let related = self
                            .finder
                            .find_via_junction(
                                &target,
                                &junction,
                                &naming::junction_link_column(&target),
                                &naming::junction_link_column(&schema),
                                &pk,
                            )
                            .await?;
                        if related.is_empty() {
                            RelationValue::Many(Collection::new())
                        } else {
                            RelationValue::Many(Collection::from_stored(related))
                        }
                    }
                }
            }
        };

        entity.cache_relation(key, value.clone());
        Ok(value)
    }
}
