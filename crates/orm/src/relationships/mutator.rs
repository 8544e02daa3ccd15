//! Relation mutator - coercing assigned values into relation slots
//!
//! Assignment writes only the in-memory relation slot; persisting the
//! change to the backing store is a separate step outside this crate.

use serde_json::Value;
use tracing::warn;

use crate::collection::Collection;
use crate::entity::{Entity, RelationValue};
use crate::error::{OrmError, OrmResult};
use crate::relationships::metadata::RelationKind;
use crate::relationships::resolver::RelationResolver;

/// A value being assigned to a relation slot, before coercion
#[derive(Debug, Clone)]
pub enum RelationAssignment {
    /// Clears the slot
    Empty,
    /// A primary-key scalar, resolved for singular kinds
    Key(Value),
    /// An ordered sequence of primary-key scalars, resolved in order
    /// for one-to-many kinds
    Keys(Vec<Value>),
    /// An already-constructed entity instance
    Entity(Entity),
    /// An already-constructed collection
    Collection(Collection),
}

impl RelationResolver {
    /// Assign `value` to the relation `key` on `entity`, coercing it
    /// into the correct in-memory representation for the relation kind.
    ///
    /// For one-to-many assignment from a key sequence, keys that fail to
    /// resolve are skipped: the resulting collection preserves input
    /// order but may be shorter than the input. Kinds outside the
    /// singular/one-to-many coercion rules store the value uncoerced.
    pub async fn assign(
        &self,
        entity: &mut Entity,
        key: &str,
        value: RelationAssignment,
    ) -> OrmResult<()> {
        let schema = entity.schema().clone();
        let relation = schema
            .relation(key)
            .ok_or_else(|| OrmError::UnknownRelation {
                entity: schema.name().to_string(),
                relation: key.to_string(),
            })?;

        let slot = match relation.kind {
            RelationKind::HasOne | RelationKind::BelongsTo => match value {
                RelationAssignment::Empty => RelationValue::One(None),
                RelationAssignment::Entity(related) => {
                    if related.entity_type() != relation.target {
                        return Err(OrmError::Configuration(format!(
                            "relation '{}' expects an entity of type '{}', got '{}'",
                            key,
                            relation.target,
                            related.entity_type()
                        )));
                    }
                    RelationValue::One(Some(Box::new(related)))
                }
                RelationAssignment::Key(pk) => {
                    if pk.is_null() {
                        RelationValue::One(None)
                    } else {
                        let related = self.finder().find_by_pk(&relation.target, &pk).await?;
                        if related.is_none() {
                            warn!(
                                entity = %schema.name(),
                                relation = key,
                                key = %pk,
                                "assigned primary key did not resolve"
                            );
                        }
                        RelationValue::One(related.map(Box::new))
                    }
                }
                RelationAssignment::Keys(_) | RelationAssignment::Collection(_) => {
                    return Err(OrmError::Configuration(format!(
                        "relation '{}' is singular and cannot take a sequence",
                        key
                    )));
                }
            },
            RelationKind::HasMany => match value {
                RelationAssignment::Empty => RelationValue::Many(Collection::new()),
                RelationAssignment::Collection(collection) => RelationValue::Many(collection),
                RelationAssignment::Keys(keys) => {
                    let mut collection = Collection::new();
                    for pk in keys {
                        match self.finder().find_by_pk(&relation.target, &pk).await? {
                            Some(related) => collection.push(related),
                            // Unresolvable keys are dropped, shortening the
                            // collection without disturbing the order of the
                            // rest.
                            None => warn!(
                                entity = %schema.name(),
                                relation = key,
                                key = %pk,
                                "skipping unresolvable key in one-to-many assignment"
                            ),
                        }
                    }
                    RelationValue::Many(collection)
                }
                RelationAssignment::Entity(_) | RelationAssignment::Key(_) => {
                    return Err(OrmError::Configuration(format!(
                        "relation '{}' expects a collection or a sequence of keys",
                        key
                    )));
                }
            },
            // No coercion: callers get back exactly what they put in.
            RelationKind::ManyToMany => match value {
                RelationAssignment::Empty => RelationValue::Raw(Value::Null),
                RelationAssignment::Entity(related) => RelationValue::One(Some(Box::new(related))),
                RelationAssignment::Collection(collection) => RelationValue::Many(collection),
                RelationAssignment::Key(pk) => RelationValue::Raw(pk),
                RelationAssignment::Keys(keys) => RelationValue::Raw(Value::Array(keys)),
            },
        };

        entity.cache_relation(key, slot);
        Ok(())
    }
}
