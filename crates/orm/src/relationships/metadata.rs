//! Relation metadata - kind and descriptor definitions
//!
//! Descriptors are immutable, owned by the schema, and shared read-only
//! by every instance of the entity type after assembly.

use serde::{Deserialize, Serialize};

use crate::error::{OrmError, OrmResult};

/// The closed set of relation kinds, matched exhaustively throughout
/// the resolver and mutator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// One-to-one: the link column lives on this entity's table
    HasOne,
    /// Many-to-one: this entity holds the foreign key to its parent
    BelongsTo,
    /// One-to-many: the foreign key lives on the target's table,
    /// pointing back to this type
    HasMany,
    /// Many-to-many through a junction table
    ManyToMany,
}

impl RelationKind {
    /// Returns true if resolving this kind yields a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::ManyToMany)
    }

    /// Returns true if this kind resolves through a junction table
    pub fn requires_junction(self) -> bool {
        matches!(self, Self::ManyToMany)
    }
}

/// Declares how one entity type references another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDef {
    /// The relation kind
    pub kind: RelationKind,

    /// Short name of the target entity type, resolved through the registry
    pub target: String,

    /// Explicit link column override; when absent the name is derived
    /// by convention
    pub link_column: Option<String>,
}

impl RelationDef {
    pub fn new(kind: RelationKind, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            link_column: None,
        }
    }

    /// Override the convention-derived link column
    pub fn with_link_column(mut self, column: impl Into<String>) -> Self {
        self.link_column = Some(column.into());
        self
    }

    /// Validate the descriptor; `key` names the relation in error messages
    pub fn validate(&self, key: &str) -> OrmResult<()> {
        if self.target.is_empty() {
            return Err(OrmError::Configuration(format!(
                "relation '{}' is missing a target entity type",
                key
            )));
        }
        if let Some(ref column) = self.link_column {
            if column.is_empty() {
                return Err(OrmError::Configuration(format!(
                    "relation '{}' has an empty link column override",
                    key
                )));
            }
        }
        Ok(())
    }
}
