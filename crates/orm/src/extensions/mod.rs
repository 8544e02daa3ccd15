//! Schema extensions
//!
//! An extension decorates an entity type at assembly time (extra columns
//! and indexes) and answers a closed, enumerated set of named queries at
//! the static and instance entry points. This is not an open dispatch
//! surface: adding a query means adding a named case to the extension,
//! and unrecognized names fail with
//! [`OrmError::UnsupportedExtensionMethod`](crate::error::OrmError).

pub mod tree;

use async_trait::async_trait;

use crate::collection::Collection;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::finder::Finder;
use crate::schema::{ColumnDef, EntitySchema, IndexDef};

pub use tree::TreeExtension;

/// A schema decorator with named query capabilities
#[async_trait]
pub trait Extension: Send + Sync {
    /// Extension name, used in error messages
    fn name(&self) -> &'static str;

    /// Decorate the column list during schema assembly. Additive only:
    /// a collision with a caller-defined column is a configuration error.
    fn prepare_columns(&self, _entity: &str, columns: Vec<ColumnDef>) -> OrmResult<Vec<ColumnDef>> {
        Ok(columns)
    }

    /// Decorate the index list during schema assembly
    fn prepare_indexes(&self, _entity: &str, indexes: Vec<IndexDef>) -> OrmResult<Vec<IndexDef>> {
        Ok(indexes)
    }

    /// Handle a named query at the static (type-level) entry point
    async fn call_static(
        &self,
        _finder: &Finder,
        _schema: &EntitySchema,
        method: &str,
    ) -> OrmResult<Collection> {
        Err(OrmError::UnsupportedExtensionMethod {
            extension: self.name().to_string(),
            method: method.to_string(),
        })
    }

    /// Handle a named query at the instance entry point
    async fn call(&self, _finder: &Finder, _entity: &Entity, method: &str) -> OrmResult<Collection> {
        Err(OrmError::UnsupportedExtensionMethod {
            extension: self.name().to_string(),
            method: method.to_string(),
        })
    }
}
