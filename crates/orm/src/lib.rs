//! # arbor-orm: relational mapper core
//!
//! Lazy cross-entity relationship resolution over schema metadata -
//! one-to-one, belongs-to, one-to-many, and many-to-many with
//! convention-derived foreign-key and junction-table names - plus a
//! nested-set tree extension answering subtree and descendant queries
//! without recursive traversal.
//!
//! The crate owns no database driver: it consumes a query execution
//! boundary ([`backends::DatabaseBackend`]) that runs parameterized
//! statements and returns rows mappable to entities by column name.

pub mod backends;
pub mod collection;
pub mod entity;
pub mod error;
pub mod extensions;
pub mod finder;
pub mod query;
pub mod relationships;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;


// Re-export core types
pub use backends::*;
pub use collection::*;
pub use entity::*;
pub use error::*;
pub use extensions::{Extension, TreeExtension};
pub use finder::*;
pub use query::*;
pub use relationships::*;
pub use schema::*;
