//! Schema metadata - column, index, and entity-type definitions
//!
//! Read-only at runtime after assembly: `EntitySchemaBuilder::build`
//! applies extensions, validates, and hands out an immutable schema that
//! the registry shares between all instances of the entity type.

pub mod column;
pub mod entity;
pub mod index;
pub mod registry;

pub use column::*;
pub use entity::*;
pub use index::*;
pub use registry::*;
