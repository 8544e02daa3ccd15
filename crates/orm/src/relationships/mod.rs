//! Relationships module - relation metadata, naming conventions, and
//! the lazy resolver/mutator pair

pub mod metadata;
pub mod mutator;
pub mod naming;
pub mod resolver;

pub use metadata::*;
pub use mutator::*;
pub use resolver::*;
