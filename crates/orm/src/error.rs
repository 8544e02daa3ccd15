//! Error types for the ORM core
//!
//! Misconfiguration (bad relation descriptors, naming collisions) fails
//! loudly at schema-assembly time. Lookup misses are values, not errors:
//! an absent related entity resolves to `None` or an empty collection.

use std::fmt;

/// Result type alias for ORM operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for ORM operations
#[derive(Debug, Clone)]
pub enum OrmError {
    /// Relation key not present in the entity schema.
    /// A programming error, fatal to the calling operation.
    UnknownRelation { entity: String, relation: String },
    /// An extension was invoked with a method name outside its
    /// enumerated capability set.
    UnsupportedExtensionMethod { extension: String, method: String },
    /// Schema-assembly misconfiguration (duplicate columns, extension
    /// column collisions, malformed relation descriptors)
    Configuration(String),
    /// Entity type not found in the schema registry
    Schema(String),
    /// Failure propagated unchanged from the query execution boundary
    Database(String),
}

impl fmt::Display for OrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrmError::UnknownRelation { entity, relation } => {
                write!(f, "No such relation '{}' in entity type '{}'", relation, entity)
            }
            OrmError::UnsupportedExtensionMethod { extension, method } => {
                write!(f, "Method '{}' is not found in extension '{}'", method, extension)
            }
            OrmError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            OrmError::Schema(msg) => write!(f, "Schema error: {}", msg),
            OrmError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for OrmError {}

// Convert from anyhow errors raised by boundary adapters
impl From<anyhow::Error> for OrmError {
    fn from(err: anyhow::Error) -> Self {
        OrmError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_relation_names_entity_and_key() {
        let err = OrmError::UnknownRelation {
            entity: "User".to_string(),
            relation: "posts".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("posts"));
        assert!(msg.contains("User"));
    }

    #[test]
    fn test_unsupported_extension_method_names_both() {
        let err = OrmError::UnsupportedExtensionMethod {
            extension: "tree".to_string(),
            method: "findAllLeaves".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("findAllLeaves"));
        assert!(msg.contains("tree"));
    }
}
