//! Entity-type schema and its builder
//!
//! Assembly runs once per type: extensions decorate columns and indexes,
//! validation rejects duplicates and collisions, and the result is frozen.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{OrmError, OrmResult};
use crate::extensions::Extension;
use crate::relationships::metadata::RelationDef;
use crate::schema::column::{ColumnDef, ColumnType};
use crate::schema::index::IndexDef;

/// Convention-based primary key column name
pub const DEFAULT_PRIMARY_KEY: &str = "__id";

/// Static metadata for one entity type: columns, indexes, relations,
/// primary key, and the extensions that decorated it
pub struct EntitySchema {
    name: String,
    table: String,
    primary_key: String,
    columns: Vec<ColumnDef>,
    indexes: Vec<IndexDef>,
    relations: HashMap<String, RelationDef>,
    extensions: Vec<Arc<dyn Extension>>,
}

impl EntitySchema {
    /// Short type name, e.g. `Category`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Primary key column name
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    pub fn index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes.iter().find(|i| i.name == name)
    }

    pub fn relations(&self) -> &HashMap<String, RelationDef> {
        &self.relations
    }

    pub fn relation(&self, key: &str) -> Option<&RelationDef> {
        self.relations.get(key)
    }

    pub fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }
}

impl fmt::Debug for EntitySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySchema")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("columns", &self.columns)
            .field("indexes", &self.indexes)
            .field("relations", &self.relations)
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder assembling an [`EntitySchema`]
pub struct EntitySchemaBuilder {
    name: String,
    table: String,
    primary_key: String,
    columns: Vec<ColumnDef>,
    indexes: Vec<IndexDef>,
    relations: HashMap<String, RelationDef>,
    extensions: Vec<Arc<dyn Extension>>,
}

impl EntitySchemaBuilder {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
            relations: HashMap::new(),
            extensions: Vec::new(),
        }
    }

    /// Override the convention-based primary key column
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(ColumnDef::new(name, column_type));
        self
    }

    pub fn index(mut self, name: impl Into<String>, columns: &[&str]) -> Self {
        self.indexes.push(IndexDef::new(name, columns));
        self
    }

    pub fn relation(mut self, key: impl Into<String>, relation: RelationDef) -> Self {
        self.relations.insert(key.into(), relation);
        self
    }

    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Apply extensions, validate, and freeze the schema
    pub fn build(self) -> OrmResult<EntitySchema> {
        if self.name.is_empty() {
            return Err(OrmError::Configuration("entity type name is empty".to_string()));
        }
        if self.table.is_empty() {
            return Err(OrmError::Configuration(format!(
                "entity type '{}' has no table name",
                self.name
            )));
        }

        let mut columns = self.columns;
        // The primary key column is implied by convention when not declared
        if !columns.iter().any(|c| c.name == self.primary_key) {
            columns.insert(0, ColumnDef::new(self.primary_key.clone(), ColumnType::BigInt));
        }

        let mut indexes = self.indexes;
        for extension in &self.extensions {
            columns = extension.prepare_columns(&self.name, columns)?;
            indexes = extension.prepare_indexes(&self.name, indexes)?;
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(OrmError::Configuration(format!(
                    "duplicate column '{}' in entity type '{}'",
                    column.name, self.name
                )));
            }
        }
        for (i, index) in indexes.iter().enumerate() {
            if indexes[..i].iter().any(|x| x.name == index.name) {
                return Err(OrmError::Configuration(format!(
                    "duplicate index '{}' in entity type '{}'",
                    index.name, self.name
                )));
            }
        }
        for (key, relation) in &self.relations {
            relation.validate(key)?;
        }

        debug!(
            entity = %self.name,
            table = %self.table,
            columns = columns.len(),
            relations = self.relations.len(),
            "assembled entity schema"
        );

        Ok(EntitySchema {
            name: self.name,
            table: self.table,
            primary_key: self.primary_key,
            columns,
            indexes,
            relations: self.relations,
            extensions: self.extensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::metadata::RelationKind;

    #[test]
    fn test_primary_key_implied_by_convention() {
        let schema = EntitySchemaBuilder::new("User", "users")
            .column("name", ColumnType::String)
            .build()
            .unwrap();

        assert_eq!(schema.primary_key(), DEFAULT_PRIMARY_KEY);
        assert_eq!(schema.columns()[0].name, DEFAULT_PRIMARY_KEY);
        assert_eq!(schema.columns()[0].column_type, ColumnType::BigInt);
    }

    #[test]
    fn test_explicit_primary_key_not_duplicated() {
        let schema = EntitySchemaBuilder::new("User", "users")
            .primary_key("uid")
            .column("uid", ColumnType::Int)
            .column("name", ColumnType::String)
            .build()
            .unwrap();

        assert_eq!(schema.primary_key(), "uid");
        assert_eq!(schema.columns().len(), 2);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = EntitySchemaBuilder::new("User", "users")
            .column("name", ColumnType::String)
            .column("name", ColumnType::Text)
            .build();

        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_invalid_relation_rejected_at_assembly() {
        let result = EntitySchemaBuilder::new("Post", "posts")
            .relation("author", RelationDef::new(RelationKind::BelongsTo, ""))
            .build();

        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_relation_lookup() {
        let schema = EntitySchemaBuilder::new("Post", "posts")
            .column("title", ColumnType::String)
            .relation("author", RelationDef::new(RelationKind::BelongsTo, "User"))
            .build()
            .unwrap();

        assert!(schema.relation("author").is_some());
        assert!(schema.relation("reviewer").is_none());
    }
}
