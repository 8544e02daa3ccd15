//! Nested-set tree extension
//!
//! Augments an entity type with the classic nested-set encoding
//! (`__lft`, `__rgt`, `__lvl`, `__prt`) and answers subtree, descendant,
//! and tree-order queries as single range scans, no recursion.
//!
//! Invariants assumed of the stored data: every descendant of a node N
//! has `__lft` and `__rgt` strictly inside `(N.__lft, N.__rgt)`,
//! `__rgt - __lft` is odd, and `__lvl` is the depth from the root.
//! Only read queries live here; maintaining the encoding on insert,
//! delete, and move is the caller's responsibility.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::collection::Collection;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use crate::extensions::Extension;
use crate::finder::Finder;
use crate::query::{FindOptions, QueryOperator};
use crate::schema::{ColumnDef, ColumnType, EntitySchema, IndexDef};

/// Left boundary of the node's interval, assigned in pre-order
pub const LEFT_COLUMN: &str = "__lft";
/// Right boundary of the node's interval
pub const RIGHT_COLUMN: &str = "__rgt";
/// Depth from the root
pub const LEVEL_COLUMN: &str = "__lvl";
/// Parent link, same entity type
pub const PARENT_COLUMN: &str = "__prt";

/// Composite index over the three tree-order columns
const KEY_INDEX: &str = "__key";

/// Name of the static "all nodes in tree order" query
pub const FIND_ALL_TREE: &str = "findAllTree";
/// Name of the instance "strict descendants" query
pub const FIND_ALL_CHILDREN: &str = "findAllChildren";
/// Name of the instance "inclusive subtree" query
pub const FIND_SUB_TREE: &str = "findSubTree";

/// The closed set of static tree queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StaticMethod {
    FindAllTree,
}

impl StaticMethod {
    fn parse(method: &str) -> Option<Self> {
        match method {
            FIND_ALL_TREE => Some(Self::FindAllTree),
            _ => None,
        }
    }
}

/// The closed set of instance tree queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceMethod {
    FindAllChildren,
    FindSubTree,
}

impl InstanceMethod {
    fn parse(method: &str) -> Option<Self> {
        match method {
            FIND_ALL_CHILDREN => Some(Self::FindAllChildren),
            FIND_SUB_TREE => Some(Self::FindSubTree),
            _ => None,
        }
    }
}

/// Nested-set tree support for any entity type that opts in
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeExtension;

impl TreeExtension {
    fn bound(&self, entity: &Entity, column: &str) -> OrmResult<Value> {
        match entity.get(column) {
            Some(Value::Null) | None => Err(OrmError::Configuration(format!(
                "tree column '{}' is not set on this instance of '{}'",
                column,
                entity.entity_type()
            ))),
            Some(value) => Ok(value.clone()),
        }
    }
}

#[async_trait]
impl Extension for TreeExtension {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn prepare_columns(&self, entity: &str, mut columns: Vec<ColumnDef>) -> OrmResult<Vec<ColumnDef>> {
        let additions = [
            (LEFT_COLUMN, ColumnType::Int),
            (RIGHT_COLUMN, ColumnType::Int),
            (LEVEL_COLUMN, ColumnType::Int),
            (PARENT_COLUMN, ColumnType::Link),
        ];
        for (name, column_type) in additions {
            if columns.iter().any(|c| c.name == name) {
                return Err(OrmError::Configuration(format!(
                    "column '{}' in entity type '{}' collides with the tree extension",
                    name, entity
                )));
            }
            columns.push(ColumnDef::new(name, column_type));
        }
        Ok(columns)
    }

    fn prepare_indexes(&self, entity: &str, mut indexes: Vec<IndexDef>) -> OrmResult<Vec<IndexDef>> {
        let additions = [
            IndexDef::new(LEFT_COLUMN, &[LEFT_COLUMN]),
            IndexDef::new(RIGHT_COLUMN, &[RIGHT_COLUMN]),
            IndexDef::new(LEVEL_COLUMN, &[LEVEL_COLUMN]),
            IndexDef::new(KEY_INDEX, &[LEFT_COLUMN, RIGHT_COLUMN, LEVEL_COLUMN]),
            IndexDef::new(PARENT_COLUMN, &[PARENT_COLUMN]),
        ];
        for index in additions {
            if indexes.iter().any(|x| x.name == index.name) {
                return Err(OrmError::Configuration(format!(
                    "index '{}' in entity type '{}' collides with the tree extension",
                    index.name, entity
                )));
            }
            indexes.push(index);
        }
        Ok(indexes)
    }

    async fn call_static(
        &self,
        finder: &Finder,
        schema: &EntitySchema,
        method: &str,
    ) -> OrmResult<Collection> {
        let method = StaticMethod::parse(method).ok_or_else(|| {
            OrmError::UnsupportedExtensionMethod {
                extension: self.name().to_string(),
                method: method.to_string(),
            }
        })?;

        match method {
            // Ascending __lft is the one ordering that yields a valid
            // pre-order traversal: left values are assigned in pre-order
            // by construction.
            StaticMethod::FindAllTree => {
                debug!(entity = %schema.name(), "tree: findAllTree");
                finder
                    .find_all(schema.name(), FindOptions::new().order_by(LEFT_COLUMN))
                    .await
            }
        }
    }

    async fn call(&self, finder: &Finder, entity: &Entity, method: &str) -> OrmResult<Collection> {
        let method = InstanceMethod::parse(method).ok_or_else(|| {
            OrmError::UnsupportedExtensionMethod {
                extension: self.name().to_string(),
                method: method.to_string(),
            }
        })?;

        let left = self.bound(entity, LEFT_COLUMN)?;
        let right = self.bound(entity, RIGHT_COLUMN)?;
        debug!(entity = %entity.entity_type(), ?method, "tree: instance query");

        let options = match method {
            // Strict descendants: the node's own row sits exactly at
            // __lft = left, so the open lower bound excludes it.
            InstanceMethod::FindAllChildren => FindOptions::new()
                .filter(LEFT_COLUMN, QueryOperator::GreaterThan, left)
                .filter(RIGHT_COLUMN, QueryOperator::LessThanOrEqual, right)
                .order_by(LEFT_COLUMN),
            // Inclusive subtree: closed bounds keep the node itself.
            InstanceMethod::FindSubTree => FindOptions::new()
                .filter(LEFT_COLUMN, QueryOperator::GreaterThanOrEqual, left)
                .filter(RIGHT_COLUMN, QueryOperator::LessThanOrEqual, right)
                .order_by(LEFT_COLUMN),
        };

        finder.find_all(entity.entity_type(), options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntitySchemaBuilder;

    #[test]
    fn test_prepare_columns_adds_four_tree_columns() {
        let existing = vec![ColumnDef::new("title", ColumnType::String)];
        let columns = TreeExtension.prepare_columns("Category", existing).unwrap();

        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0].name, "title");
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names[1..], ["__lft", "__rgt", "__lvl", "__prt"]);
        assert_eq!(columns[4].column_type, ColumnType::Link);
    }

    #[test]
    fn test_column_collision_is_configuration_error() {
        let existing = vec![ColumnDef::new("__lft", ColumnType::Int)];
        let result = TreeExtension.prepare_columns("Category", existing);
        assert!(matches!(result, Err(OrmError::Configuration(_))));
    }

    #[test]
    fn test_prepare_indexes_adds_five_indexes() {
        let indexes = TreeExtension.prepare_indexes("Category", Vec::new()).unwrap();
        assert_eq!(indexes.len(), 5);

        let composite = indexes.iter().find(|i| i.name == "__key").unwrap();
        assert_eq!(composite.columns, vec!["__lft", "__rgt", "__lvl"]);
        assert!(indexes.iter().any(|i| i.name == "__prt"));
    }

    #[test]
    fn test_schema_assembly_with_tree_extension() {
        let schema = EntitySchemaBuilder::new("Category", "categories")
            .column("title", ColumnType::String)
            .extension(TreeExtension)
            .build()
            .unwrap();

        assert!(schema.column("__lft").is_some());
        assert!(schema.column("__prt").is_some());
        assert_eq!(schema.indexes().len(), 5);
        assert_eq!(schema.extensions().len(), 1);
    }

    #[test]
    fn test_method_name_parsing_is_closed() {
        assert_eq!(StaticMethod::parse("findAllTree"), Some(StaticMethod::FindAllTree));
        assert_eq!(StaticMethod::parse("findAllChildren"), None);
        assert_eq!(
            InstanceMethod::parse("findAllChildren"),
            Some(InstanceMethod::FindAllChildren)
        );
        assert_eq!(InstanceMethod::parse("findSubTree"), Some(InstanceMethod::FindSubTree));
        assert_eq!(InstanceMethod::parse("findAllLeaves"), None);
    }
}
