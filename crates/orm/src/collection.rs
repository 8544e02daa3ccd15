//! Entity collections
//!
//! Insertion-ordered, with a flag distinguishing freshly constructed
//! collections from ones loaded out of storage. The flag feeds later
//! persistence decisions; nothing in this crate inspects it beyond
//! carrying it faithfully.

use crate::entity::Entity;

/// An ordered sequence of entity instances
#[derive(Debug, Clone)]
pub struct Collection {
    items: Vec<Entity>,
    new: bool,
}

impl Collection {
    /// A fresh, empty collection (marked new)
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            new: true,
        }
    }

    /// A collection hydrated from storage (marked not new)
    pub fn from_stored(items: Vec<Entity>) -> Self {
        Self { items, new: false }
    }

    pub fn is_new(&self) -> bool {
        self.new
    }

    pub fn set_new(&mut self, new: bool) {
        self.new = new;
    }

    pub fn push(&mut self, entity: Entity) {
        self.items.push(entity);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Entity>> for Collection {
    fn from(items: Vec<Entity>) -> Self {
        Self { items, new: true }
    }
}

impl IntoIterator for Collection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, EntitySchemaBuilder};
    use std::sync::Arc;

    fn sample_entity() -> Entity {
        let schema = EntitySchemaBuilder::new("User", "users")
            .column("name", ColumnType::String)
            .build()
            .unwrap();
        Entity::new(Arc::new(schema))
    }

    #[test]
    fn test_fresh_collection_is_new() {
        let mut collection = Collection::new();
        assert!(collection.is_new());
        assert!(collection.is_empty());

        collection.push(sample_entity());
        assert_eq!(collection.len(), 1);
        assert!(collection.is_new());
    }

    #[test]
    fn test_stored_collection_is_not_new() {
        let collection = Collection::from_stored(vec![sample_entity()]);
        assert!(!collection.is_new());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut collection = Collection::new();
        for i in 0..3 {
            let mut entity = sample_entity();
            entity.set("name", serde_json::json!(format!("user-{}", i)));
            collection.push(entity);
        }
        let names: Vec<_> = collection
            .iter()
            .map(|e| e.get("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["user-0", "user-1", "user-2"]);
    }
}
