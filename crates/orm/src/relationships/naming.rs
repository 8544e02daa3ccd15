//! Naming conventions - pure, deterministic derivation of link column
//! and junction table names
//!
//! The patterns must be reproduced exactly for schema compatibility:
//! link columns are `__<lowercased short name>_id`, junction tables are
//! the two table names joined by `_to_` in ascending lexicographic
//! order. The ordering is load-bearing: both sides of a many-to-many
//! relation must derive the identical junction table name.

use crate::relationships::metadata::{RelationDef, RelationKind};
use crate::schema::EntitySchema;

/// Convention-derived link column for an entity short name
pub fn derived_link_column(short_name: &str) -> String {
    format!("__{}_id", short_name.to_lowercase())
}

/// The link name for a relation: the explicit override verbatim when
/// configured, otherwise derived by kind.
///
/// For `HasOne`/`BelongsTo` the name comes from the target type (the
/// foreign key sits on the owner's table); for `HasMany` from the owning
/// type (the foreign key sits on the target's table, pointing back);
/// for `ManyToMany` the "link" is the junction table name itself.
pub fn link_column(owner: &EntitySchema, relation: &RelationDef, target: &EntitySchema) -> String {
    if let Some(ref column) = relation.link_column {
        return column.clone();
    }
    match relation.kind {
        RelationKind::HasOne | RelationKind::BelongsTo => derived_link_column(target.name()),
        RelationKind::HasMany => derived_link_column(owner.name()),
        RelationKind::ManyToMany => junction_table(owner, target),
    }
}

/// Junction table name for a many-to-many pair: table names joined by
/// `_to_`, lexicographically ascending so both directions agree
pub fn junction_table(a: &EntitySchema, b: &EntitySchema) -> String {
    if a.table() < b.table() {
        format!("{}_to_{}", a.table(), b.table())
    } else {
        format!("{}_to_{}", b.table(), a.table())
    }
}

/// Column in the junction table referencing the given side's primary key
pub fn junction_link_column(side: &EntitySchema) -> String {
    derived_link_column(side.name())
}
