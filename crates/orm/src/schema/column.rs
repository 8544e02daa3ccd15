//! Column definitions

use serde::{Deserialize, Serialize};

/// Column type descriptor: primitive types plus `Link`, a foreign-key
/// reference to another entity's primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    BigInt,
    Float,
    Boolean,
    String,
    Text,
    DateTime,
    Link,
}

impl ColumnType {
    /// Returns true if this column references another entity
    pub fn is_link(self) -> bool {
        matches!(self, Self::Link)
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_detection() {
        assert!(ColumnType::Link.is_link());
        assert!(!ColumnType::Int.is_link());
        assert!(!ColumnType::Text.is_link());
    }
}
