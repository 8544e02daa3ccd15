//! Index definitions

use serde::{Deserialize, Serialize};

/// A named index over one or more columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    pub columns: Vec<String>,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Returns true if the index covers more than one column
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }
}
