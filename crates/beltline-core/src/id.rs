use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a product in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub u32);

/// Identifies a worker by its belt position and its index within that
/// position's station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    pub position: usize,
    pub index: usize,
}

impl WorkerId {
    pub fn new(position: usize, index: usize) -> Self {
        Self { position, index }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.position, self.index)
    }
}
