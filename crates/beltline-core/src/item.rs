use crate::id::ProductId;
use serde::{Deserialize, Serialize};

/// The content of one belt slot, and of one results-log entry.
///
/// Items carry no identity beyond their value: two `Raw(p)` are
/// indistinguishable and are only ever tracked by count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    /// Nothing in the slot.
    #[default]
    Empty,
    /// An unclaimed product waiting for a worker.
    Raw(ProductId),
    /// A finished product returned to the belt by a worker.
    Completed(ProductId),
}

impl Item {
    pub fn is_empty(&self) -> bool {
        matches!(self, Item::Empty)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Item::Raw(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Item::Completed(_))
    }

    /// The product carried by this item, if any.
    pub fn product(&self) -> Option<ProductId> {
        match *self {
            Item::Empty => None,
            Item::Raw(p) | Item::Completed(p) => Some(p),
        }
    }
}
