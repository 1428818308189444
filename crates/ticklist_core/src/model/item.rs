//! Todo item model.
//!
//! # Responsibility
//! - Define the record persisted inside the durable snapshot.
//! - Provide list-level helpers shared by both synchronizers.
//!
//! # Invariants
//! - `id` is unique among items resident in the same list.
//! - `title` is free text; empty titles are allowed.
//! - Field names match the persisted JSON shape (`id`, `title`, `completed`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Integer identifier for one todo item.
///
/// Serialized transparently as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One todo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Absent in older snapshots; treated as not completed.
    #[serde(default)]
    pub completed: bool,
}

impl Item {
    /// Creates an open (not completed) item.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// Returns the built-in list used when nothing has been persisted yet.
pub fn seed_items() -> Vec<Item> {
    vec![
        Item {
            id: ItemId(1),
            title: "Read the getting started notes".to_string(),
            completed: false,
        },
        Item {
            id: ItemId(2),
            title: "Add your first todo".to_string(),
            completed: false,
        },
        Item {
            id: ItemId(3),
            title: "Tap an item to mark it done".to_string(),
            completed: true,
        },
    ]
}

/// Returns the largest id in `items`, if any.
pub fn max_id(items: &[Item]) -> Option<ItemId> {
    items.iter().map(|item| item.id).max()
}

/// Finds the first id that appears more than once.
pub(crate) fn first_duplicate_id(items: &[Item]) -> Option<ItemId> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| item.id)
        .find(|id| !seen.insert(*id))
}
