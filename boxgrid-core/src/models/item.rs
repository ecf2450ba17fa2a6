//! Inventory items held by item-leaf containers

use serde::{Deserialize, Serialize};

/// One line of an item-leaf container's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog identifier
    pub id: String,
    /// Count on hand
    #[serde(rename = "qty")]
    pub quantity: u32,
    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    /// Creates an item without a description.
    #[must_use]
    pub fn new(id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
            description: None,
        }
    }
}

/// Folds `source` into `target` by identifier.
///
/// Quantities of identifiers present in both lists are summed (saturating).
/// The result keeps the target's order, followed by identifiers that only the
/// source had, in source order. Descriptions from the target win.
#[must_use]
pub fn merge_items(target: &[Item], source: &[Item]) -> Vec<Item> {
    let mut merged = target.to_vec();
    for item in source {
        if let Some(existing) = merged.iter_mut().find(|m| m.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            if existing.description.is_none() {
                existing.description.clone_from(&item.description);
            }
        } else {
            merged.push(item.clone());
        }
    }
    merged
}
