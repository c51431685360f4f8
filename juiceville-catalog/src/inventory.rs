use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::combo::Combo;
use crate::item::Item;

/// Result of trying to take units out of an item's stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockOutcome {
    Deducted { remaining: i32 },
    Insufficient { requested: u32, available: i32 },
}

/// Point-in-time stock levels, keyed by item.
///
/// Used to answer availability questions (menu filtering, combo stock,
/// bulk stock edits) without touching the catalog store.
#[derive(Debug, Clone, Default)]
pub struct InventoryManager {
    stock: HashMap<Uuid, i32>,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        Self {
            stock: items.into_iter().map(|item| (item.id, item.stock)).collect(),
        }
    }

    /// Set the level for an item; negative levels are refused.
    pub fn set(&mut self, item_id: Uuid, level: i32) -> Result<(), InventoryError> {
        if level < 0 {
            return Err(InventoryError::NegativeStock { item_id, level });
        }
        self.stock.insert(item_id, level);
        Ok(())
    }

    pub fn get(&self, item_id: &Uuid) -> Option<i32> {
        self.stock.get(item_id).copied()
    }

    pub fn effective_stock(&self, combo: &Combo) -> i32 {
        combo.effective_stock(|id| self.get(&id))
    }

    /// Number of tracked items below `threshold`.
    pub fn low_stock_count(&self, threshold: i32) -> usize {
        self.stock.values().filter(|level| **level < threshold).count()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Stock for {item_id} cannot be set to {level}")]
    NegativeStock { item_id: Uuid, level: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::ComboDraft;

    #[test]
    fn test_set_rejects_negative_levels() {
        let mut manager = InventoryManager::new();
        let item_id = Uuid::new_v4();

        manager.set(item_id, 5).unwrap();
        assert!(manager.set(item_id, -1).is_err());
        assert_eq!(manager.get(&item_id), Some(5));
        assert_eq!(manager.get(&Uuid::new_v4()), None);
    }

    #[test]
    fn test_combo_and_low_stock() {
        let mut manager = InventoryManager::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        manager.set(a, 4).unwrap();
        manager.set(b, 15).unwrap();

        let combo = Combo::from_draft(ComboDraft {
            name: "Duo".to_string(),
            description: String::new(),
            components: vec![a, b],
        })
        .unwrap();

        assert_eq!(manager.effective_stock(&combo), 4);
        assert_eq!(manager.low_stock_count(10), 1);
    }
}
