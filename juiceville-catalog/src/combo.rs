use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pricing::ComboPricing;
use crate::CatalogError;

/// A combo bundles at most this many items.
pub const COMBO_SLOTS: usize = 5;

/// A bundle of up to five menu items sold at a derived rate.
///
/// Slots are nullable: removing an item from the catalog leaves an empty
/// slot behind rather than invalidating the combo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub slots: [Option<Uuid>; COMBO_SLOTS],
    pub rate_kobo: Kobo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub components: Vec<Uuid>,
}

impl ComboDraft {
    fn into_slots(self) -> Result<(String, String, [Option<Uuid>; COMBO_SLOTS]), CatalogError> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > 100 {
            return Err(CatalogError::invalid("name", "must be 1 to 100 characters"));
        }
        if self.components.len() > COMBO_SLOTS {
            return Err(CatalogError::invalid(
                "components",
                format!("a combo holds at most {} items", COMBO_SLOTS),
            ));
        }

        let mut slots = [None; COMBO_SLOTS];
        for (slot, id) in slots.iter_mut().zip(self.components) {
            *slot = Some(id);
        }
        Ok((self.name.trim().to_string(), self.description, slots))
    }
}

impl Combo {
    /// Build a combo; its rate starts at zero until [`Combo::refresh_rate`]
    /// runs against the current item rates.
    pub fn from_draft(draft: ComboDraft) -> Result<Self, CatalogError> {
        let (name, description, slots) = draft.into_slots()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            slots,
            rate_kobo: 0,
        })
    }

    pub fn apply(&mut self, draft: ComboDraft) -> Result<(), CatalogError> {
        let (name, description, slots) = draft.into_slots()?;
        self.name = name;
        self.description = description;
        self.slots = slots;
        Ok(())
    }

    /// Item ids in non-empty slots, in slot order. Repeats are kept.
    pub fn components(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn contains(&self, item_id: Uuid) -> bool {
        self.components().any(|id| id == item_id)
    }

    /// How many of this combo can be sold: the lowest stock among the
    /// components, or zero for a combo with no components. Components the
    /// lookup does not know are treated as empty slots.
    pub fn effective_stock<F>(&self, stock_of: F) -> i32
    where
        F: Fn(Uuid) -> Option<i32>,
    {
        self.components()
            .filter_map(stock_of)
            .min()
            .unwrap_or(0)
    }

    /// Recompute the rate from the current component rates.
    pub fn refresh_rate<F>(&mut self, pricing: &ComboPricing, rate_of: F) -> Kobo
    where
        F: Fn(Uuid) -> Option<Kobo>,
    {
        self.rate_kobo = pricing.combo_rate(self.components().filter_map(rate_of));
        self.rate_kobo
    }

    /// Empty every slot holding `item_id`.
    pub fn detach_item(&mut self, item_id: Uuid) {
        for slot in self.slots.iter_mut() {
            if *slot == Some(item_id) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn combo_of(components: Vec<Uuid>) -> Combo {
        Combo::from_draft(ComboDraft {
            name: "Lunch Box".to_string(),
            description: String::new(),
            components,
        })
        .unwrap()
    }

    #[test]
    fn test_effective_stock_is_min_of_components() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let stock: HashMap<Uuid, i32> = [(a, 7), (b, 2), (c, 12)].into_iter().collect();

        let combo = combo_of(vec![a, b, c]);
        assert_eq!(combo.effective_stock(|id| stock.get(&id).copied()), 2);
    }

    #[test]
    fn test_effective_stock_without_components_is_zero() {
        let combo = combo_of(vec![]);
        assert_eq!(combo.effective_stock(|_| Some(100)), 0);
    }

    #[test]
    fn test_detached_slot_is_ignored() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let stock: HashMap<Uuid, i32> = [(a, 1), (b, 9)].into_iter().collect();

        let mut combo = combo_of(vec![a, b]);
        combo.detach_item(a);
        assert!(!combo.contains(a));
        assert_eq!(combo.effective_stock(|id| stock.get(&id).copied()), 9);
    }

    #[test]
    fn test_rate_refresh() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let rates: HashMap<Uuid, Kobo> = [(a, 100_000), (b, 200_000)].into_iter().collect();

        let mut combo = combo_of(vec![a, b]);
        assert_eq!(combo.rate_kobo, 0);
        combo.refresh_rate(&ComboPricing::default(), |id| rates.get(&id).copied());
        assert_eq!(combo.rate_kobo, 285_000);
    }

    #[test]
    fn test_too_many_components_rejected() {
        let draft = ComboDraft {
            name: "Party Pack".to_string(),
            description: String::new(),
            components: (0..6).map(|_| Uuid::new_v4()).collect(),
        };
        assert!(Combo::from_draft(draft).is_err());
    }
}
