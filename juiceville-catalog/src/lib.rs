pub mod combo;
pub mod inventory;
pub mod item;
pub mod menu;
pub mod pricing;
pub mod repository;

pub use combo::{Combo, ComboDraft, COMBO_SLOTS};
pub use inventory::{InventoryError, InventoryManager, StockOutcome};
pub use item::{Category, Item, ItemDraft};
pub use menu::Menu;
pub use pricing::ComboPricing;
pub use repository::CatalogRepository;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Unknown component item: {0}")]
    UnknownComponent(uuid::Uuid),
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
