use async_trait::async_trait;
use juiceville_core::CoreResult;
use uuid::Uuid;

use crate::combo::Combo;
use crate::inventory::StockOutcome;
use crate::item::Item;

/// Repository trait for the menu catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn get_item(&self, id: Uuid) -> CoreResult<Option<Item>>;

    async fn list_items(&self) -> CoreResult<Vec<Item>>;

    async fn save_item(&self, item: &Item) -> CoreResult<()>;

    /// Returns false when there was no such item.
    async fn delete_item(&self, id: Uuid) -> CoreResult<bool>;

    async fn get_combo(&self, id: Uuid) -> CoreResult<Option<Combo>>;

    async fn list_combos(&self) -> CoreResult<Vec<Combo>>;

    async fn save_combo(&self, combo: &Combo) -> CoreResult<()>;

    /// Decrement one item's stock if it has enough. Atomic for that row only.
    async fn deduct_item_stock(&self, id: Uuid, quantity: u32) -> CoreResult<StockOutcome>;

    async fn set_item_stock(&self, id: Uuid, stock: i32) -> CoreResult<()>;
}
