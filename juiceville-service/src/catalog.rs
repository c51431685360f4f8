use juiceville_catalog::{CatalogError, Combo, ComboDraft, InventoryManager, Item, ItemDraft, Menu};
use juiceville_core::identity::Permission;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

async fn require_catalog_manager(state: &AppState, staff_id: Uuid) -> AppResult<()> {
    let staff = state.staff_member(staff_id).await?;
    staff.require(Permission::ManageCatalog)?;
    Ok(())
}

/// What customers can order right now.
pub async fn menu(state: &AppState) -> AppResult<Menu> {
    Ok(Menu::build(
        state.catalog.list_items().await?,
        state.catalog.list_combos().await?,
    ))
}

/// Items below the configured low-stock threshold.
pub async fn low_stock_count(state: &AppState) -> AppResult<usize> {
    let items = state.catalog.list_items().await?;
    Ok(InventoryManager::from_items(&items).low_stock_count(state.business_rules.low_stock_threshold))
}

pub async fn create_item(state: &AppState, staff_id: Uuid, draft: ItemDraft) -> AppResult<Item> {
    require_catalog_manager(state, staff_id).await?;
    let item = Item::from_draft(draft)?;
    state.catalog.save_item(&item).await?;
    info!(item_id = %item.id, name = %item.name, "Item created");
    Ok(item)
}

/// Update an item; combos containing it are re-priced.
pub async fn update_item(state: &AppState, staff_id: Uuid, item_id: Uuid, draft: ItemDraft) -> AppResult<Item> {
    require_catalog_manager(state, staff_id).await?;
    let mut item = state
        .catalog
        .get_item(item_id)
        .await?
        .ok_or_else(|| AppError::not_found("Item", item_id))?;
    item.apply(draft)?;
    state.catalog.save_item(&item).await?;

    let items = state.catalog.list_items().await?;
    let pricing = state.business_rules.combo_pricing();
    for mut combo in state.catalog.list_combos().await?.into_iter().filter(|c| c.contains(item_id)) {
        let before = combo.rate_kobo;
        combo.refresh_rate(&pricing, |id| items.iter().find(|i| i.id == id).map(|i| i.rate_kobo));
        if combo.rate_kobo != before {
            state.catalog.save_combo(&combo).await?;
            info!(combo_id = %combo.id, rate = combo.rate_kobo, "Combo re-priced");
        }
    }
    Ok(item)
}

/// Remove an item from the menu. Its combo slots are emptied and those
/// combos re-priced. Cart lines already priced keep their price.
pub async fn delete_item(state: &AppState, staff_id: Uuid, item_id: Uuid) -> AppResult<()> {
    require_catalog_manager(state, staff_id).await?;
    if !state.catalog.delete_item(item_id).await? {
        return Err(AppError::not_found("Item", item_id));
    }

    let items = state.catalog.list_items().await?;
    let pricing = state.business_rules.combo_pricing();
    for mut combo in state.catalog.list_combos().await?.into_iter().filter(|c| c.contains(item_id)) {
        combo.detach_item(item_id);
        combo.refresh_rate(&pricing, |id| items.iter().find(|i| i.id == id).map(|i| i.rate_kobo));
        state.catalog.save_combo(&combo).await?;
        info!(combo_id = %combo.id, rate = combo.rate_kobo, "Combo slot emptied");
    }

    info!(%item_id, "Item deleted");
    Ok(())
}

pub async fn create_combo(state: &AppState, staff_id: Uuid, draft: ComboDraft) -> AppResult<Combo> {
    require_catalog_manager(state, staff_id).await?;
    let mut combo = Combo::from_draft(draft)?;
    price_combo(state, &mut combo).await?;
    state.catalog.save_combo(&combo).await?;
    info!(combo_id = %combo.id, rate = combo.rate_kobo, "Combo created");
    Ok(combo)
}

pub async fn update_combo(state: &AppState, staff_id: Uuid, combo_id: Uuid, draft: ComboDraft) -> AppResult<Combo> {
    require_catalog_manager(state, staff_id).await?;
    let mut combo = state
        .catalog
        .get_combo(combo_id)
        .await?
        .ok_or_else(|| AppError::not_found("Combo", combo_id))?;
    combo.apply(draft)?;
    price_combo(state, &mut combo).await?;
    state.catalog.save_combo(&combo).await?;
    Ok(combo)
}

/// Check every component exists, then derive the rate.
async fn price_combo(state: &AppState, combo: &mut Combo) -> AppResult<()> {
    let items = state.catalog.list_items().await?;
    if let Some(missing) = combo.components().find(|id| !items.iter().any(|i| i.id == *id)) {
        return Err(CatalogError::UnknownComponent(missing).into());
    }
    combo.refresh_rate(&state.business_rules.combo_pricing(), |id| {
        items.iter().find(|i| i.id == id).map(|i| i.rate_kobo)
    });
    Ok(())
}
