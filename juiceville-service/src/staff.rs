use juiceville_catalog::InventoryManager;
use juiceville_core::identity::{Permission, Staff};
use juiceville_order::reports::{self, PendingDashboard};
use juiceville_order::{ChangeHandler, Order};
use juiceville_shared::events::OrderDeliveredEvent;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SkippedStock {
    pub item_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StockUpdateReport {
    pub updated: usize,
    pub skipped: Vec<SkippedStock>,
}

async fn authorized(state: &AppState, staff_id: Uuid, permission: Permission) -> AppResult<Staff> {
    let staff = state.staff_member(staff_id).await?;
    staff.require(permission)?;
    Ok(staff)
}

/// Paid orders awaiting delivery. Designations outside the dashboard rota
/// get an empty view rather than an error.
pub async fn dashboard(state: &AppState, staff_id: Uuid) -> AppResult<PendingDashboard> {
    let staff = state.staff_member(staff_id).await?;
    if !staff.can(Permission::PendingDashboard) {
        return Ok(PendingDashboard::default());
    }
    let orders = state.orders.list_orders().await?;
    Ok(reports::pending_dashboard(&orders, &state.customer_names().await?))
}

/// Mark a paid order as delivered.
pub async fn close_order(state: &AppState, staff_id: Uuid, order_id: Uuid) -> AppResult<Order> {
    let staff = authorized(state, staff_id, Permission::CloseOrders).await?;
    let mut order = state.order(order_id).await?;

    ChangeHandler::mark_delivered(&mut order, state.clock.now())?;
    state.orders.save_order(&order).await?;
    info!(order_id = %order.id, staff = %staff.emp_id, "Order delivered and closed");

    let event = OrderDeliveredEvent {
        order_id: order.id,
        closed_by: staff.id,
        timestamp: state.clock.now().timestamp(),
    };
    if let Err(e) = state.notifier.order_delivered(&event).await {
        error!(order_id = %order.id, error = %e, "Failed to send delivery notification");
    }
    Ok(order)
}

pub async fn staff_order_detail(state: &AppState, staff_id: Uuid, order_id: Uuid) -> AppResult<Order> {
    authorized(state, staff_id, Permission::ViewOrderDetails).await?;
    state.order(order_id).await
}

/// Set stock levels in bulk. Entries that are negative, unchanged or for
/// unknown items are skipped; the rest are applied.
pub async fn update_stock(state: &AppState, staff_id: Uuid, levels: &[(Uuid, i32)]) -> AppResult<StockUpdateReport> {
    let staff = authorized(state, staff_id, Permission::UpdateStock).await?;
    let mut inventory = InventoryManager::from_items(&state.catalog.list_items().await?);
    let mut report = StockUpdateReport::default();

    for &(item_id, level) in levels {
        let Some(current) = inventory.get(&item_id) else {
            report.skipped.push(SkippedStock {
                item_id,
                reason: "unknown item".to_string(),
            });
            continue;
        };
        if level == current {
            continue;
        }
        if let Err(e) = inventory.set(item_id, level) {
            warn!(%item_id, level, "Rejected stock level");
            report.skipped.push(SkippedStock {
                item_id,
                reason: e.to_string(),
            });
            continue;
        }
        state.catalog.set_item_stock(item_id, level).await?;
        report.updated += 1;
    }

    info!(staff = %staff.emp_id, updated = report.updated, skipped = report.skipped.len(), "Stock levels updated");
    Ok(report)
}
