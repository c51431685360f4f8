use juiceville_core::identity::Customer;
use juiceville_core::payment::PaymentAuthorization;
use juiceville_order::customer_reports::display_name;
use juiceville_order::hours::{self, GateDecision};
use juiceville_order::{ChangeHandler, DeliveryZone, FinalizeReport, LineTarget, Order, OrderStatus, Quote};
use juiceville_shared::events::OrderFinalizedEvent;
use juiceville_shared::Kobo;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub line_id: Uuid,
    pub target: LineTarget,
    pub label: String,
    pub quantity: u32,
    pub price_kobo: Kobo,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order: Order,
    pub lines: Vec<SummaryLine>,
    pub quote: Quote,
}

async fn owned_order(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<Order> {
    let order = state.order(order_id).await?;
    ChangeHandler::ensure_owner(&order, customer_id)?;
    Ok(order)
}

async fn customer_zone(state: &AppState, customer: &Customer) -> AppResult<DeliveryZone> {
    let zone_id = customer.delivery_zone_id.ok_or_else(|| {
        AppError::Validation("Select a delivery zone in your profile before ordering".to_string())
    })?;
    let zone = state
        .zones
        .get_zone(zone_id)
        .await?
        .ok_or_else(|| AppError::not_found("Delivery zone", zone_id))?;
    if !zone.is_active {
        return Err(AppError::Validation(format!(
            "Delivery to {} is currently unavailable",
            zone.name
        )));
    }
    Ok(zone)
}

/// Reject orders outside opening hours.
pub async fn ensure_ordering_open(state: &AppState) -> AppResult<()> {
    let schedule = state.hours.list_hours().await?;
    if let GateDecision::Open { closes_at } = hours::evaluate(&schedule, state.clock.local_now())? {
        tracing::debug!(%closes_at, "Ordering open");
    }
    Ok(())
}

/// Open a new empty order for the customer, priced with their zone's fee.
pub async fn create_order(state: &AppState, customer_id: Uuid) -> AppResult<Order> {
    ensure_ordering_open(state).await?;

    let customer = state.customer(customer_id).await?;
    let missing = customer.missing_profile_fields();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Complete your profile before ordering, missing: {}",
            missing.join(", ")
        )));
    }
    let zone = customer_zone(state, &customer).await?;

    let order = Order::new(customer.id, zone.fee_kobo, state.clock.now());
    state.orders.save_order(&order).await?;

    info!(order_id = %order.id, customer_id = %customer.id, zone = %zone.name, "Order created");
    Ok(order)
}

pub async fn add_items(
    state: &AppState,
    customer_id: Uuid,
    order_id: Uuid,
    additions: &[(LineTarget, u32)],
) -> AppResult<Order> {
    let mut order = owned_order(state, customer_id, order_id).await?;
    let snapshot = state.catalog_snapshot().await?;

    ChangeHandler::add_lines(&mut order, additions, &snapshot, state.clock.now())?;
    state.reconciler().recompute_totals(&mut order, &snapshot);
    state.orders.save_order(&order).await?;

    info!(order_id = %order.id, lines = order.lines.len(), subtotal = order.subtotal_kobo, "Items added");
    Ok(order)
}

pub async fn apply_loyalty_points(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<Order> {
    let customer = state.customer(customer_id).await?;
    let mut order = owned_order(state, customer_id, order_id).await?;
    let rules = state.business_rules.loyalty();

    ChangeHandler::request_loyalty_discount(&mut order, customer.loyalty_points, &rules, state.clock.now())?;
    let snapshot = state.catalog_snapshot().await?;
    state.reconciler().recompute_totals(&mut order, &snapshot);
    state.orders.save_order(&order).await?;

    info!(order_id = %order.id, "Loyalty discount requested");
    Ok(order)
}

/// Re-price the cart against the customer's current zone.
pub async fn checkout(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<OrderSummary> {
    let customer = state.customer(customer_id).await?;
    let zone = customer_zone(state, &customer).await?;
    let mut order = owned_order(state, customer_id, order_id).await?;

    ChangeHandler::set_delivery_fee(&mut order, zone.fee_kobo, state.clock.now())?;
    summarize(state, &customer, order, true).await
}

pub async fn initiate_payment(
    state: &AppState,
    customer_id: Uuid,
    order_id: Uuid,
) -> AppResult<PaymentAuthorization> {
    let customer = state.customer(customer_id).await?;
    let mut order = owned_order(state, customer_id, order_id).await?;
    if order.is_empty() {
        return Err(AppError::Validation("Your order is empty".to_string()));
    }

    let snapshot = state.catalog_snapshot().await?;
    let reconciler = state.reconciler();
    reconciler.recompute_totals(&mut order, &snapshot);
    let quote = reconciler.quote(&order, customer.loyalty_points);

    let authorization = state
        .payments
        .initiate(&mut order, customer.email.expose(), quote.grand_total_kobo, state.clock.now())
        .await?;
    state.orders.save_order(&order).await?;
    Ok(authorization)
}

/// Payment callback: verify with the gateway, then commit the order.
///
/// An unverified payment leaves the order open so the customer can retry
/// from their cart.
pub async fn finalize_order(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<FinalizeReport> {
    let mut customer = state.customer(customer_id).await?;
    let mut order = owned_order(state, customer_id, order_id).await?;
    if order.status != OrderStatus::Open {
        return Err(AppError::Conflict(format!("Order {} has already been paid", order.id)));
    }

    state.payments.confirm(&order).await?;
    if order.is_empty() {
        return Err(AppError::Validation("Your order is empty".to_string()));
    }

    let report = state
        .reconciler()
        .finalize(
            &mut order,
            &mut customer,
            state.catalog.as_ref(),
            state.clock.now(),
            state.clock.local_now(),
        )
        .await?;

    state.orders.save_order(&order).await?;
    state.customers.save_customer(&customer).await?;

    let event = OrderFinalizedEvent {
        order_id: order.id,
        customer_id: customer.id,
        customer_name: display_name(&customer),
        grand_total_kobo: order.grand_total_kobo,
        line_count: order.lines.len(),
        stock_shortfalls: report.shortfalls.len(),
        timestamp: state.clock.now().timestamp(),
    };
    if let Err(e) = state.notifier.order_finalized(&event).await {
        error!(order_id = %order.id, error = %e, "Failed to send order notification");
    }

    Ok(report)
}

/// The order with labelled lines; open orders are re-priced first.
pub async fn order_summary(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<OrderSummary> {
    let customer = state.customer(customer_id).await?;
    let order = owned_order(state, customer_id, order_id).await?;
    let refresh = order.is_open();
    summarize(state, &customer, order, refresh).await
}

/// Cancel an unpaid order.
pub async fn delete_order(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<()> {
    let order = owned_order(state, customer_id, order_id).await?;
    if !order.is_open() {
        return Err(AppError::Conflict(format!("Order {} has been paid and cannot be cancelled", order.id)));
    }
    state.orders.delete_order(order.id).await?;
    info!(order_id = %order.id, "Order cancelled");
    Ok(())
}

async fn summarize(state: &AppState, customer: &Customer, mut order: Order, refresh: bool) -> AppResult<OrderSummary> {
    let snapshot = state.catalog_snapshot().await?;
    let reconciler = state.reconciler();
    if refresh {
        reconciler.recompute_totals(&mut order, &snapshot);
        state.orders.save_order(&order).await?;
    }

    let quote = if order.is_open() {
        reconciler.quote(&order, customer.loyalty_points)
    } else {
        Quote {
            subtotal_kobo: order.subtotal_kobo,
            delivery_fee_kobo: order.delivery_fee_kobo,
            discount_kobo: order
                .subtotal_kobo
                .saturating_add(order.delivery_fee_kobo)
                .saturating_sub(order.grand_total_kobo),
            grand_total_kobo: order.grand_total_kobo,
        }
    };

    let lines = order
        .lines
        .iter()
        .map(|line| SummaryLine {
            line_id: line.id,
            target: line.target,
            label: snapshot
                .label(line.target)
                .unwrap_or_else(|| "No longer on the menu".to_string()),
            quantity: line.quantity,
            price_kobo: line.price(),
        })
        .collect();

    Ok(OrderSummary { order, lines, quote })
}
