use juiceville_core::identity::Customer;
use juiceville_order::customer_reports::{self, CustomerHistory};
use juiceville_order::{zones, ChangeHandler, CleanupAction, DeliveryZone, Order};
use juiceville_shared::Masked;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Who is asking to see an order.
#[derive(Debug, Clone, Copy)]
pub enum Viewer {
    Customer(Uuid),
    Staff(Uuid),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub delivery_zone_id: Option<Uuid>,
    pub marketing_consent: Option<bool>,
}

pub async fn register_customer(state: &AppState, email: &str) -> AppResult<Customer> {
    let email = email.trim();
    if !email.contains('@') {
        return Err(AppError::Validation("A valid e-mail address is required".to_string()));
    }
    let mut customer = Customer::new(email);
    customer.joined_at = state.clock.now();
    customer.updated_at = customer.joined_at;
    state.customers.save_customer(&customer).await?;
    info!(customer_id = %customer.id, "Customer registered");
    Ok(customer)
}

pub async fn update_profile(state: &AppState, customer_id: Uuid, update: ProfileUpdate) -> AppResult<Customer> {
    let mut customer = state.customer(customer_id).await?;

    if let Some(zone_id) = update.delivery_zone_id {
        let zone = state
            .zones
            .get_zone(zone_id)
            .await?
            .ok_or_else(|| AppError::not_found("Delivery zone", zone_id))?;
        if !zone.is_active {
            return Err(AppError::Validation(format!("{} is not available for delivery", zone.name)));
        }
        customer.delivery_zone_id = Some(zone.id);
    }
    if let Some(name) = update.name {
        customer.name = name.trim().to_string();
    }
    if let Some(address) = update.address {
        customer.address = address.trim().to_string();
    }
    if let Some(phone) = update.phone {
        customer.phone = Masked(phone.trim().to_string());
    }
    if let Some(consent) = update.marketing_consent {
        customer.marketing_consent = consent;
    }
    customer.updated_at = state.clock.now();

    state.customers.save_customer(&customer).await?;
    Ok(customer)
}

/// Active zones a customer may choose from.
pub async fn selectable_zones(state: &AppState) -> AppResult<Vec<DeliveryZone>> {
    Ok(zones::selectable(state.zones.list_zones().await?))
}

pub async fn past_transactions(state: &AppState, customer_id: Uuid, page: Option<&str>) -> AppResult<CustomerHistory> {
    let customer = state.customer(customer_id).await?;
    let orders = state.orders.list_orders_for_customer(customer.id).await?;
    Ok(customer_reports::customer_history(
        &customer,
        orders,
        page,
        state.business_rules.loyalty_redeem_cost,
    ))
}

pub async fn hide_order(state: &AppState, customer_id: Uuid, order_id: Uuid) -> AppResult<()> {
    let mut order = state.order(order_id).await?;
    ChangeHandler::ensure_owner(&order, customer_id)?;
    ChangeHandler::hide(&mut order, state.clock.now());
    state.orders.save_order(&order).await?;
    Ok(())
}

/// Apply `hide_delivered`, `hide_old` or `show_all`; returns how many
/// orders changed visibility.
pub async fn cleanup_orders(state: &AppState, customer_id: Uuid, action: &str) -> AppResult<usize> {
    let action = CleanupAction::parse(action)
        .ok_or_else(|| AppError::Validation(format!("Invalid action: {}", action)))?;

    let mut orders = state.orders.list_orders_for_customer(customer_id).await?;
    let changed = ChangeHandler::cleanup(orders.iter_mut(), action, state.clock.now());
    for order in orders.iter().filter(|o| changed.contains(&o.id)) {
        state.orders.save_order(order).await?;
    }

    info!(%customer_id, ?action, changed = changed.len(), "Order history cleaned up");
    Ok(changed.len())
}

/// Staff may open any order; customers only their own.
pub async fn transaction_detail(state: &AppState, viewer: Viewer, order_id: Uuid) -> AppResult<Order> {
    let order = state.order(order_id).await?;
    match viewer {
        Viewer::Staff(staff_id) => {
            state.staff_member(staff_id).await?;
        }
        Viewer::Customer(customer_id) => {
            state.customer(customer_id).await?;
            ChangeHandler::ensure_owner(&order, customer_id)
                .map_err(|_| AppError::not_found("Order", order_id))?;
        }
    }
    Ok(order)
}
