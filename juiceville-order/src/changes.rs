use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{LineItem, LineTarget, Order, OrderStatus};
use crate::reconciler::{CatalogSnapshot, LoyaltyRules};
use crate::OrderError;

/// Orders older than this are hidden by [`CleanupAction::HideOld`].
pub const HIDE_OLD_AFTER_DAYS: i64 = 30;

/// Bulk visibility changes a customer can make to their history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CleanupAction {
    HideDelivered,
    HideOld,
    ShowAll,
}

impl CleanupAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "hide_delivered" => Some(Self::HideDelivered),
            "hide_old" => Some(Self::HideOld),
            "show_all" => Some(Self::ShowAll),
            _ => None,
        }
    }
}

/// Handles order modifications and changes
pub struct ChangeHandler;

impl ChangeHandler {
    /// Add lines to an open order. A target already on the order has its
    /// quantity increased instead of getting a second line. The batch is
    /// validated up front so a bad entry changes nothing.
    pub fn add_lines(
        order: &mut Order,
        additions: &[(LineTarget, u32)],
        catalog: &CatalogSnapshot,
        now: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        Self::ensure_open(order)?;

        for (target, quantity) in additions {
            if *quantity == 0 {
                return Err(OrderError::InvalidQuantity);
            }
            if !catalog.contains(*target) {
                return Err(OrderError::UnknownEntry(*target));
            }
        }

        for (target, quantity) in additions {
            match order.lines.iter_mut().find(|line| line.target == *target) {
                Some(line) => line.add_quantity(*quantity),
                None => order.lines.push(LineItem::new(*target, *quantity)),
            }
        }
        order.updated_at = now;
        Ok(())
    }

    /// Ask for the loyalty discount on this order.
    pub fn request_loyalty_discount(
        order: &mut Order,
        points_available: u32,
        rules: &LoyaltyRules,
        now: DateTime<Utc>,
    ) -> Result<(), OrderError> {
        Self::ensure_open(order)?;
        if !rules.can_redeem(points_available) {
            return Err(OrderError::InsufficientPoints {
                have: points_available,
                need: rules.redeem_cost,
            });
        }
        order.used_loyalty_points = true;
        order.updated_at = now;
        Ok(())
    }

    /// Snapshot a (possibly new) delivery fee onto an open order.
    pub fn set_delivery_fee(order: &mut Order, fee_kobo: i64, now: DateTime<Utc>) -> Result<(), OrderError> {
        Self::ensure_open(order)?;
        order.delivery_fee_kobo = fee_kobo;
        order.updated_at = now;
        Ok(())
    }

    /// Transition: Finalized → Delivered
    pub fn mark_delivered(order: &mut Order, now: DateTime<Utc>) -> Result<(), OrderError> {
        if order.status != OrderStatus::Finalized {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Delivered,
            });
        }
        order.update_status(OrderStatus::Delivered, now);
        Ok(())
    }

    pub fn ensure_owner(order: &Order, customer_id: Uuid) -> Result<(), OrderError> {
        if order.customer_id != customer_id {
            return Err(OrderError::NotOwner(order.id));
        }
        Ok(())
    }

    pub fn hide(order: &mut Order, now: DateTime<Utc>) {
        order.hidden_from_customer = true;
        order.updated_at = now;
    }

    /// Apply a cleanup action to one customer's orders; returns the orders
    /// whose visibility changed.
    pub fn cleanup<'a>(
        orders: impl IntoIterator<Item = &'a mut Order>,
        action: CleanupAction,
        now: DateTime<Utc>,
    ) -> Vec<Uuid> {
        let cutoff = (now - Duration::days(HIDE_OLD_AFTER_DAYS)).date_naive();
        let mut changed = Vec::new();

        for order in orders {
            let hidden = match action {
                CleanupAction::HideDelivered if order.is_delivered() => true,
                CleanupAction::HideOld if order.date_placed.is_some_and(|d| d < cutoff) => true,
                CleanupAction::ShowAll => false,
                _ => continue,
            };
            if order.hidden_from_customer != hidden {
                order.hidden_from_customer = hidden;
                order.updated_at = now;
                changed.push(order.id);
            }
        }
        changed
    }

    fn ensure_open(order: &Order) -> Result<(), OrderError> {
        if !order.is_open() {
            return Err(OrderError::NotModifiable(order.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juiceville_catalog::{Category, Item, ItemDraft};

    fn snapshot_with(rate_kobo: i64) -> (CatalogSnapshot, Uuid) {
        let item = Item::from_draft(ItemDraft {
            name: "Zobo".to_string(),
            category: Category::Dr,
            description: String::new(),
            rate_kobo,
            is_non_veg: false,
            stock: None,
            rating: None,
        })
        .unwrap();
        let id = item.id;
        (CatalogSnapshot::from_parts(vec![item], vec![]), id)
    }

    #[test]
    fn test_repeated_target_merges() {
        let (catalog, id) = snapshot_with(50_000);
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());

        ChangeHandler::add_lines(&mut order, &[(LineTarget::Item(id), 2)], &catalog, Utc::now()).unwrap();
        order.lines[0].price_kobo = Some(100_000);
        ChangeHandler::add_lines(&mut order, &[(LineTarget::Item(id), 1)], &catalog, Utc::now()).unwrap();

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.lines[0].price_kobo, None);
    }

    #[test]
    fn test_bad_batch_changes_nothing() {
        let (catalog, id) = snapshot_with(50_000);
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());

        let result = ChangeHandler::add_lines(
            &mut order,
            &[(LineTarget::Item(id), 1), (LineTarget::Item(id), 0)],
            &catalog,
            Utc::now(),
        );
        assert!(matches!(result, Err(OrderError::InvalidQuantity)));
        assert!(order.is_empty());

        let unknown = LineTarget::Combo(Uuid::new_v4());
        let result = ChangeHandler::add_lines(&mut order, &[(unknown, 1)], &catalog, Utc::now());
        assert!(matches!(result, Err(OrderError::UnknownEntry(_))));
    }

    #[test]
    fn test_finalized_order_is_frozen() {
        let (catalog, id) = snapshot_with(50_000);
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());
        order.status = OrderStatus::Finalized;

        let result = ChangeHandler::add_lines(&mut order, &[(LineTarget::Item(id), 1)], &catalog, Utc::now());
        assert!(matches!(result, Err(OrderError::NotModifiable(_))));
    }

    #[test]
    fn test_loyalty_request_needs_points() {
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());
        let rules = LoyaltyRules::default();

        assert!(ChangeHandler::request_loyalty_discount(&mut order, 49, &rules, Utc::now()).is_err());
        assert!(!order.used_loyalty_points);
        ChangeHandler::request_loyalty_discount(&mut order, 50, &rules, Utc::now()).unwrap();
        assert!(order.used_loyalty_points);
    }

    #[test]
    fn test_delivery_transition() {
        let mut order = Order::new(Uuid::new_v4(), 0, Utc::now());
        assert!(ChangeHandler::mark_delivered(&mut order, Utc::now()).is_err());

        order.status = OrderStatus::Finalized;
        ChangeHandler::mark_delivered(&mut order, Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_cleanup_actions() {
        let now = Utc::now();
        let mut old = Order::new(Uuid::new_v4(), 0, now);
        old.status = OrderStatus::Finalized;
        old.date_placed = Some((now - Duration::days(45)).date_naive());
        let mut delivered = Order::new(Uuid::new_v4(), 0, now);
        delivered.status = OrderStatus::Delivered;
        delivered.date_placed = Some(now.date_naive());

        let mut orders = vec![old, delivered];

        let changed = ChangeHandler::cleanup(orders.iter_mut(), CleanupAction::HideOld, now);
        assert_eq!(changed, vec![orders[0].id]);

        let changed = ChangeHandler::cleanup(orders.iter_mut(), CleanupAction::HideDelivered, now);
        assert_eq!(changed, vec![orders[1].id]);

        let changed = ChangeHandler::cleanup(orders.iter_mut(), CleanupAction::ShowAll, now);
        assert_eq!(changed.len(), 2);
        assert!(orders.iter().all(|o| !o.hidden_from_customer));
        assert_eq!(CleanupAction::parse("hide_everything"), None);
    }
}
