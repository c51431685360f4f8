use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Cart: lines may still change
    Open,
    /// Paid; stock and loyalty effects committed
    Finalized,
    Delivered,
}

impl OrderStatus {
    pub fn is_finalized(&self) -> bool {
        matches!(self, OrderStatus::Finalized | OrderStatus::Delivered)
    }
}

/// What a line points at. Exactly one catalog entry per line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LineTarget {
    Item(Uuid),
    Combo(Uuid),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub target: LineTarget,
    pub quantity: u32,
    /// quantity × unit rate, filled in by the reconciler
    pub price_kobo: Option<Kobo>,
}

impl LineItem {
    pub fn new(target: LineTarget, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            quantity,
            price_kobo: None,
        }
    }

    /// Changing the quantity invalidates the computed price.
    pub fn add_quantity(&mut self, quantity: u32) {
        self.quantity = self.quantity.saturating_add(quantity);
        self.price_kobo = None;
    }

    pub fn price(&self) -> Kobo {
        self.price_kobo.unwrap_or(0)
    }
}

/// A customer's cart, and after payment, their order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub lines: Vec<LineItem>,
    pub delivery_fee_kobo: Kobo,
    pub used_loyalty_points: bool,
    pub subtotal_kobo: Kobo,
    pub grand_total_kobo: Kobo,
    pub status: OrderStatus,
    pub payment_reference: Option<String>,
    pub date_placed: Option<NaiveDate>,
    pub time_placed: Option<NaiveTime>,
    pub expected_delivery_at: Option<DateTime<Utc>>,
    pub hidden_from_customer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer_id: Uuid, delivery_fee_kobo: Kobo, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            lines: Vec::new(),
            delivery_fee_kobo,
            used_loyalty_points: false,
            subtotal_kobo: 0,
            grand_total_kobo: delivery_fee_kobo.max(0),
            status: OrderStatus::Open,
            payment_reference: None,
            date_placed: None,
            time_placed: None,
            expected_delivery_at: None,
            hidden_from_customer: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_finalized()
    }

    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The day the order counts towards in reports: the placement date once
    /// finalized, otherwise the day the cart was opened.
    pub fn placed_on(&self) -> NaiveDate {
        self.date_placed.unwrap_or_else(|| self.created_at.date_naive())
    }

    pub fn update_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_change_clears_price() {
        let mut line = LineItem::new(LineTarget::Item(Uuid::new_v4()), 2);
        line.price_kobo = Some(200_000);
        line.add_quantity(1);

        assert_eq!(line.quantity, 3);
        assert_eq!(line.price_kobo, None);
    }

    #[test]
    fn test_placed_on_falls_back_to_creation() {
        let now = Utc::now();
        let mut order = Order::new(Uuid::new_v4(), 50_000, now);
        assert_eq!(order.placed_on(), now.date_naive());

        let placed = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        order.date_placed = Some(placed);
        assert_eq!(order.placed_on(), placed);
    }
}
