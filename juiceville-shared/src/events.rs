use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Kobo;

/// Published once an order has been paid for and its stock committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFinalizedEvent {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub grand_total_kobo: Kobo,
    pub line_count: usize,
    pub stock_shortfalls: usize,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDeliveredEvent {
    pub order_id: Uuid,
    pub closed_by: Uuid,
    pub timestamp: i64,
}

/// One stock deduction that could not be applied during finalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockShortfallEvent {
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub requested: u32,
    pub available: i32,
    pub via_combo: Option<Uuid>,
}
