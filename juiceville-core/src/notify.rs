use async_trait::async_trait;
use juiceville_shared::events::{OrderDeliveredEvent, OrderFinalizedEvent};
use juiceville_shared::money::format_naira;

use crate::CoreResult;

/// Outbound alerts to the kitchen/front desk.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_finalized(&self, event: &OrderFinalizedEvent) -> CoreResult<()>;

    async fn order_delivered(&self, event: &OrderDeliveredEvent) -> CoreResult<()>;
}

/// Writes alerts to the log instead of a chat channel.
pub struct LogNotifier;

#[async_trait]
impl OrderNotifier for LogNotifier {
    async fn order_finalized(&self, event: &OrderFinalizedEvent) -> CoreResult<()> {
        tracing::info!(
            order_id = %event.order_id,
            customer = %event.customer_name,
            lines = event.line_count,
            shortfalls = event.stock_shortfalls,
            "NEW ORDER (paid): total {}",
            format_naira(event.grand_total_kobo)
        );
        Ok(())
    }

    async fn order_delivered(&self, event: &OrderDeliveredEvent) -> CoreResult<()> {
        tracing::info!(order_id = %event.order_id, closed_by = %event.closed_by, "Order delivered");
        Ok(())
    }
}
