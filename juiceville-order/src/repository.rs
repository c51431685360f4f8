use async_trait::async_trait;
use juiceville_core::CoreResult;
use uuid::Uuid;

use crate::hours::OperatingHours;
use crate::models::Order;
use crate::zones::DeliveryZone;

/// Repository trait for orders and their lines
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>>;

    async fn save_order(&self, order: &Order) -> CoreResult<()>;

    /// Returns whether an order was removed.
    async fn delete_order(&self, id: Uuid) -> CoreResult<bool>;

    async fn list_orders(&self) -> CoreResult<Vec<Order>>;

    async fn list_orders_for_customer(&self, customer_id: Uuid) -> CoreResult<Vec<Order>>;
}

#[async_trait]
pub trait ZoneRepository: Send + Sync {
    async fn get_zone(&self, id: Uuid) -> CoreResult<Option<DeliveryZone>>;

    async fn list_zones(&self) -> CoreResult<Vec<DeliveryZone>>;

    async fn save_zone(&self, zone: &DeliveryZone) -> CoreResult<()>;
}

#[async_trait]
pub trait HoursRepository: Send + Sync {
    async fn list_hours(&self) -> CoreResult<Vec<OperatingHours>>;

    async fn save_hours(&self, hours: &OperatingHours) -> CoreResult<()>;
}
