use std::collections::HashMap;

use async_trait::async_trait;
use juiceville_catalog::{CatalogRepository, Combo, Item, StockOutcome};
use juiceville_core::identity::{Customer, Staff};
use juiceville_core::repository::{CustomerRepository, StaffRepository};
use juiceville_core::{CoreError, CoreResult};
use juiceville_order::{DeliveryZone, HoursRepository, OperatingHours, Order, OrderRepository, ZoneRepository};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::app_config::Config;

/// Process-local store backing every repository trait. Each table has its
/// own lock, so a write is atomic for one row and nothing more.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, Item>>,
    combos: RwLock<HashMap<Uuid, Combo>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    customers: RwLock<HashMap<Uuid, Customer>>,
    staff: RwLock<HashMap<Uuid, Staff>>,
    zones: RwLock<HashMap<Uuid, DeliveryZone>>,
    hours: RwLock<HashMap<Uuid, OperatingHours>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the zones and opening hours from config.
    pub async fn seeded(config: &Config) -> Self {
        let store = Self::new();
        {
            let mut zones = store.zones.write().await;
            for zone in config.delivery_zones.iter().map(|z| z.to_zone()) {
                zones.insert(zone.id, zone);
            }
        }
        {
            let mut hours = store.hours.write().await;
            for entry in config.operating_hours.iter().map(|h| h.to_hours()) {
                hours.insert(entry.id, entry);
            }
        }
        tracing::debug!(
            zones = config.delivery_zones.len(),
            hours = config.operating_hours.len(),
            "Seeded in-memory store"
        );
        store
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn get_item(&self, id: Uuid) -> CoreResult<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list_items(&self) -> CoreResult<Vec<Item>> {
        let mut items: Vec<Item> = self.items.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn save_item(&self, item: &Item) -> CoreResult<()> {
        if item.stock < 0 {
            return Err(CoreError::ValidationError(format!("negative stock for item {}", item.id)));
        }
        self.items.write().await.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> CoreResult<bool> {
        Ok(self.items.write().await.remove(&id).is_some())
    }

    async fn get_combo(&self, id: Uuid) -> CoreResult<Option<Combo>> {
        Ok(self.combos.read().await.get(&id).cloned())
    }

    async fn list_combos(&self) -> CoreResult<Vec<Combo>> {
        let mut combos: Vec<Combo> = self.combos.read().await.values().cloned().collect();
        combos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(combos)
    }

    async fn save_combo(&self, combo: &Combo) -> CoreResult<()> {
        self.combos.write().await.insert(combo.id, combo.clone());
        Ok(())
    }

    async fn deduct_item_stock(&self, id: Uuid, quantity: u32) -> CoreResult<StockOutcome> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(format!("item {}", id)))?;
        Ok(item.deduct_stock(quantity))
    }

    async fn set_item_stock(&self, id: Uuid, stock: i32) -> CoreResult<()> {
        if stock < 0 {
            return Err(CoreError::ValidationError(format!("negative stock for item {}", id)));
        }
        let mut items = self.items.write().await;
        let item = items
            .get_mut(&id)
            .ok_or_else(|| CoreError::NotFound(format!("item {}", id)))?;
        item.stock = stock;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn save_order(&self, order: &Order) -> CoreResult<()> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn delete_order(&self, id: Uuid) -> CoreResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }

    async fn list_orders(&self) -> CoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    async fn list_orders_for_customer(&self, customer_id: Uuid) -> CoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn get_customer(&self, id: Uuid) -> CoreResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn save_customer(&self, customer: &Customer) -> CoreResult<()> {
        self.customers.write().await.insert(customer.id, customer.clone());
        Ok(())
    }

    async fn list_customers(&self) -> CoreResult<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.customers.read().await.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }
}

#[async_trait]
impl StaffRepository for MemoryStore {
    async fn get_staff(&self, id: Uuid) -> CoreResult<Option<Staff>> {
        Ok(self.staff.read().await.get(&id).cloned())
    }

    async fn save_staff(&self, staff: &Staff) -> CoreResult<()> {
        self.staff.write().await.insert(staff.id, staff.clone());
        Ok(())
    }
}

#[async_trait]
impl ZoneRepository for MemoryStore {
    async fn get_zone(&self, id: Uuid) -> CoreResult<Option<DeliveryZone>> {
        Ok(self.zones.read().await.get(&id).cloned())
    }

    async fn list_zones(&self) -> CoreResult<Vec<DeliveryZone>> {
        let mut zones: Vec<DeliveryZone> = self.zones.read().await.values().cloned().collect();
        zones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(zones)
    }

    async fn save_zone(&self, zone: &DeliveryZone) -> CoreResult<()> {
        let mut zones = self.zones.write().await;
        if zones.values().any(|z| z.id != zone.id && z.name == zone.name) {
            return Err(CoreError::ValidationError(format!("zone name already in use: {}", zone.name)));
        }
        zones.insert(zone.id, zone.clone());
        Ok(())
    }
}

#[async_trait]
impl HoursRepository for MemoryStore {
    async fn list_hours(&self) -> CoreResult<Vec<OperatingHours>> {
        let mut hours: Vec<OperatingHours> = self.hours.read().await.values().cloned().collect();
        hours.sort_by_key(|h| (h.date, h.weekday));
        Ok(hours)
    }

    async fn save_hours(&self, entry: &OperatingHours) -> CoreResult<()> {
        let mut hours = self.hours.write().await;
        let mut schedule: Vec<OperatingHours> = hours.values().filter(|h| h.id != entry.id).cloned().collect();
        schedule.push(entry.clone());
        juiceville_order::hours::validate_schedule(&schedule)
            .map_err(|e| CoreError::ValidationError(e.to_string()))?;
        hours.insert(entry.id, entry.clone());
        Ok(())
    }
}
