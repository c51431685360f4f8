use std::collections::HashMap;
use std::sync::Arc;

use juiceville_catalog::CatalogRepository;
use juiceville_core::clock::Clock;
use juiceville_core::identity::{Customer, Staff};
use juiceville_core::notify::OrderNotifier;
use juiceville_core::payment::PaymentGateway;
use juiceville_core::repository::{CustomerRepository, StaffRepository};
use juiceville_order::reports::CustomerNames;
use juiceville_order::{CatalogSnapshot, HoursRepository, Order, OrderRepository, PaymentOrchestrator, Reconciler, ZoneRepository};
use juiceville_order::customer_reports::display_name;
use juiceville_store::app_config::{BusinessRules, Config};
use juiceville_store::MemoryStore;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub zones: Arc<dyn ZoneRepository>,
    pub hours: Arc<dyn HoursRepository>,
    pub payments: Arc<PaymentOrchestrator>,
    pub notifier: Arc<dyn OrderNotifier>,
    pub clock: Arc<dyn Clock>,
    pub business_rules: BusinessRules,
}

impl AppState {
    /// Wire every repository to one in-memory store seeded from `config`.
    pub async fn in_memory(
        config: &Config,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn OrderNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(MemoryStore::seeded(config).await);
        Self {
            catalog: store.clone(),
            orders: store.clone(),
            customers: store.clone(),
            staff: store.clone(),
            zones: store.clone(),
            hours: store,
            payments: Arc::new(PaymentOrchestrator::new(gateway, config.callback_base_url())),
            notifier,
            clock,
            business_rules: config.business_rules.clone(),
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        self.business_rules.reconciler()
    }

    pub async fn customer(&self, id: Uuid) -> AppResult<Customer> {
        self.customers
            .get_customer(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer", id))
    }

    pub async fn staff_member(&self, id: Uuid) -> AppResult<Staff> {
        self.staff
            .get_staff(id)
            .await?
            .ok_or_else(|| AppError::not_found("Staff", id))
    }

    pub async fn order(&self, id: Uuid) -> AppResult<Order> {
        self.orders
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))
    }

    pub async fn catalog_snapshot(&self) -> AppResult<CatalogSnapshot> {
        Ok(CatalogSnapshot::load(self.catalog.as_ref()).await?)
    }

    pub async fn customer_names(&self) -> AppResult<CustomerNames> {
        Ok(self
            .customers
            .list_customers()
            .await?
            .iter()
            .map(|c| (c.id, display_name(c)))
            .collect::<HashMap<_, _>>())
    }
}
