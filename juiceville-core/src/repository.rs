use async_trait::async_trait;
use uuid::Uuid;

use crate::identity::{Customer, Staff};
use crate::CoreResult;

/// Repository trait for customer profiles and loyalty balances
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_customer(&self, id: Uuid) -> CoreResult<Option<Customer>>;

    async fn save_customer(&self, customer: &Customer) -> CoreResult<()>;

    async fn list_customers(&self) -> CoreResult<Vec<Customer>>;
}

/// Repository trait for staff accounts
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn get_staff(&self, id: Uuid) -> CoreResult<Option<Staff>>;

    async fn save_staff(&self, staff: &Staff) -> CoreResult<()>;
}
