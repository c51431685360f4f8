pub mod changes;
pub mod customer_reports;
pub mod hours;
pub mod models;
pub mod orchestrator;
pub mod reconciler;
pub mod reports;
pub mod repository;
pub mod zones;

pub use changes::{ChangeHandler, CleanupAction};
pub use hours::{GateDecision, HoursError, OperatingHours};
pub use models::{LineItem, LineTarget, Order, OrderStatus};
pub use orchestrator::{MockPaymentGateway, PaymentOrchestrator};
pub use reconciler::{CatalogSnapshot, FinalizeReport, LoyaltyOutcome, LoyaltyRules, Quote, Reconciler};
pub use repository::{HoursRepository, OrderRepository, ZoneRepository};
pub use zones::DeliveryZone;

use juiceville_core::payment::{PaymentError, PaymentStatus};
use juiceville_core::CoreError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} can no longer be changed")]
    NotModifiable(Uuid),

    #[error("Order {0} has no items")]
    EmptyOrder(Uuid),

    #[error("Order {0} has no payment reference")]
    PaymentRequired(Uuid),

    #[error("Payment {reference} was not successful ({status:?})")]
    PaymentNotVerified { reference: String, status: PaymentStatus },

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Unknown catalog entry: {0:?}")]
    UnknownEntry(LineTarget),

    #[error("Not enough loyalty points: have {have}, need {need}")]
    InsufficientPoints { have: u32, need: u32 },

    #[error("Order {0} belongs to another customer")]
    NotOwner(Uuid),

    #[error(transparent)]
    Closed(#[from] HoursError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Storage(#[from] CoreError),
}
