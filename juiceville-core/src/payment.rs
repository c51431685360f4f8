use async_trait::async_trait;
use chrono::{DateTime, Utc};
use juiceville_shared::Kobo;
use serde::{Deserialize, Serialize};

/// Transaction status as reported by the gateway on verification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Failed,
    Abandoned,
    Pending,
    Reversed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub reference: String,
    pub email: String,
    pub amount_kobo: Kobo,
    pub callback_url: String,
}

/// Where to send the customer to complete payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub reference: String,
    pub authorization_url: String,
    pub access_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub reference: String,
    pub status: PaymentStatus,
    pub amount_kobo: Kobo,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentVerification {
    pub fn is_successful(&self) -> bool {
        self.status == PaymentStatus::Success
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Gateway rejected the request: {0}")]
    Rejected(String),

    #[error("Unknown payment reference: {0}")]
    UnknownReference(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a transaction with the provider and get the checkout URL
    async fn initialize(&self, request: &PaymentRequest) -> Result<PaymentAuthorization, PaymentError>;

    /// Ask the provider what happened to a transaction
    async fn verify(&self, reference: &str) -> Result<PaymentVerification, PaymentError>;
}
