use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use juiceville_core::payment::{
    PaymentAuthorization, PaymentError, PaymentGateway, PaymentRequest, PaymentStatus, PaymentVerification,
};
use juiceville_shared::Kobo;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::Order;
use crate::OrderError;

pub struct PaymentOrchestrator {
    gateway: Arc<dyn PaymentGateway>,
    callback_base_url: String,
}

impl PaymentOrchestrator {
    pub fn new(gateway: Arc<dyn PaymentGateway>, callback_base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            callback_base_url: callback_base_url.into(),
        }
    }

    /// Where the gateway sends the customer back after paying for `order_id`.
    pub fn callback_url(&self, order_id: Uuid) -> String {
        format!(
            "{}/orders/{}/finalize",
            self.callback_base_url.trim_end_matches('/'),
            order_id
        )
    }

    /// Open a gateway transaction for `amount_kobo` under a fresh reference.
    /// The reference is written onto the order; the caller persists it.
    pub async fn initiate(
        &self,
        order: &mut Order,
        email: &str,
        amount_kobo: Kobo,
        now: DateTime<Utc>,
    ) -> Result<PaymentAuthorization, OrderError> {
        if order.is_empty() {
            return Err(OrderError::EmptyOrder(order.id));
        }
        if !order.is_open() {
            return Err(OrderError::NotModifiable(order.id));
        }

        let request = PaymentRequest {
            reference: Uuid::new_v4().to_string(),
            email: email.to_string(),
            amount_kobo,
            callback_url: self.callback_url(order.id),
        };

        let authorization = self.gateway.initialize(&request).await.map_err(|e| {
            error!(order_id = %order.id, error = %e, "Payment initialization failed");
            OrderError::Payment(e)
        })?;

        info!(order_id = %order.id, reference = %request.reference, amount_kobo, "Payment initiated");
        order.payment_reference = Some(request.reference);
        order.updated_at = now;
        Ok(authorization)
    }

    /// Verify the order's payment with the gateway. Anything other than a
    /// successful transaction is an error.
    pub async fn confirm(&self, order: &Order) -> Result<PaymentVerification, OrderError> {
        let reference = order
            .payment_reference
            .as_deref()
            .ok_or(OrderError::PaymentRequired(order.id))?;

        let verification = self.gateway.verify(reference).await.map_err(|e| {
            error!(order_id = %order.id, reference, error = %e, "Payment verification failed");
            OrderError::Payment(e)
        })?;

        if !verification.is_successful() {
            info!(order_id = %order.id, reference, status = ?verification.status, "Payment not successful");
            return Err(OrderError::PaymentNotVerified {
                reference: reference.to_string(),
                status: verification.status,
            });
        }
        Ok(verification)
    }
}

/// In-process gateway: every initialized transaction settles with the
/// configured status unless a test overrides it.
pub struct MockPaymentGateway {
    settle_as: PaymentStatus,
    transactions: RwLock<HashMap<String, PaymentVerification>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::settling_as(PaymentStatus::Success)
    }

    pub fn settling_as(status: PaymentStatus) -> Self {
        Self {
            settle_as: status,
            transactions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set_status(&self, reference: &str, status: PaymentStatus) {
        if let Some(tx) = self.transactions.write().await.get_mut(reference) {
            tx.status = status;
        }
    }

    pub async fn amount_for(&self, reference: &str) -> Option<Kobo> {
        self.transactions.read().await.get(reference).map(|tx| tx.amount_kobo)
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn initialize(&self, request: &PaymentRequest) -> Result<PaymentAuthorization, PaymentError> {
        if request.amount_kobo < 0 {
            return Err(PaymentError::Rejected("amount cannot be negative".to_string()));
        }

        let paid_at = (self.settle_as == PaymentStatus::Success).then(Utc::now);
        self.transactions.write().await.insert(
            request.reference.clone(),
            PaymentVerification {
                reference: request.reference.clone(),
                status: self.settle_as,
                amount_kobo: request.amount_kobo,
                paid_at,
            },
        );

        Ok(PaymentAuthorization {
            reference: request.reference.clone(),
            authorization_url: format!("https://checkout.mock/{}", request.reference),
            access_code: Some(format!("mock_{}", Uuid::new_v4().simple())),
        })
    }

    async fn verify(&self, reference: &str) -> Result<PaymentVerification, PaymentError> {
        self.transactions
            .read()
            .await
            .get(reference)
            .cloned()
            .ok_or_else(|| PaymentError::UnknownReference(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, LineTarget};

    fn cart() -> Order {
        let mut order = Order::new(Uuid::new_v4(), 50_000, Utc::now());
        order.lines.push(LineItem::new(LineTarget::Item(Uuid::new_v4()), 1));
        order
    }

    #[tokio::test]
    async fn test_initiate_then_confirm() {
        let gateway = Arc::new(MockPaymentGateway::new());
        let orchestrator = PaymentOrchestrator::new(gateway.clone(), "https://juiceville.ng/");
        let mut order = cart();
        let now = Utc::now() + chrono::Duration::minutes(5);

        let auth = orchestrator.initiate(&mut order, "ada@example.com", 250_000, now).await.unwrap();
        let reference = order.payment_reference.clone().unwrap();
        assert_eq!(auth.reference, reference);
        assert_eq!(order.updated_at, now);
        assert_eq!(gateway.amount_for(&reference).await, Some(250_000));

        let verification = orchestrator.confirm(&order).await.unwrap();
        assert!(verification.is_successful());
    }

    #[tokio::test]
    async fn test_failed_payment_not_verified() {
        let gateway = Arc::new(MockPaymentGateway::settling_as(PaymentStatus::Failed));
        let orchestrator = PaymentOrchestrator::new(gateway, "https://juiceville.ng");
        let mut order = cart();

        orchestrator.initiate(&mut order, "ada@example.com", 100, Utc::now()).await.unwrap();
        let result = orchestrator.confirm(&order).await;
        assert!(matches!(
            result,
            Err(OrderError::PaymentNotVerified { status: PaymentStatus::Failed, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_order_and_missing_reference() {
        let orchestrator = PaymentOrchestrator::new(Arc::new(MockPaymentGateway::new()), "https://juiceville.ng");
        let mut empty = Order::new(Uuid::new_v4(), 0, Utc::now());

        assert!(matches!(
            orchestrator.initiate(&mut empty, "ada@example.com", 0, Utc::now()).await,
            Err(OrderError::EmptyOrder(_))
        ));
        assert!(matches!(
            orchestrator.confirm(&cart()).await,
            Err(OrderError::PaymentRequired(_))
        ));
    }

    #[test]
    fn test_callback_url() {
        let orchestrator = PaymentOrchestrator::new(Arc::new(MockPaymentGateway::new()), "https://juiceville.ng/");
        let id = Uuid::nil();
        assert_eq!(
            orchestrator.callback_url(id),
            format!("https://juiceville.ng/orders/{}/finalize", id)
        );
    }
}
