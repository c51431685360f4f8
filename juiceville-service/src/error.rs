use juiceville_catalog::CatalogError;
use juiceville_core::payment::PaymentError;
use juiceville_core::CoreError;
use juiceville_order::{HoursError, OrderError};
use serde::Serialize;
use serde_json::json;

/// Coarse classification a transport layer maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    Payment,
    Closed,
    Internal,
}

impl ErrorKind {
    /// HTTP status an HTTP host would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Payment => 402,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Closed => 503,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Payment(String),

    #[error("{0}")]
    Closed(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Payment(_) => ErrorKind::Payment,
            AppError::Closed(_) => ErrorKind::Closed,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// `{"error": ...}` body; internal details are logged, never returned.
    pub fn to_body(&self) -> serde_json::Value {
        let message = match self {
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        json!({ "error": message, "kind": self.kind() })
    }

    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} not found", what, id))
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ValidationError(msg) => AppError::Validation(msg),
            CoreError::NotFound(msg) => AppError::NotFound(msg),
            CoreError::Forbidden(msg) => AppError::Forbidden(msg),
            CoreError::StorageError(_) | CoreError::InternalError(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<HoursError> for AppError {
    fn from(err: HoursError) -> Self {
        match err {
            HoursError::DuplicateWeekday(_) | HoursError::InvalidWeekday(_) => AppError::Validation(err.to_string()),
            _ => AppError::Closed(err.to_string()),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Unavailable(_) => AppError::Internal(err.into()),
            PaymentError::Rejected(_) | PaymentError::UnknownReference(_) => AppError::Payment(err.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::not_found("Order", id),
            OrderError::NotOwner(_) => AppError::Forbidden(err.to_string()),
            OrderError::InvalidTransition { .. } | OrderError::NotModifiable(_) => AppError::Conflict(err.to_string()),
            OrderError::EmptyOrder(_)
            | OrderError::InvalidQuantity
            | OrderError::UnknownEntry(_)
            | OrderError::InsufficientPoints { .. } => AppError::Validation(err.to_string()),
            OrderError::PaymentRequired(_) | OrderError::PaymentNotVerified { .. } => {
                AppError::Payment(err.to_string())
            }
            OrderError::Closed(e) => e.into(),
            OrderError::Payment(e) => e.into(),
            OrderError::Storage(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juiceville_core::payment::PaymentStatus;
    use uuid::Uuid;

    #[test]
    fn test_order_errors_map_to_kinds() {
        let cases = [
            (OrderError::NotOwner(Uuid::nil()), ErrorKind::Forbidden),
            (OrderError::EmptyOrder(Uuid::nil()), ErrorKind::Validation),
            (
                OrderError::PaymentNotVerified {
                    reference: "ref".to_string(),
                    status: PaymentStatus::Failed,
                },
                ErrorKind::Payment,
            ),
            (OrderError::Closed(HoursError::Misconfigured), ErrorKind::Closed),
            (
                OrderError::Storage(CoreError::StorageError("disk".to_string())),
                ErrorKind::Internal,
            ),
        ];
        for (err, kind) in cases {
            assert_eq!(AppError::from(err).kind(), kind);
        }
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::from(CoreError::StorageError("connection reset".to_string()));
        assert_eq!(err.to_body()["error"], "Internal Server Error");
        assert_eq!(err.kind().status_code(), 500);

        let err = AppError::Validation("Quantity must be at least 1".to_string());
        assert_eq!(err.to_body()["error"], "Quantity must be at least 1");
    }
}
