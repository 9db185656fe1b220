use thiserror::Error;

use crate::counter::CounterUnavailable;

/// Every way an order operation can fail.
///
/// The HTTP layer maps each variant to a distinct client-facing status; the
/// inner detail of `AllocationFailed` / `PersistenceFailed` is for logs only.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Input is not even well-formed (bad JSON, wrong types, bad dates).
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Required business fields are empty.
    #[error("required fields are missing: {}", .0.join(", "))]
    ValidationFailed(Vec<&'static str>),

    /// The receipt counter could not be read or advanced.
    #[error("failed to allocate receipt number")]
    AllocationFailed(#[source] CounterUnavailable),

    /// Begin / insert / query / commit against the store failed.
    #[error("order persistence failed")]
    PersistenceFailed(#[source] sqlx::Error),

    #[error("order {0} not found")]
    NotFound(i64),
}

impl OrderError {
    /// Stable machine-readable kind, used in logs and error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::InvalidPayload(_) => "invalid_payload",
            OrderError::ValidationFailed(_) => "validation_failed",
            OrderError::AllocationFailed(_) => "allocation_failed",
            OrderError::PersistenceFailed(_) => "persistence_failed",
            OrderError::NotFound(_) => "not_found",
        }
    }

    /// True for failures caused by the caller rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OrderError::InvalidPayload(_) | OrderError::ValidationFailed(_) | OrderError::NotFound(_)
        )
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        OrderError::PersistenceFailed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_fields() {
        let e = OrderError::ValidationFailed(vec!["admin_name", "sender_name"]);
        assert_eq!(
            e.to_string(),
            "required fields are missing: admin_name, sender_name"
        );
        assert!(e.is_client_error());
    }

    #[test]
    fn store_failures_are_not_client_errors() {
        let e = OrderError::AllocationFailed(CounterUnavailable::Missing { key: 1 });
        assert_eq!(e.kind(), "allocation_failed");
        assert!(!e.is_client_error());

        let e = OrderError::from(sqlx::Error::RowNotFound);
        assert_eq!(e.kind(), "persistence_failed");
        assert!(!e.is_client_error());
    }
}
