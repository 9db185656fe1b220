//! HTTP mapping for `ubx_db::OrderError`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};
use ubx_db::OrderError;

use crate::api_types::ErrorResponse;

/// Wrapper so `OrderError` can be returned straight from handlers.
#[derive(Debug)]
pub struct ApiError(pub OrderError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            OrderError::InvalidPayload(_) | OrderError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::AllocationFailed(_) | OrderError::PersistenceFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Store failures never leak their detail.
    fn public_message(&self) -> String {
        match &self.0 {
            OrderError::InvalidPayload(_) | OrderError::ValidationFailed(_) => self.0.to_string(),
            OrderError::NotFound(_) => "order not found".to_string(),
            OrderError::AllocationFailed(_) => "failed to allocate receipt number".to_string(),
            OrderError::PersistenceFailed(_) => "failed to process order".to_string(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(e: OrderError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self(OrderError::InvalidPayload(r.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self(OrderError::InvalidPayload(r.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self(OrderError::InvalidPayload(r.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            warn!(kind = self.0.kind(), error = %self.0, "request rejected");
        } else {
            // Full source chain goes to the log only.
            error!(kind = self.0.kind(), error = ?self.0, "request failed");
        }

        let body = ErrorResponse {
            error: self.public_message(),
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
