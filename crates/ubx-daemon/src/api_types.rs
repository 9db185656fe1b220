//! Request and response types for the ubx-daemon HTTP endpoints.
//!
//! Order and summary bodies reuse `ubx_db` types directly; only the shapes
//! that exist purely at the HTTP edge live here.

use serde::{Deserialize, Serialize};
use ubx_db::{CancelledOrder, OrderError, OrderFilter, OrderStatus};

// ---------------------------------------------------------------------------
// /api/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// GET /api/orders, GET /api/summary
// ---------------------------------------------------------------------------

/// Query string shared by listing and summary. Empty values mean "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub admin_name: Option<String>,
}

impl OrderQuery {
    pub fn to_filter(&self) -> Result<OrderFilter, OrderError> {
        OrderFilter::parse(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            self.admin_name.as_deref(),
        )
    }
}

// ---------------------------------------------------------------------------
// PUT /api/orders/:id/cancel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub message: String,
    pub receipt_number: String,
    pub status: OrderStatus,
}

impl From<CancelledOrder> for CancelResponse {
    fn from(c: CancelledOrder) -> Self {
        Self {
            message: c.message(),
            receipt_number: c.receipt_number,
            status: c.status,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable kind: "invalid_payload" | "validation_failed" |
    /// "allocation_failed" | "persistence_failed" | "not_found"
    pub kind: String,
}
