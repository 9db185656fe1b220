//! Shared runtime state for ubx-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The pool is the only
//! shared resource; all coordination between requests happens in Postgres.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use ubx_db::ReceiptCounter;

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Counter row used for receipt numbers.
    pub counter: ReceiptCounter,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            counter: ReceiptCounter::default(),
            build: BuildInfo {
                service: "ubx-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }

    /// Calendar date stamped into new receipt numbers (process clock, UTC).
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
