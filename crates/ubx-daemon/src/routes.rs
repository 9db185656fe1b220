//! Axum router and all HTTP handlers for ubx-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Extractor rejections are taken as `Result` so that
//! malformed input surfaces as `InvalidPayload` in the shared error body.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use tracing::info;
use ubx_db::{NewOrder, Order, OrderSummary};

use crate::{
    api_types::{CancelResponse, HealthResponse, OrderQuery},
    error::ApiError,
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing, timeout) are **not** applied here;
/// `main.rs` attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/summary", get(order_summary))
        .route("/api/orders/:id/cancel", put(cancel_order))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /api/orders
// ---------------------------------------------------------------------------

/// Create an order. Any `receipt_number` in the body is ignored; the server
/// allocates one inside the intake transaction.
pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(order) = payload?;
    let created = ubx_db::create_order(&st.pool, &st.counter, order, st.today()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// GET /api/orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_orders(
    State(st): State<Arc<AppState>>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let Query(q) = query?;
    let filter = q.to_filter()?;
    let orders = ubx_db::list_orders(&st.pool, &filter).await?;
    Ok(Json(orders))
}

// ---------------------------------------------------------------------------
// GET /api/summary
// ---------------------------------------------------------------------------

pub(crate) async fn order_summary(
    State(st): State<Arc<AppState>>,
    query: Result<Query<OrderQuery>, QueryRejection>,
) -> Result<Json<OrderSummary>, ApiError> {
    let Query(q) = query?;
    let filter = q.to_filter()?;
    let summary = ubx_db::order_summary(&st.pool, &filter).await?;
    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// PUT /api/orders/:id/cancel
// ---------------------------------------------------------------------------

pub(crate) async fn cancel_order(
    State(st): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CancelResponse>, ApiError> {
    let Path(id) = id?;
    let cancelled = ubx_db::cancel_order(&st.pool, id).await?;
    info!(id, receipt_number = %cancelled.receipt_number, "orders/cancel");
    Ok(Json(cancelled.into()))
}
