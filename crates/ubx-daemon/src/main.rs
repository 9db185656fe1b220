//! ubx-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, connects the pool,
//! wires middleware, and starts the HTTP server. All route handlers live in
//! `routes.rs`; shared state lives in `state.rs`.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use ubx_daemon::{
    config::{CorsOrigins, DaemonConfig},
    routes, state,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env / .env.local if present (dev convenience).
    // Silent if the files do not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = DaemonConfig::from_env()?;
    let db_cfg = ubx_db::DbConfig::from_env()?;
    let pool = ubx_db::connect(&db_cfg).await?;
    info!(
        max_connections = db_cfg.max_connections,
        lock_timeout_ms = db_cfg.lock_timeout.as_millis() as u64,
        "connected to Postgres"
    );

    let shared = Arc::new(state::AppState::new(pool));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(TimeoutLayer::new(cfg.request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors(&cfg.cors_origins));

    info!("ubx-daemon listening on http://{}", cfg.addr);

    axum::serve(tokio::net::TcpListener::bind(cfg.addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    shared.pool.close().await;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// CORS for the order console. Credentials are only allowed with an explicit
/// origin list; browsers reject them alongside a wildcard origin.
fn cors(origins: &CorsOrigins) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origins {
        CorsOrigins::Any => base.allow_origin(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect();
            base.allow_origin(origins).allow_credentials(true)
        }
    }
}
