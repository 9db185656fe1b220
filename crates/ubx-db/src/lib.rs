//! Persistence layer for UBX shipment orders.
//!
//! - [`counter`]: the singleton receipt counter (row-locked allocation).
//! - [`receipt`]: receipt number formatting.
//! - [`intake`]: the order-creation transaction.
//! - [`query`]: listing, summary and cancellation.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub use sqlx::PgPool;

pub mod counter;
pub mod error;
pub mod intake;
pub mod order;
pub mod query;
pub mod receipt;

pub use counter::{CounterSnapshot, CounterUnavailable, ReceiptCounter, DEFAULT_COUNTER_KEY};
pub use error::OrderError;
pub use intake::create_order;
pub use order::{NewOrder, Order, OrderStatus, PAYMENT_CASH, PAYMENT_DFOD};
pub use query::{cancel_order, list_orders, order_summary, CancelledOrder, OrderFilter, OrderSummary};
pub use receipt::{format_receipt_number, receipt_counter_value, RECEIPT_PREFIX};

pub const ENV_DB_URL: &str = "UBX_DATABASE_URL";
/// Conventional fallback used by most Postgres tooling.
pub const ENV_DB_URL_FALLBACK: &str = "DATABASE_URL";
pub const ENV_DB_MAX_CONNECTIONS: &str = "UBX_DB_MAX_CONNECTIONS";
pub const ENV_DB_ACQUIRE_TIMEOUT_SECS: &str = "UBX_DB_ACQUIRE_TIMEOUT_SECS";
pub const ENV_DB_LOCK_TIMEOUT_MS: &str = "UBX_DB_LOCK_TIMEOUT_MS";

/// Connection settings for the order store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Postgres `lock_timeout`; bounds how long an intake waits on the counter row.
    pub lock_timeout: Duration,
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
            lock_timeout: Duration::from_millis(5_000),
        }
    }

    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_DB_URL)
            .or_else(|_| std::env::var(ENV_DB_URL_FALLBACK))
            .with_context(|| format!("missing env var {ENV_DB_URL}"))?;

        let defaults = Self::new(url);
        Ok(Self {
            max_connections: env_or(ENV_DB_MAX_CONNECTIONS, defaults.max_connections)?,
            acquire_timeout: Duration::from_secs(env_or(
                ENV_DB_ACQUIRE_TIMEOUT_SECS,
                defaults.acquire_timeout.as_secs(),
            )?),
            lock_timeout: Duration::from_millis(env_or(
                ENV_DB_LOCK_TIMEOUT_MS,
                defaults.lock_timeout.as_millis() as u64,
            )?),
            ..defaults
        })
    }

    fn connect_options(&self) -> Result<PgConnectOptions> {
        let opts = PgConnectOptions::from_str(&self.url).context("invalid database url")?;
        Ok(opts.options([("lock_timeout", format!("{}ms", self.lock_timeout.as_millis()))]))
    }
}

/// Parse an optional env var, falling back to `default` when unset.
pub fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {v:?}")),
        _ => Ok(default),
    }
}

/// Connect to Postgres with explicit settings.
pub async fn connect(cfg: &DbConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout)
        .connect_with(cfg.connect_options()?)
        .await
        .context("failed to connect to Postgres")?;

    Ok(pool)
}

/// Connect to Postgres using UBX_DATABASE_URL (or DATABASE_URL).
pub async fn connect_from_env() -> Result<PgPool> {
    connect(&DbConfig::from_env()?).await
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;
    let ok = one == 1;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='orders'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok,
        has_orders_table: exists,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_orders_table: bool,
}
