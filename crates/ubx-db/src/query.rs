//! Read paths over `orders` plus the cancel transition.
//!
//! All functions take any Postgres executor so callers can run them on the
//! pool or inside a transaction.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, Row};
use tracing::info;

use crate::error::OrderError;
use crate::order::{order_from_row, Order, OrderStatus, ORDER_COLUMNS, PAYMENT_CASH, PAYMENT_DFOD};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional filters shared by listing and summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of `admin_name`.
    pub admin_name: Option<String>,
}

impl OrderFilter {
    /// Build a filter from raw `YYYY-MM-DD` strings. Empty strings mean "no filter".
    pub fn parse(
        start_date: Option<&str>,
        end_date: Option<&str>,
        admin_name: Option<&str>,
    ) -> Result<Self, OrderError> {
        Ok(Self {
            start_date: parse_date("start_date", start_date)?,
            end_date: parse_date("end_date", end_date)?,
            admin_name: non_empty(admin_name).map(str::to_string),
        })
    }

    /// `start_date 00:00:00` (UTC), inclusive.
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|t| Utc.from_utc_datetime(&t))
    }

    /// `end_date 23:59:59` (UTC), inclusive.
    pub fn created_until(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|t| Utc.from_utc_datetime(&t))
    }

    fn admin_pattern(&self) -> Option<String> {
        self.admin_name.as_deref().map(like_substring_pattern)
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &str, v: Option<&str>) -> Result<Option<NaiveDate>, OrderError> {
    match non_empty(v) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| OrderError::InvalidPayload(format!("{field} must be YYYY-MM-DD, got {s:?}"))),
    }
}

/// `%needle%` with LIKE metacharacters in `needle` escaped.
fn like_substring_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

const FILTER_PREDICATE: &str = r#"
    ($1::timestamptz is null or created_at >= $1)
    and ($2::timestamptz is null or created_at <= $2)
    and ($3::text is null or admin_name ilike $3)
"#;

/// Orders matching `filter`, newest `created_at` first.
pub async fn list_orders<'e, E>(executor: E, filter: &OrderFilter) -> Result<Vec<Order>, OrderError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "select {ORDER_COLUMNS} from orders where {FILTER_PREDICATE} order by created_at desc, id desc"
    );

    let rows = sqlx::query(&sql)
        .bind(filter.created_from())
        .bind(filter.created_until())
        .bind(filter.admin_pattern())
        .fetch_all(executor)
        .await?;

    let mut out = Vec::with_capacity(rows.len());
    for r in &rows {
        out.push(order_from_row(r)?);
    }
    Ok(out)
}

/// Aggregates over the orders matching a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Every matching order, cancelled ones included.
    pub total_orders: i64,
    /// Shipping cost of non-cancelled orders.
    pub total_revenue: f64,
    pub pending_pickup: i64,
    pub total_cash: f64,
    pub total_dfod: f64,
    pub total_cancelled: i64,
}

pub async fn order_summary<'e, E>(executor: E, filter: &OrderFilter) -> Result<OrderSummary, OrderError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        select
          count(*) as total_orders,
          coalesce(sum(total_shipping_cost) filter (where status <> 'cancelled'), 0) as total_revenue,
          coalesce(sum(total_shipping_cost) filter (where status <> 'cancelled' and payment_method = $4), 0) as total_cash,
          coalesce(sum(total_shipping_cost) filter (where status <> 'cancelled' and payment_method = $5), 0) as total_dfod,
          count(*) filter (where status = 'pending') as pending_pickup,
          count(*) filter (where status = 'cancelled') as total_cancelled
        from orders
        where {FILTER_PREDICATE}
        "#
    );

    let row = sqlx::query(&sql)
        .bind(filter.created_from())
        .bind(filter.created_until())
        .bind(filter.admin_pattern())
        .bind(PAYMENT_CASH)
        .bind(PAYMENT_DFOD)
        .fetch_one(executor)
        .await?;

    Ok(OrderSummary {
        total_orders: row.try_get("total_orders")?,
        total_revenue: row.try_get("total_revenue")?,
        pending_pickup: row.try_get("pending_pickup")?,
        total_cash: row.try_get("total_cash")?,
        total_dfod: row.try_get("total_dfod")?,
        total_cancelled: row.try_get("total_cancelled")?,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelledOrder {
    pub id: i64,
    pub receipt_number: String,
    pub status: OrderStatus,
}

impl CancelledOrder {
    pub fn message(&self) -> String {
        format!(
            "Order {} successfully updated to status: {}",
            self.receipt_number,
            self.status.as_str()
        )
    }
}

/// Mark an order cancelled. No check on the current status: cancelling a
/// cancelled order succeeds again.
pub async fn cancel_order<'e, E>(executor: E, id: i64) -> Result<CancelledOrder, OrderError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query(
        r#"
        update orders
        set status = $2
        where id = $1
        returning receipt_number, status
        "#,
    )
    .bind(id)
    .bind(OrderStatus::Cancelled.as_str())
    .fetch_optional(executor)
    .await?
    .ok_or(OrderError::NotFound(id))?;

    let receipt_number: String = row.try_get("receipt_number")?;
    let status: String = row.try_get("status")?;
    let status = OrderStatus::parse(&status).map_err(|e| {
        OrderError::PersistenceFailed(sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: e.into(),
        })
    })?;

    info!(id, %receipt_number, "order cancelled");
    Ok(CancelledOrder {
        id,
        receipt_number,
        status,
    })
}
