//! Order intake: one transaction that allocates a receipt number and inserts
//! the order row.
//!
//! Every early return below drops `tx` without committing; sqlx rolls an
//! uncommitted `Transaction` back on drop, which also returns the allocated
//! counter value. That includes the required-field check, which runs after
//! allocation and has no explicit rollback of its own.

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Row};
use tracing::{error, info, warn};

use crate::counter::ReceiptCounter;
use crate::error::OrderError;
use crate::order::{NewOrder, Order, OrderStatus};
use crate::receipt::format_receipt_number;

/// Create one order with a freshly allocated receipt number.
///
/// `today` is the calendar date embedded in the receipt number; callers pass
/// the process clock's date, never a client-supplied one.
pub async fn create_order(
    pool: &PgPool,
    counter: &ReceiptCounter,
    order: NewOrder,
    today: NaiveDate,
) -> Result<Order, OrderError> {
    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "transaction begin failed");
        OrderError::PersistenceFailed(e)
    })?;

    let counter_value = counter
        .allocate(&mut tx)
        .await
        .map_err(OrderError::AllocationFailed)?;
    let receipt_number = format_receipt_number(today, counter_value);
    // Stamped after the counter lock is held, so newest-first listing agrees
    // with receipt order. Column default `now()` is the transaction start.
    let stamped_at = Utc::now();

    let missing = order.missing_required_fields();
    if !missing.is_empty() {
        warn!(?missing, %receipt_number, "order rejected; releasing receipt number");
        return Err(OrderError::ValidationFailed(missing));
    }

    let row = sqlx::query(
        r#"
        insert into orders (
          receipt_number, admin_name,
          sender_name, sender_phone, sender_address, sender_city, sender_district, sender_village,
          receiver_name, receiver_phone, receiver_address, receiver_city, receiver_district, receiver_village,
          package_content, package_weight, package_length, package_width, package_height,
          calculated_volume_weight, item_value,
          service_type, insurance_chosen, is_electronic, insurance_cost, payment_method, discount,
          total_shipping_cost, status, created_at
        ) values (
          $1, $2,
          $3, $4, $5, $6, $7, $8,
          $9, $10, $11, $12, $13, $14,
          $15, $16, $17, $18, $19,
          $20, $21,
          $22, $23, $24, $25, $26, $27,
          $28, $29, $30
        )
        returning id, created_at
        "#,
    )
    .bind(&receipt_number)
    .bind(&order.admin_name)
    .bind(&order.sender_name)
    .bind(&order.sender_phone)
    .bind(&order.sender_address)
    .bind(&order.sender_city)
    .bind(&order.sender_district)
    .bind(&order.sender_village)
    .bind(&order.receiver_name)
    .bind(&order.receiver_phone)
    .bind(&order.receiver_address)
    .bind(&order.receiver_city)
    .bind(&order.receiver_district)
    .bind(&order.receiver_village)
    .bind(&order.package_content)
    .bind(order.package_weight)
    .bind(order.package_length)
    .bind(order.package_width)
    .bind(order.package_height)
    .bind(order.calculated_volume_weight)
    .bind(order.item_value)
    .bind(&order.service_type)
    .bind(order.insurance_chosen)
    .bind(order.is_electronic)
    .bind(order.insurance_cost)
    .bind(&order.payment_method)
    .bind(order.discount)
    .bind(order.total_shipping_cost)
    .bind(OrderStatus::Pending.as_str())
    .bind(stamped_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, %receipt_number, "order insert failed");
        OrderError::PersistenceFailed(e)
    })?;

    let id: i64 = row.try_get("id")?;
    let created_at = row.try_get("created_at")?;

    tx.commit().await.map_err(|e| {
        error!(error = %e, %receipt_number, "order commit failed");
        OrderError::PersistenceFailed(e)
    })?;

    info!(id, %receipt_number, admin = %order.admin_name, "order created");

    Ok(Order {
        id,
        receipt_number,
        details: order,
        created_at,
        status: OrderStatus::Pending,
    })
}
