use anyhow::{Context, Result};
use ubx_db::OrderFilter;

use super::amount;

pub async fn summary(filter: &OrderFilter, json: bool) -> Result<()> {
    let pool = ubx_db::connect_from_env().await?;
    let s = ubx_db::order_summary(&pool, filter).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&s).context("serialize summary failed")?
        );
        return Ok(());
    }

    println!("total_orders={}", s.total_orders);
    println!("total_revenue={}", amount(s.total_revenue));
    println!("pending_pickup={}", s.pending_pickup);
    println!("total_cash={}", amount(s.total_cash));
    println!("total_dfod={}", amount(s.total_dfod));
    println!("total_cancelled={}", s.total_cancelled);
    Ok(())
}

pub async fn cancel(id: i64) -> Result<()> {
    let pool = ubx_db::connect_from_env().await?;
    tracing::info!(order_id = id, "cancelling order");
    let cancelled = ubx_db::cancel_order(&pool, id).await?;

    println!("order_id={}", cancelled.id);
    println!("receipt_number={}", cancelled.receipt_number);
    println!("status={}", cancelled.status.as_str());
    println!("message={}", cancelled.message());
    Ok(())
}
