use anyhow::Result;
use chrono::Utc;
use ubx_db::{format_receipt_number, ReceiptCounter};

/// Read-only: the preview is what the next intake would get if it ran today.
pub async fn show() -> Result<()> {
    let pool = ubx_db::connect_from_env().await?;
    let snap = ReceiptCounter::default().snapshot(&pool).await?;

    println!("counter_key={}", snap.key);
    println!("current_counter={}", snap.current_counter);
    println!("last_reset_date={}", snap.last_reset_date.to_rfc3339());
    println!(
        "next_receipt_number={}",
        format_receipt_number(Utc::now().date_naive(), snap.current_counter + 1)
    );
    Ok(())
}
