use anyhow::Result;

pub async fn status() -> Result<()> {
    let pool = ubx_db::connect_from_env().await?;
    let s = ubx_db::status(&pool).await?;
    println!("db_ok={} has_orders_table={}", s.ok, s.has_orders_table);
    Ok(())
}

pub async fn migrate() -> Result<()> {
    let pool = ubx_db::connect_from_env().await?;
    ubx_db::migrate(&pool).await?;
    println!("migrations_applied=true");
    Ok(())
}
