/// Migrating twice on a clean DB must be idempotent, and the counter row
/// must be seeded exactly once.
///
/// DB-backed test, skipped if UBX_DATABASE_URL is not set.
#[tokio::test]
async fn migrate_idempotent_on_clean_db() -> anyhow::Result<()> {
    let url = match std::env::var(ubx_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: UBX_DATABASE_URL not set");
            return Ok(());
        }
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;

    ubx_db::migrate(&pool).await?;
    ubx_db::migrate(&pool).await?;

    let st = ubx_db::status(&pool).await?;
    assert!(st.ok);
    assert!(st.has_orders_table);

    let (n,): (i64,) = sqlx::query_as("select count(*) from receipt_counters where id = $1")
        .bind(ubx_db::DEFAULT_COUNTER_KEY)
        .fetch_one(&pool)
        .await?;
    assert_eq!(n, 1, "counter row must be seeded once");

    Ok(())
}
