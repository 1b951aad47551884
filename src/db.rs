use sqlx::MySqlPool;

/// Connect and bring the schema up to date. Migrations are embedded at
/// compile time from `migrations/`.
pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}
