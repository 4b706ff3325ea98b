use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connects to Postgres and applies the bundled migrations.
pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("connect to database")?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    Ok(db)
}
