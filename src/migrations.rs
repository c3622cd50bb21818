//! Database migrations.
//!
//! Uses SQLx embedded migrations for the Postgres record history.

use sqlx::PgPool;

static POSTGRES_MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("migrations/postgres");

pub async fn run_postgres(pool: &PgPool) -> anyhow::Result<()> {
    POSTGRES_MIGRATOR.run(pool).await?;
    Ok(())
}
