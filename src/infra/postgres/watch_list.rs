//! UANI watch list lookups

use async_trait::async_trait;
use sqlx::{postgres::PgPool, FromRow};

use crate::domain::WatchListEntry;
use crate::infra::{Result, WatchList};

/// Watch list backed by the `uani_list` table
pub struct PgWatchList {
    pool: PgPool,
}

impl PgWatchList {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct WatchListRow {
    imo: String,
    vessel_name: Option<String>,
    date_added: Option<String>,
    current_flag: Option<String>,
    former_flags: Option<String>,
}

#[async_trait]
impl WatchList for PgWatchList {
    async fn lookup(&self, imo: &str) -> Result<Option<WatchListEntry>> {
        let row = sqlx::query_as::<_, WatchListRow>(
            r#"
            SELECT imo, vessel_name, date_added, current_flag, former_flags
            FROM uani_list
            WHERE imo = $1
            LIMIT 1
            "#,
        )
        .bind(imo.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| WatchListEntry {
            imo: r.imo,
            vessel_name: r.vessel_name,
            date_added: r.date_added,
            current_flag: r.current_flag,
            former_flags: r.former_flags,
        }))
    }
}
