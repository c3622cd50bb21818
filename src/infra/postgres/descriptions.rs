//! Description table (`sanctions_des_info`)

use async_trait::async_trait;
use sqlx::{postgres::PgPool, FromRow};

use crate::domain::{DescriptionEntry, RiskLevel};
use crate::infra::{DescriptionSource, Result};

/// First description tier, read from the database.
pub struct PgDescriptionTable {
    pool: PgPool,
}

impl PgDescriptionTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DescriptionRow {
    risk_desc_info: String,
    info: Option<String>,
}

#[async_trait]
impl DescriptionSource for PgDescriptionTable {
    async fn describe(&self, risk_type: &str, level: RiskLevel) -> Result<Option<DescriptionEntry>> {
        // Levels are stored either as `high` or as the bucket name `high_risk`.
        let spellings = vec![level.as_str().to_string(), level.bucket_name().to_string()];

        let row = sqlx::query_as::<_, DescriptionRow>(
            r#"
            SELECT risk_desc_info, info
            FROM sanctions_des_info
            WHERE risk_type = $1 AND risk_level = ANY($2)
            LIMIT 1
            "#,
        )
        .bind(risk_type)
        .bind(spellings)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| DescriptionEntry {
            description: r.risk_desc_info,
            info: r.info.unwrap_or_default(),
        }))
    }

    fn name(&self) -> &'static str {
        "sanctions_des_info"
    }
}
