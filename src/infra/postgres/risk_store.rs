//! PostgreSQL risk record history
//!
//! Append-only: every aggregation inserts a new `vessel_risk_history` row.
//! List and map fields are stored as JSON text columns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPool, FromRow};
use uuid::Uuid;

use crate::domain::{
    AggregateVerdict, DisplayGroupVerdict, LevelBuckets, ProviderErrorNote, RiskLevel, RiskRecord,
    VesselStatus,
};
use crate::infra::{ComponentHealth, HealthCheck, Result, RiskError, RiskStore};

/// Largest page a history read will return.
pub const MAX_PAGE_SIZE: u32 = 200;

/// PostgreSQL-backed risk store
pub struct PgRiskStore {
    pool: PgPool,
}

impl PgRiskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create from connection string
    pub async fn from_url(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_text<T: serde::Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn from_text<T: serde::de::DeserializeOwned>(column: &str, text: &str) -> Result<T> {
    serde_json::from_str(text)
        .map_err(|e| RiskError::Persistence(format!("corrupt {column} column: {e}")))
}

#[async_trait]
impl RiskStore for PgRiskStore {
    async fn write(&self, record: &RiskRecord) -> Result<()> {
        let row = RiskRow::from_record(record)?;

        sqlx::query(
            r#"
            INSERT INTO vessel_risk_history (
                record_id, vessel_imo, vessel_name, vessel_type, flag,
                date_range, overall_level,
                high_risk, mid_risk, no_risk, stakeholder,
                provider_errors, vessel_status,
                request_time, response_time
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(row.record_id)
        .bind(&row.vessel_imo)
        .bind(&row.vessel_name)
        .bind(&row.vessel_type)
        .bind(&row.flag)
        .bind(&row.date_range)
        .bind(&row.overall_level)
        .bind(&row.high_risk)
        .bind(&row.mid_risk)
        .bind(&row.no_risk)
        .bind(&row.stakeholder)
        .bind(&row.provider_errors)
        .bind(&row.vessel_status)
        .bind(row.request_time)
        .bind(row.response_time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn read_latest(&self, subject_id: &str) -> Result<Option<RiskRecord>> {
        Ok(self
            .read_history(subject_id, 1, 1)
            .await?
            .into_iter()
            .next())
    }

    async fn read_history(
        &self,
        subject_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<RiskRecord>> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let offset = (page.max(1) - 1) as i64 * page_size as i64;

        let rows = sqlx::query_as::<_, RiskRow>(
            r#"
            SELECT record_id, vessel_imo, vessel_name, vessel_type, flag,
                   date_range, overall_level,
                   high_risk, mid_risk, no_risk, stakeholder,
                   provider_errors, vessel_status,
                   request_time, response_time
            FROM vessel_risk_history
            WHERE vessel_imo = $1
            ORDER BY seq DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(subject_id)
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(RiskRow::into_record).collect()
    }
}

#[async_trait]
impl HealthCheck for PgRiskStore {
    async fn check_health(&self) -> ComponentHealth {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => ComponentHealth::Healthy,
            Err(e) => ComponentHealth::Unhealthy {
                reason: e.to_string(),
            },
        }
    }
}

/// Raw row from vessel_risk_history
#[derive(Debug, FromRow)]
struct RiskRow {
    record_id: Uuid,
    vessel_imo: String,
    vessel_name: String,
    vessel_type: Option<String>,
    flag: Option<String>,
    date_range: String,
    overall_level: String,
    high_risk: String,
    mid_risk: String,
    no_risk: String,
    stakeholder: Option<String>,
    provider_errors: String,
    vessel_status: String,
    request_time: DateTime<Utc>,
    response_time: DateTime<Utc>,
}

impl RiskRow {
    fn from_record(record: &RiskRecord) -> Result<Self> {
        let buckets = &record.verdict.by_level;
        Ok(Self {
            record_id: record.record_id,
            vessel_imo: record.subject_id.clone(),
            vessel_name: record.subject_name.clone(),
            vessel_type: record.vessel_type.clone(),
            flag: record.flag.clone(),
            date_range: record.date_range.clone(),
            overall_level: record.verdict.overall_level.as_str().to_string(),
            high_risk: to_text(&buckets.high_risk)?,
            mid_risk: to_text(&buckets.mid_risk)?,
            no_risk: to_text(&buckets.no_risk)?,
            stakeholder: Some(to_text(&record.verdict.stakeholder)?),
            provider_errors: to_text(&record.provider_errors)?,
            vessel_status: to_text(&record.vessel_status)?,
            request_time: record.request_time,
            response_time: record.response_time,
        })
    }

    fn into_record(self) -> Result<RiskRecord> {
        let overall_level: RiskLevel = self
            .overall_level
            .parse()
            .map_err(RiskError::Persistence)?;
        let stakeholder: Option<DisplayGroupVerdict> = match self.stakeholder.as_deref() {
            Some(text) => from_text("stakeholder", text)?,
            None => None,
        };
        let provider_errors: Vec<ProviderErrorNote> =
            from_text("provider_errors", &self.provider_errors)?;
        let vessel_status: VesselStatus = from_text("vessel_status", &self.vessel_status)?;

        Ok(RiskRecord {
            record_id: self.record_id,
            subject_id: self.vessel_imo.clone(),
            subject_name: self.vessel_name,
            vessel_type: self.vessel_type,
            flag: self.flag,
            date_range: self.date_range,
            verdict: AggregateVerdict {
                subject_id: self.vessel_imo,
                overall_level,
                by_level: LevelBuckets {
                    high_risk: from_text("high_risk", &self.high_risk)?,
                    mid_risk: from_text("mid_risk", &self.mid_risk)?,
                    no_risk: from_text("no_risk", &self.no_risk)?,
                },
                stakeholder,
            },
            provider_errors,
            vessel_status,
            request_time: self.request_time,
            response_time: self.response_time,
        })
    }
}
