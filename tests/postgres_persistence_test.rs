//! PostgreSQL persistence layer tests.
//!
//! Tests for the core persistence operations:
//! - RiskStore: append-only writes, latest, paged history
//! - Watch list and description table lookups
//! - Full pipeline against a real database
//!
//! Run with: `cargo test -- --ignored`

mod common;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use uuid::Uuid;

use vessel_risk_engine::builder::{DescriptionConfig, TieredDescriptions};
use vessel_risk_engine::domain::{RiskLevel, VesselStatus};
use vessel_risk_engine::infra::{
    ComponentHealth, DescriptionSource, HealthCheck, PgDescriptionTable, PgRiskStore, PgWatchList,
    RiskStore, WatchList,
};
use vessel_risk_engine::RiskPipeline;

use common::*;

// ============================================================================
// Test Helpers
// ============================================================================

async fn connect_db() -> Option<sqlx::PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .ok()?;
    vessel_risk_engine::migrations::run_postgres(&pool)
        .await
        .ok()?;
    Some(pool)
}

/// IMO unique to one test run so parallel tests do not collide.
fn fresh_imo() -> String {
    let n = Uuid::new_v4().as_u128() % 9_000_000 + 1_000_000;
    n.to_string()
}

async fn pipeline_for(pool: sqlx::PgPool, imo: &str) -> (RiskPipeline, Arc<PgRiskStore>) {
    let store = Arc::new(PgRiskStore::new(pool.clone()));
    let table: Arc<dyn DescriptionSource> = Arc::new(PgDescriptionTable::new(pool.clone()));
    let pipeline = RiskPipeline::new(
        Arc::new(FixtureMaritime::quiet(imo)),
        Arc::new(FixtureTracker::quiet(imo)),
        Arc::new(PgWatchList::new(pool)),
        store.clone(),
        Arc::new(TieredDescriptions::from_config(
            Some(table),
            &DescriptionConfig::default(),
        )),
    );
    (pipeline, store)
}

// ============================================================================
// RiskStore Tests
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_history_is_append_only_and_newest_first() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let imo = fresh_imo();
    let (pipeline, store) = pipeline_for(pool, &imo).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let outcome = pipeline.aggregate(&imo, test_range()).await;
        assert!(outcome.database_saved());
        ids.push(outcome.record().unwrap().record_id);
    }

    let history = store.read_history(&imo, 1, 10).await.unwrap();
    let got: Vec<Uuid> = history.iter().map(|r| r.record_id).collect();
    let expected: Vec<Uuid> = ids.iter().rev().copied().collect();
    assert_eq!(got, expected);

    let page_two = store.read_history(&imo, 2, 2).await.unwrap();
    assert_eq!(page_two.len(), 1);
    assert_eq!(page_two[0].record_id, ids[0]);

    let latest = store.read_latest(&imo).await.unwrap().unwrap();
    assert_eq!(latest.record_id, ids[2]);
    assert_eq!(latest.overall_level(), RiskLevel::None);
    assert_eq!(latest.vessel_status, VesselStatus {
        provider_a_found: true,
        watch_list_listed: false,
        provider_b_found: true,
    });
}

#[tokio::test]
#[ignore]
async fn test_record_round_trips_through_columns() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let imo = fresh_imo();
    let (pipeline, store) = pipeline_for(pool, &imo).await;

    let outcome = pipeline.aggregate(&imo, test_range()).await;
    let written = outcome.record().unwrap().clone();
    let read = store.read_latest(&imo).await.unwrap().unwrap();

    assert_eq!(read.record_id, written.record_id);
    assert_eq!(read.subject_name, written.subject_name);
    assert_eq!(read.date_range, written.date_range);
    assert_eq!(read.verdict, written.verdict);
    assert_eq!(read.provider_errors, written.provider_errors);
}

#[tokio::test]
#[ignore]
async fn test_unknown_subject_has_no_history() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let store = PgRiskStore::new(pool);

    assert!(store.read_latest("0000000").await.unwrap().is_none());
    assert!(store.read_history("0000000", 1, 20).await.unwrap().is_empty());
    assert!(matches!(store.check_health().await, ComponentHealth::Healthy));
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[tokio::test]
#[ignore]
async fn test_watch_list_and_descriptions() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    let imo = fresh_imo();

    sqlx::query(
        "INSERT INTO uani_list (imo, vessel_name, date_added, current_flag) VALUES ($1, $2, $3, $4)",
    )
    .bind(&imo)
    .bind("DARK HORSE")
    .bind("2023-06-01")
    .bind("Cameroon")
    .execute(&pool)
    .await
    .unwrap();

    let risk_type = format!("test_{imo}");
    sqlx::query(
        "INSERT INTO sanctions_des_info (risk_type, risk_level, risk_desc_info, info) VALUES ($1, 'high_risk', $2, $3)",
    )
    .bind(&risk_type)
    .bind("Listed by the watch list")
    .bind("Escalate")
    .execute(&pool)
    .await
    .unwrap();

    let entry = PgWatchList::new(pool.clone()).lookup(&imo).await.unwrap().unwrap();
    assert_eq!(entry.vessel_name.as_deref(), Some("DARK HORSE"));
    assert!(PgWatchList::new(pool.clone()).lookup("0000000").await.unwrap().is_none());

    let table = PgDescriptionTable::new(pool.clone());
    let described = table.describe(&risk_type, RiskLevel::High).await.unwrap().unwrap();
    assert_eq!(described.description, "Listed by the watch list");
    assert!(table.describe(&risk_type, RiskLevel::Medium).await.unwrap().is_none());

    let (pipeline, _) = pipeline_for(pool, &imo).await;
    let outcome = pipeline.aggregate(&imo, test_range()).await;
    let record = outcome.record().unwrap();
    assert!(record.vessel_status.watch_list_listed);
    assert_eq!(record.overall_level(), RiskLevel::High);
}
