//! HTTP server bootstrap for the vessel risk engine.
//!
//! This module wires together:
//! - configuration
//! - the optional database connection pool
//! - provider clients and the aggregation pipeline
//! - the Axum router

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::api::handlers::{health_check, metrics, readiness_check};
use crate::builder::{DescriptionConfig, TieredDescriptions};
use crate::infra::{
    DescriptionSource, HealthCheck, MemoryRiskStore, PgDescriptionTable, PgRiskStore,
    PgWatchList, RiskStore, StaticWatchList, WatchList,
};
use crate::metrics::MetricsRegistry;
use crate::pipeline::RiskPipeline;
use crate::providers::{KplerClient, KplerConfig, LloydsClient, LloydsConfig};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Without one the server keeps records in
    /// memory and has an empty watch list.
    pub database_url: Option<String>,
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Maximum database connections.
    pub max_connections: u32,
    /// Apply embedded migrations at startup.
    pub migrate_on_startup: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("Invalid listen address {host}:{port}"))?;

        let max_connections: u32 = std::env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        let migrate_on_startup = std::env::var("DB_MIGRATE_ON_STARTUP")
            .ok()
            .map(|v| {
                !matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "0" | "false" | "off"
                )
            })
            .unwrap_or(true);

        Ok(Self {
            database_url,
            listen_addr,
            max_connections,
            migrate_on_startup,
        })
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RiskPipeline>,
    pub metrics: Arc<MetricsRegistry>,
    /// Probed by `/ready`; `None` when running without a database.
    pub database: Option<Arc<dyn HealthCheck>>,
}

impl AppState {
    pub fn new(pipeline: Arc<RiskPipeline>) -> Self {
        Self {
            metrics: pipeline.metrics().clone(),
            pipeline,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Arc<dyn HealthCheck>) -> Self {
        self.database = Some(database);
        self
    }
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting vessel risk engine v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Max connections: {}", config.max_connections);

    let lloyds = LloydsConfig::from_env();
    let kpler = KplerConfig::from_env();
    if lloyds.api_token.is_empty() {
        warn!("LLOYDS_API_TOKEN is not set; provider A calls will be rejected");
    }
    if kpler.api_token.is_empty() {
        warn!("KPLER_API_TOKEN is not set; provider B calls will be rejected");
    }
    let maritime = Arc::new(LloydsClient::new(lloyds)?);
    let tracker = Arc::new(KplerClient::new(kpler)?);

    let description_config = DescriptionConfig::from_env();
    let metrics = Arc::new(MetricsRegistry::new());

    let state = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?;
            info!("Connected to PostgreSQL");

            if config.migrate_on_startup {
                info!("Running database migrations...");
                crate::migrations::run_postgres(&pool).await?;
                info!("Database migrations applied");
            } else {
                info!("DB migrations skipped (DB_MIGRATE_ON_STARTUP=0)");
            }

            let store = Arc::new(PgRiskStore::new(pool.clone()));
            let watch_list: Arc<dyn WatchList> = Arc::new(PgWatchList::new(pool.clone()));
            let table: Arc<dyn DescriptionSource> = Arc::new(PgDescriptionTable::new(pool));
            let descriptions = TieredDescriptions::from_config(Some(table), &description_config);

            let pipeline = RiskPipeline::new(
                maritime,
                tracker,
                watch_list,
                store.clone() as Arc<dyn RiskStore>,
                Arc::new(descriptions),
            )
            .with_metrics(metrics);
            AppState::new(Arc::new(pipeline)).with_database(store)
        }
        None => {
            warn!("DATABASE_URL is not set; records are kept in memory only");
            let descriptions = TieredDescriptions::from_config(None, &description_config);
            let pipeline = RiskPipeline::new(
                maritime,
                tracker,
                Arc::new(StaticWatchList::default()),
                Arc::new(MemoryRiskStore::new()),
                Arc::new(descriptions),
            )
            .with_metrics(metrics);
            AppState::new(Arc::new(pipeline))
        }
    };

    let app = build_router()?.with_state(state);

    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("Vessel risk engine is ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();
}

/// Routes for `/api`, the probes and `/metrics`, with request tracing.
pub fn build_router() -> anyhow::Result<Router<AppState>> {
    let mut router = Router::new()
        .nest("/api", crate::api::router())
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router)
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ]),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
