use std::collections::VecDeque;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use vessel_risk_engine::builder::{DescriptionConfig, TieredDescriptions};
use vessel_risk_engine::domain::{AggregateOutcome, DateRange};
use vessel_risk_engine::infra::{
    DescriptionSource, PgDescriptionTable, PgRiskStore, PgWatchList, RiskStore,
};
use vessel_risk_engine::providers::{KplerClient, KplerConfig, LloydsClient, LloydsConfig};
use vessel_risk_engine::RiskPipeline;

fn print_help() {
    eprintln!(
        "\
vessel-risk-admin

USAGE:
  vessel-risk-admin <command> [options]

COMMANDS:
  migrate                         Run database migrations
  aggregate <imo>                 Aggregate all sources for a vessel and store the record
  latest <imo>                    Print the most recent stored record
  history <imo>                   Print stored records, newest first

COMMON OPTIONS:
  --database-url <postgres_url>   (defaults to env DATABASE_URL)

aggregate OPTIONS:
  --start <YYYY-MM-DD>            (default: one year before --end)
  --end <YYYY-MM-DD>              (default: today)

history OPTIONS:
  --page <n>                      (default: 1)
  --page-size <n>                 (default: 20)

ENV (providers):
  LLOYDS_API_TOKEN / LLOYDS_BASE_URL / LLOYDS_TIMEOUT_SECS / LLOYDS_MAX_RETRIES
  KPLER_API_TOKEN / KPLER_BASE_URL / KPLER_TIMEOUT_SECS / KPLER_MAX_RETRIES
  DESCRIPTION_CSV_PATH
"
    );
}

fn require_database_url(database_url: Option<String>) -> anyhow::Result<String> {
    database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required (or pass --database-url)"))
}

fn require_value(args: &mut VecDeque<String>, flag: &str) -> anyhow::Result<String> {
    args.pop_front()
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

async fn connect(database_url: Option<String>) -> anyhow::Result<PgPool> {
    let database_url = require_database_url(database_url)?;
    Ok(PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Default)]
struct Options {
    imo: Option<String>,
    database_url: Option<String>,
    start: Option<String>,
    end: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
}

/// Parse the flags shared by every command. Returns `None` on `--help`.
fn parse_options(mut args: VecDeque<String>) -> anyhow::Result<Option<Options>> {
    let mut options = Options::default();
    while let Some(arg) = args.pop_front() {
        match arg.as_str() {
            "--database-url" => options.database_url = Some(require_value(&mut args, &arg)?),
            "--start" => options.start = Some(require_value(&mut args, &arg)?),
            "--end" => options.end = Some(require_value(&mut args, &arg)?),
            "--page" => options.page = Some(require_value(&mut args, &arg)?.parse()?),
            "--page-size" => options.page_size = Some(require_value(&mut args, &arg)?.parse()?),
            "-h" | "--help" => return Ok(None),
            other if other.starts_with("--") => anyhow::bail!("unexpected argument: {other}"),
            other if options.imo.is_none() => options.imo = Some(other.trim().to_string()),
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }
    Ok(Some(options))
}

fn require_imo(options: &Options) -> anyhow::Result<&str> {
    options
        .imo
        .as_deref()
        .filter(|imo| !imo.is_empty())
        .ok_or_else(|| anyhow::anyhow!("an IMO number is required"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args: VecDeque<String> = std::env::args().skip(1).collect();
    let Some(command) = args.pop_front() else {
        print_help();
        return Ok(());
    };

    if matches!(command.as_str(), "-h" | "--help" | "help") {
        print_help();
        return Ok(());
    }

    let Some(options) = parse_options(args)? else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "migrate" => {
            let pool = connect(options.database_url).await?;
            vessel_risk_engine::migrations::run_postgres(&pool).await?;
            println!("ok: migrations applied");
            Ok(())
        }
        "aggregate" => {
            vessel_risk_engine::server::init_tracing();
            let imo = require_imo(&options)?.to_string();
            let range = DateRange::from_optional(options.start.as_deref(), options.end.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;

            let pool = connect(options.database_url).await?;
            let table: Arc<dyn DescriptionSource> = Arc::new(PgDescriptionTable::new(pool.clone()));
            let descriptions =
                TieredDescriptions::from_config(Some(table), &DescriptionConfig::from_env());

            let pipeline = RiskPipeline::new(
                Arc::new(LloydsClient::new(LloydsConfig::from_env())?),
                Arc::new(KplerClient::new(KplerConfig::from_env())?),
                Arc::new(PgWatchList::new(pool.clone())),
                Arc::new(PgRiskStore::new(pool)),
                Arc::new(descriptions),
            );

            let outcome = pipeline.aggregate(&imo, range).await;
            print_json(&outcome)?;
            match outcome {
                AggregateOutcome::Completed {
                    database_saved: false,
                    ..
                } => anyhow::bail!("record computed but not saved"),
                AggregateOutcome::NoData { reason, .. } => anyhow::bail!("no data: {reason}"),
                AggregateOutcome::Completed { .. } => Ok(()),
            }
        }
        "latest" => {
            let imo = require_imo(&options)?;
            let store = PgRiskStore::new(connect(options.database_url.clone()).await?);
            match store.read_latest(imo).await? {
                Some(record) => print_json(&record),
                None => anyhow::bail!("no stored record for {imo}"),
            }
        }
        "history" => {
            let imo = require_imo(&options)?;
            let store = PgRiskStore::new(connect(options.database_url.clone()).await?);
            let records = store
                .read_history(
                    imo,
                    options.page.unwrap_or(1),
                    options.page_size.unwrap_or(20),
                )
                .await?;
            print_json(&records)
        }
        other => {
            print_help();
            anyhow::bail!("unknown command: {other}")
        }
    }
}
