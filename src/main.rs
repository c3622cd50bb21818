//! Vessel risk engine HTTP server.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vessel_risk_engine::server::run().await
}
