//! Weather Advisor - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(config.server.level()?)?;

    info!("=== Weather Advisor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Gemini backend: {:?}", config.gemini);

    run_server(config).await?;

    Ok(())
}
