use anyhow::Result;
use shawty::config::{self, Config};
use shawty::server;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = config::load_from_env()?;
    init_tracing(&config);

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!(".env file not found, using process environment"),
        Err(e) => warn!("Failed to load .env file: {e}"),
    }

    config.print_summary();

    if let Err(e) = server::run(config).await {
        error!("Server terminated: {e:#}");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
