use clap::Parser;
use tracing_subscriber::EnvFilter;

use replat_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Best effort: a missing .env is fine, the environment may already be set.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    replat_cli::run(Cli::parse()).await
}
