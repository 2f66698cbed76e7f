use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use reflectd::Config;
use reflectd::gateway;

/// Reflection-generation service for the journaling product.
#[derive(Parser)]
#[command(name = "reflectd", version, about)]
struct Cli {
    /// Bind host (default loopback; put a reverse proxy in front for public exposure)
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = Config::from_env();
    gateway::run_gateway(&cli.host, cli.port, config).await
}
