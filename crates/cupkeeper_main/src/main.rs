//! Cupkeeper - tournament Discord bot
//!
//! Keeps team and captain roles in order, opens per-match channels and runs
//! the ban/pick/side draft ritual inside them.

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::info;

mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "cupkeeper.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = config::Config::load(&args.config).await?;

    // Initialize tracing; --debug wins over the configured level
    use tracing_subscriber::{EnvFilter, fmt};

    let level = if args.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::new(format!(
        "cupkeeper_core={level},cupkeeper_discord={level},cupkeeper={level},warn"
    ));

    fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .compact()
        .init();

    info!("Starting Cupkeeper...");
    info!("Config file: {}", args.config);
    info!(guilds = config.guilds.len(), "configuration loaded");

    let mut client = cupkeeper_discord::create_client(config.into_bot_config()).await?;

    tokio::select! {
        result = client.start() => {
            result.into_diagnostic()?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down Cupkeeper...");
        }
    }

    Ok(())
}
