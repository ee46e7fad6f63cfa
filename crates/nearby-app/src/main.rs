//! Nearby discovery - Entry Point
//!
//! Runs one discovery session against the configured service and prints
//! the screen it settles on.

use anyhow::Result;
use clap::Parser;
use nearby_app::{metrics_snapshot, AppConfig, Application, SessionPlan};
use tracing::info;

/// Nearby places, filtered by category, around the device position
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via NEARBY_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Category to select once the screen settles (repeatable, applied in order)
    #[arg(long = "category", value_name = "ID")]
    categories: Vec<String>,

    /// Place whose detail view to open at the end
    #[arg(long, value_name = "PLACE_ID")]
    open: Option<String>,

    /// Print the final screen as JSON
    #[arg(long)]
    json: bool,

    /// Append the session's Prometheus metrics to the output
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    nearby_telemetry::init_logging()?;

    info!("Starting nearby v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > NEARBY_CONFIG env var > default
    let config_path = AppConfig::resolve_path(args.config);
    info!(config_path = %config_path, "Loading configuration");

    let config = AppConfig::load(&config_path)?;
    info!(base_url = %config.api.base_url, "Configuration loaded");

    let app = Application::new(config)?;
    let plan = SessionPlan {
        categories: args.categories,
        open: args.open,
    };
    let report = app.run_session(&plan).await?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }

    if args.metrics {
        print!("{}", metrics_snapshot()?);
    }

    Ok(())
}
