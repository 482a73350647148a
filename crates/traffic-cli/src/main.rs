//! `traffic-dash` entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use traffic_analytics::{AnalyticsEngine, DashboardData};
use traffic_cli::{run, Args, Config, LogFormat};
use traffic_ingest::load_dashboard;

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(data_dir) = &args.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(window) = args.window {
        config.rolling_window = window;
    }

    init_tracing(&config);
    info!(
        version = traffic_cli::VERSION,
        data_dir = %config.data_dir.display(),
        "Starting traffic dashboard"
    );

    let parts = load_dashboard(&config.ingest_config())
        .with_context(|| format!("loading datasets from {}", config.data_dir.display()))?;
    let data = DashboardData::new(
        parts.states,
        parts.area_centers,
        parts.airports,
        parts.aircraft_operators,
    )?;
    let engine = AnalyticsEngine::with_settings(data, config.engine_settings());

    let output = run(&engine, &args.command, &args.filter_params(), args.format)?;
    println!("{output}");
    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered view.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
