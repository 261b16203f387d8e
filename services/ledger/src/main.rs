use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledger::{AppState, config::AppConfig, routes};

/// Family finance ledger and allocation planner
#[derive(Parser)]
#[command(name = "ledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,

    /// Print the allocation report for a snapshot file
    Report {
        /// Path to the snapshot JSON file
        input: PathBuf,
        /// Print the computed figures as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Report { input, json } => report(&input, json),
    }
}

async fn serve() -> Result<()> {
    info!("Starting ledger service");

    let config = AppConfig::from_env()?;
    let state = AppState::from_config(&config).await?;

    if common::database::health_check(state.store.pool()).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let purged = state.store.purge_expired_sessions().await?;
    info!("Ledger service initialized successfully ({} expired sessions purged)", purged);

    let app = routes::create_router(state);

    let address = config.server.bind_address()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Ledger service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

fn report(input: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read snapshot {}", input.display()))?;
    let snapshot = planner::parse_snapshot(&raw)
        .with_context(|| format!("Invalid snapshot {}", input.display()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&planner::summarize(&snapshot))?
        );
    } else {
        println!("{}", planner::render_report(&snapshot));
    }

    Ok(())
}
