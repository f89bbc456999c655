use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use experience_engine::aggregator::{BatchReport, ExperienceAggregator, PersonOutcome};
use experience_engine::api::{AppState, create_router};
use experience_engine::config::ConfigLoader;
use experience_engine::error::EngineError;
use experience_engine::logging;
use experience_engine::models::NationalId;

/// Exit code when the engine could not even start (config or data files).
const EXIT_SETUP_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "experience-engine")]
#[command(about = "Consolidates form and historical work intervals into experience summaries")]
struct Cli {
    /// Path to the engine configuration file.
    #[arg(long, global = true, default_value = "./config/engine.yaml")]
    config: PathBuf,

    #[arg(long, global = true, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recompute the summary of every known person.
    RecomputeAll,
    /// Recompute the summary of one person.
    RecomputeOne {
        #[arg(long)]
        person_id: String,
    },
    /// Print the historical-ledger-only summary of one person.
    HistoricalSummary {
        #[arg(long)]
        person_id: String,
    },
    /// Serve the HTTP API.
    Serve {
        /// Overrides the configured bind address.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    tracing::debug!(config = %cli.config.display(), "Starting experience-engine");

    let config = match ConfigLoader::load(&cli.config) {
        Ok(config) => config,
        Err(e) => return setup_failure(e),
    };

    let aggregator = match ExperienceAggregator::from_config(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => return setup_failure(e),
    };

    match cli.command {
        Command::RecomputeAll => match aggregator.recompute_all() {
            Ok(report) => finish(&report),
            Err(e) => setup_failure(e),
        },
        Command::RecomputeOne { person_id } => {
            let id = NationalId::from(person_id);
            let report = BatchReport {
                outcomes: vec![PersonOutcome {
                    person_id: id.canonical(),
                    result: aggregator.recompute_experience(&id),
                }],
            };
            finish(&report)
        }
        Command::HistoricalSummary { person_id } => {
            let id = NationalId::from(person_id);
            match aggregator.historical_summary(&id) {
                Ok(summary) if summary.has_records => {
                    println!(
                        "{}: {} contracts, {} days ({})",
                        id, summary.count, summary.total_days, summary.display_text
                    );
                    ExitCode::SUCCESS
                }
                Ok(_) => {
                    println!("{}: no historical records", id);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}: {}", id, e);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Serve { bind } => {
            let address = bind.unwrap_or_else(|| config.bind_address().to_string());
            serve(aggregator, &address).await
        }
    }
}

fn setup_failure(error: EngineError) -> ExitCode {
    tracing::error!(error = %error, "Engine setup failed");
    eprintln!("error: {}", error);
    ExitCode::from(EXIT_SETUP_FAILURE)
}

/// Prints one line per person and the final counts.
fn finish(report: &BatchReport) -> ExitCode {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(summary) => println!(
                "[ok] {}: {} ({} days)",
                outcome.person_id, summary.display_text, summary.total_days
            ),
            Err(e) => println!("[failed] {}: {}", outcome.person_id, e),
        }
    }

    println!(
        "processed: {}, succeeded: {}, failed: {}",
        report.processed(),
        report.succeeded(),
        report.failed()
    );

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn serve(aggregator: ExperienceAggregator, address: &str) -> ExitCode {
    let router = create_router(AppState::new(aggregator));

    let listener = match tokio::net::TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address, error = %e, "Failed to bind");
            eprintln!("error: cannot bind {}: {}", address, e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };

    tracing::info!(address, "Serving experience API");
    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
