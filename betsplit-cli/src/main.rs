mod commands;
mod config;

use anyhow::Context;
use betsplit_core::{BetSplitError, SessionStore};
use clap::{Parser, Subcommand};
use commands::Shell;
use config::CliConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "betsplit")]
#[command(about = "Split a shared betting pool between its bettors")]
#[command(version)]
struct Cli {
    /// Data directory for session files
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Betting session commands
    #[command(subcommand)]
    Session(commands::SessionCommands),

    /// Bettor commands
    #[command(subcommand)]
    Bettor(commands::BettorCommands),

    /// Bet commands
    #[command(subcommand)]
    Bet(commands::BetCommands),

    /// Calculate the payout for every bettor
    Results(commands::ResultsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "betsplit={},betsplit_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliConfig::load(cli.data_dir).await?;
    let store = SessionStore::new(&config.data_dir).await.with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    let shell = Shell::new(store, config)?;

    let result = match cli.command {
        Commands::Session(cmd) => commands::handle_session_command(cmd, &shell).await,
        Commands::Bettor(cmd) => commands::handle_bettor_command(cmd, &shell).await,
        Commands::Bet(cmd) => commands::handle_bet_command(cmd, &shell).await,
        Commands::Results(args) => commands::handle_results_command(args, &shell).await,
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<BetSplitError>() {
        Some(BetSplitError::InsufficientPool { need, available }) => {
            eprintln!("Error: Not enough funds in the pool");
            eprintln!("Need: {}, Available: {}", need, available);
        }
        Some(BetSplitError::DuplicateName { name }) => {
            eprintln!("Error: Bettor '{}' already exists", name);
        }
        Some(BetSplitError::SessionNotFound { path }) => {
            eprintln!("Error: Session '{}' not found", path.display());
            eprintln!("Use 'betsplit session list' to see saved sessions");
        }
        Some(BetSplitError::NoContributors) => {
            eprintln!("Error: Please add at least one bettor first");
        }
        Some(err) if err.is_validation() => {
            eprintln!("Error: {}", err);
            eprintln!("Nothing was changed.");
        }
        _ => {
            eprintln!("Error: {:#}", e);
        }
    }
}
