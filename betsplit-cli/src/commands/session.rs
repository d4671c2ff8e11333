use super::Shell;
use betsplit_core::BettingSession;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a new betting session
    New {
        /// Betting event name
        event: String,
    },
    /// List saved sessions
    List,
    /// Show bettors and bets of a session
    Show {
        /// Session file, file name or stem
        session: String,
    },
}

pub async fn handle_session_command(cmd: SessionCommands, shell: &Shell) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::New { event } => {
            let session = BettingSession::new(&event)?;
            let path = shell.store().create(&session.snapshot()).await?;

            println!("Started session '{}'", session.meta().event);
            println!("  Date: {}", session.meta().date);
            println!("  File: {}", path.display());
            println!();
            println!("Add bettors with:");
            println!(
                "betsplit bettor add {} <name> <stake>",
                path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
            );
        }

        SessionCommands::List => {
            let sessions = shell.store().list().await?;

            if sessions.is_empty() {
                println!("No sessions found in {}.", shell.store().data_dir().display());
                println!("Start one with: betsplit session new <event>");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Session", "Event", "Date", "Bettors", "Bets", "Pool"]);

            for summary in sessions {
                let stem = summary
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
                table.add_row(vec![
                    stem,
                    summary.event,
                    summary.date,
                    summary.bettors.to_string(),
                    summary.bets.to_string(),
                    shell.money(summary.total_pool),
                ]);
            }

            println!("{}", table);
        }

        SessionCommands::Show { session } => {
            let (path, session) = shell.open(&session).await?;

            println!("Session: {}", session.meta().event);
            println!("  Date: {}", session.meta().date);
            println!("  File: {}", path.display());
            println!();

            if session.contributors().is_empty() {
                println!("No bettors yet.");
            } else {
                println!("Bettors:");
                println!("{}", shell.bettors_table(&session));
            }
            println!("Total Pool: {}", shell.money(session.total_pool()));
            println!();

            if session.wagers().is_empty() {
                println!("No bets yet.");
            } else {
                println!("Bets:");
                println!("{}", shell.bets_table(&session));
            }
            println!("Available Pool: {}", shell.money(session.available_pool()));
        }
    }

    Ok(())
}
