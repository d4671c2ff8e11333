use super::{wager_at, Shell};
use betsplit_core::WagerStatus;
use clap::{Subcommand, ValueEnum};
use dialoguer::Confirm;

#[derive(Subcommand)]
pub enum BetCommands {
    /// Place a bet against the available pool
    Add {
        /// Session file, file name or stem
        session: String,
        /// Bet name
        name: String,
        /// What the bet is on
        description: String,
        /// Decimal odds
        #[arg(short, long)]
        odds: String,
        /// Amount taken from the pool
        #[arg(short, long)]
        stake: String,
    },
    /// List bets
    List {
        /// Session file, file name or stem
        session: String,
    },
    /// Mark a bet as won
    Won {
        /// Session file, file name or stem
        session: String,
        /// Bet number from 'bet list'
        position: usize,
    },
    /// Mark a bet as lost
    Lost {
        /// Session file, file name or stem
        session: String,
        /// Bet number from 'bet list'
        position: usize,
    },
    /// Delete a bet and return its stake to the pool
    Delete {
        /// Session file, file name or stem
        session: String,
        /// Bet number from 'bet list'
        position: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Mark every bet with the same outcome
    ResolveAll {
        /// Session file, file name or stem
        session: String,
        /// Outcome for every bet
        outcome: Outcome,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Outcome {
    Won,
    Lost,
}

impl From<Outcome> for WagerStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => WagerStatus::Won,
            Outcome::Lost => WagerStatus::Lost,
        }
    }
}

pub async fn handle_bet_command(cmd: BetCommands, shell: &Shell) -> anyhow::Result<()> {
    match cmd {
        BetCommands::Add {
            session: reference,
            name,
            description,
            odds,
            stake,
        } => {
            let (path, mut session) = shell.open(&reference).await?;
            if session.contributors().is_empty() {
                return Err(betsplit_core::BetSplitError::NoContributors.into());
            }

            let id = session.add_wager(&name, &description, &odds, &stake)?;
            shell.commit(&path, &session).await?;

            if let Some(wager) = session.wagers().get(id) {
                println!("Placed bet '{}'", wager.name());
                println!(
                    "  Stake: {}  Odds: {:.2}  Potential Payout: {}",
                    shell.money(wager.stake()),
                    wager.odds(),
                    shell.money(wager.potential_payout())
                );
            }
            println!("Available Pool: {}", shell.money(session.available_pool()));
        }

        BetCommands::List { session: reference } => {
            let (_, session) = shell.open(&reference).await?;

            if session.wagers().is_empty() {
                println!("No bets yet.");
            } else {
                println!("{}", shell.bets_table(&session));
            }
            println!("Available Pool: {}", shell.money(session.available_pool()));
        }

        BetCommands::Won {
            session: reference,
            position,
        } => mark(shell, &reference, position, WagerStatus::Won).await?,

        BetCommands::Lost {
            session: reference,
            position,
        } => mark(shell, &reference, position, WagerStatus::Lost).await?,

        BetCommands::Delete {
            session: reference,
            position,
            force,
        } => {
            let (path, mut session) = shell.open(&reference).await?;
            let id = wager_at(&session, position)?;

            if !force {
                let name = session
                    .wagers()
                    .get(id)
                    .map(|w| w.name().to_string())
                    .unwrap_or_default();
                let confirm = Confirm::new()
                    .with_prompt(format!("Delete bet #{} '{}'?", position, name))
                    .default(false)
                    .interact()?;

                if !confirm {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            let removed = session.delete_wager(id)?;
            shell.commit(&path, &session).await?;

            println!(
                "Deleted bet '{}', {} returned to the pool",
                removed.name(),
                shell.money(removed.stake())
            );
            println!("Available Pool: {}", shell.money(session.available_pool()));
        }

        BetCommands::ResolveAll {
            session: reference,
            outcome,
        } => {
            let (path, mut session) = shell.open(&reference).await?;
            let status = WagerStatus::from(outcome);
            session.set_all_statuses(status)?;
            shell.commit(&path, &session).await?;

            println!("Marked {} bet(s) as {}", session.wagers().len(), status);
        }
    }

    Ok(())
}

async fn mark(
    shell: &Shell,
    reference: &str,
    position: usize,
    status: WagerStatus,
) -> anyhow::Result<()> {
    let (path, mut session) = shell.open(reference).await?;
    let id = wager_at(&session, position)?;
    session.set_status(id, status)?;
    shell.commit(&path, &session).await?;

    let pending = session.wagers().pending_count();
    println!("Bet #{} marked as {}", position, status);
    if pending > 0 {
        println!("{} bet(s) still pending", pending);
    }
    Ok(())
}
