use super::Shell;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum BettorCommands {
    /// Add a bettor and their stake to the pool
    Add {
        /// Session file, file name or stem
        session: String,
        /// Bettor name
        name: String,
        /// Amount paid into the pool
        stake: String,
    },
    /// List bettors and their share of the pool
    List {
        /// Session file, file name or stem
        session: String,
    },
}

pub async fn handle_bettor_command(cmd: BettorCommands, shell: &Shell) -> anyhow::Result<()> {
    match cmd {
        BettorCommands::Add {
            session: reference,
            name,
            stake,
        } => {
            let (path, mut session) = shell.open(&reference).await?;
            session.add_contributor(&name, &stake)?;
            shell.commit(&path, &session).await?;

            println!("Added bettor '{}'", name.trim());
            println!("Total Pool: {}", shell.money(session.total_pool()));
        }

        BettorCommands::List { session: reference } => {
            let (_, session) = shell.open(&reference).await?;

            if session.contributors().is_empty() {
                println!("No bettors yet.");
                println!("Add one with: betsplit bettor add {} <name> <stake>", reference);
                return Ok(());
            }

            println!("{}", shell.bettors_table(&session));
            println!("Total Pool: {}", shell.money(session.total_pool()));
        }
    }

    Ok(())
}
