pub mod bet;
pub mod bettor;
pub mod results;
pub mod session;

pub use bet::{handle_bet_command, BetCommands};
pub use bettor::{handle_bettor_command, BettorCommands};
pub use results::{handle_results_command, ResultsArgs};
pub use session::{handle_session_command, SessionCommands};

use crate::config::CliConfig;
use betsplit_core::types::format_percentage;
use betsplit_core::{BettingSession, Money, PayoutCalculator, SessionStore, WagerId};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::{Path, PathBuf};

/// Everything a command needs: where sessions live and how to settle them.
pub struct Shell {
    store: SessionStore,
    config: CliConfig,
    calculator: PayoutCalculator,
}

impl Shell {
    pub fn new(store: SessionStore, config: CliConfig) -> anyhow::Result<Self> {
        let calculator = PayoutCalculator::new(config.settlement.clone())?;
        Ok(Self {
            store,
            config,
            calculator,
        })
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn calculator(&self) -> &PayoutCalculator {
        &self.calculator
    }

    pub fn money(&self, value: Money) -> String {
        self.config.settlement.format(value)
    }

    /// Load a session file by path, file name or stem.
    pub async fn open(&self, reference: &str) -> anyhow::Result<(PathBuf, BettingSession)> {
        let path = self.store.resolve(reference)?;
        let snapshot = self.store.load(&path).await?;
        let session = BettingSession::from_snapshot(&snapshot)?;
        Ok((path, session))
    }

    pub async fn commit(&self, path: &Path, session: &BettingSession) -> anyhow::Result<()> {
        self.store.save(path, &session.snapshot()).await?;
        Ok(())
    }

    pub fn bettors_table(&self, session: &BettingSession) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Name", "Stake", "Percentage"]);

        let ledger = session.contributors();
        for contributor in ledger.contributors() {
            table.add_row(vec![
                contributor.name().to_string(),
                self.money(contributor.stake()),
                format_percentage(ledger.percentage_share(contributor)),
            ]);
        }
        table
    }

    pub fn bets_table(&self, session: &BettingSession) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            "#",
            "Name",
            "Bet",
            "Odds",
            "Stake",
            "Potential Payout",
            "Status",
        ]);

        for (i, wager) in session.wagers().wagers().iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                wager.name().to_string(),
                wager.description().to_string(),
                format!("{:.2}", wager.odds()),
                self.money(wager.stake()),
                self.money(wager.potential_payout()),
                wager.status().to_string(),
            ]);
        }
        table
    }
}

/// Map a 1-based bet position from the bets table to its id.
pub fn wager_at(session: &BettingSession, position: usize) -> anyhow::Result<WagerId> {
    session.wagers().id_at(position).ok_or_else(|| {
        anyhow::anyhow!(
            "No bet at position {}. Use 'betsplit bet list' to see bet numbers",
            position
        )
    })
}
