//! Session snapshots and the owner of a live session's ledgers.

use crate::error::{BetSplitError, Result};
use crate::ledger::{ContributorLedger, Wager, WagerLedger};
use crate::payout::{PayoutCalculator, SettlementReport};
use crate::types::{Money, WagerId, WagerStatus};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Persisted form of a betting session.
///
/// Money fields are written as exact JSON numbers, so a saved session loads
/// back with the same digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: String,
    pub event: String,
    #[serde(default)]
    pub bettors: Vec<BettorRecord>,
    #[serde(default)]
    pub bets: Vec<BetRecord>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    pub total_pool: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettorRecord {
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub odds: Money,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub stake: Money,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub potential_payout: Money,
    pub status: WagerStatus,
}

impl From<&Wager> for BetRecord {
    fn from(wager: &Wager) -> Self {
        Self {
            name: wager.name().to_string(),
            description: wager.description().to_string(),
            odds: wager.odds(),
            stake: wager.stake(),
            potential_payout: wager.potential_payout(),
            status: wager.status(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub date: String,
    pub event: String,
}

impl SessionMeta {
    /// Metadata for a session starting now.
    pub fn new(event: &str) -> Result<Self> {
        let event = event.trim();
        if event.is_empty() {
            return Err(BetSplitError::invalid_field("An event name is required"));
        }
        Ok(Self {
            date: Local::now().format(DATE_FORMAT).to_string(),
            event: event.to_string(),
        })
    }
}

pub fn to_session(
    contributors: &ContributorLedger,
    wagers: &WagerLedger,
    meta: &SessionMeta,
) -> Session {
    Session {
        date: meta.date.clone(),
        event: meta.event.clone(),
        bettors: contributors
            .contributors()
            .iter()
            .map(|c| BettorRecord {
                name: c.name().to_string(),
                stake: c.stake(),
            })
            .collect(),
        bets: wagers.wagers().iter().map(BetRecord::from).collect(),
        total_pool: contributors.total_pool(),
    }
}

/// Rebuild both ledgers from a snapshot, re-running every validation.
///
/// Cached figures in the snapshot (`total_pool`, `potential_payout`) are
/// recomputed rather than trusted.
pub fn from_session(session: &Session) -> Result<(ContributorLedger, WagerLedger)> {
    let mut contributors = ContributorLedger::new();
    for (i, bettor) in session.bettors.iter().enumerate() {
        contributors
            .add(&bettor.name, bettor.stake)
            .map_err(|e| BetSplitError::malformed(format!("bettor #{}: {}", i + 1, e)))?;
    }

    if contributors.total_pool() != session.total_pool {
        tracing::warn!(
            "Session '{}' records total pool {}, bettors add up to {}; using {}",
            session.event,
            session.total_pool,
            contributors.total_pool(),
            contributors.total_pool()
        );
    }

    let mut wagers = WagerLedger::new();
    for (i, bet) in session.bets.iter().enumerate() {
        let id = wagers
            .add_wager(&contributors, &bet.name, &bet.description, bet.odds, bet.stake)
            .map_err(|e| BetSplitError::malformed(format!("bet #{}: {}", i + 1, e)))?
            .id();
        wagers.restore_status(id, bet.status)?;

        if let Some(wager) = wagers.get(id) {
            if wager.potential_payout() != bet.potential_payout {
                tracing::warn!(
                    "Bet '{}' records potential payout {}, stake x odds is {}; using {}",
                    bet.name,
                    bet.potential_payout,
                    wager.potential_payout(),
                    wager.potential_payout()
                );
            }
        }
    }

    Ok((contributors, wagers))
}

/// Sole owner of one session's ledgers.
#[derive(Debug, Clone)]
pub struct BettingSession {
    meta: SessionMeta,
    contributors: ContributorLedger,
    wagers: WagerLedger,
}

impl BettingSession {
    pub fn new(event: &str) -> Result<Self> {
        let meta = SessionMeta::new(event)?;
        tracing::info!("Started betting session '{}'", meta.event);
        Ok(Self {
            meta,
            contributors: ContributorLedger::new(),
            wagers: WagerLedger::new(),
        })
    }

    pub fn from_snapshot(session: &Session) -> Result<Self> {
        let (contributors, wagers) = from_session(session)?;
        Ok(Self {
            meta: SessionMeta {
                date: session.date.clone(),
                event: session.event.clone(),
            },
            contributors,
            wagers,
        })
    }

    /// Replace this session with a snapshot. On error the current state is kept.
    pub fn restore(&mut self, session: &Session) -> Result<()> {
        *self = Self::from_snapshot(session)?;
        Ok(())
    }

    pub fn snapshot(&self) -> Session {
        to_session(&self.contributors, &self.wagers, &self.meta)
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn contributors(&self) -> &ContributorLedger {
        &self.contributors
    }

    pub fn wagers(&self) -> &WagerLedger {
        &self.wagers
    }

    pub fn total_pool(&self) -> Money {
        self.contributors.total_pool()
    }

    pub fn available_pool(&self) -> Money {
        self.wagers.available_pool(&self.contributors)
    }

    pub fn add_contributor(&mut self, name: &str, stake: &str) -> Result<()> {
        self.contributors.add_parsed(name, stake).map(|_| ())
    }

    pub fn add_wager(
        &mut self,
        name: &str,
        description: &str,
        odds: &str,
        stake: &str,
    ) -> Result<WagerId> {
        self.wagers
            .add_wager_parsed(&self.contributors, name, description, odds, stake)
            .map(|w| w.id())
    }

    pub fn set_status(&mut self, id: WagerId, status: WagerStatus) -> Result<()> {
        self.wagers.set_status(id, status)
    }

    pub fn set_all_statuses(&mut self, status: WagerStatus) -> Result<()> {
        self.wagers.set_all_statuses(status)
    }

    pub fn delete_wager(&mut self, id: WagerId) -> Result<Wager> {
        self.wagers.delete(id)
    }

    pub fn calculate(&self, calculator: &PayoutCalculator) -> Result<SettlementReport> {
        calculator.calculate(&self.contributors, &self.wagers)
    }
}
