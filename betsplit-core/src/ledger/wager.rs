use crate::error::{BetSplitError, Result};
use crate::ledger::ContributorLedger;
use crate::types::{parse_decimal, Money, WagerId, WagerStatus};
use rust_decimal::Decimal;

/// A bet placed with money reserved from the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wager {
    id: WagerId,
    name: String,
    description: String,
    odds: Decimal,
    stake: Money,
    potential_payout: Money,
    status: WagerStatus,
}

impl Wager {
    pub fn id(&self) -> WagerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn odds(&self) -> Decimal {
        self.odds
    }

    pub fn stake(&self) -> Money {
        self.stake
    }

    /// `stake * odds`, fixed when the wager was placed.
    pub fn potential_payout(&self) -> Money {
        self.potential_payout
    }

    pub fn status(&self) -> WagerStatus {
        self.status
    }
}

/// The bets placed against a session's pool.
///
/// Every wager keeps its stake reserved whatever its status; only
/// [`WagerLedger::delete`] returns the stake to the available pool.
#[derive(Debug, Clone, Default)]
pub struct WagerLedger {
    wagers: Vec<Wager>,
}

impl WagerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stake currently held by wagers in the ledger.
    pub fn reserved_stake(&self) -> Money {
        self.wagers.iter().map(|w| w.stake).sum()
    }

    pub fn available_pool(&self, contributors: &ContributorLedger) -> Money {
        contributors.total_pool() - self.reserved_stake()
    }

    /// Place a new pending wager. Nothing is changed unless every check passes.
    pub fn add_wager(
        &mut self,
        contributors: &ContributorLedger,
        name: &str,
        description: &str,
        odds: Decimal,
        stake: Money,
    ) -> Result<&Wager> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(BetSplitError::invalid_field("Please fill in all fields"));
        }

        if odds <= Decimal::ZERO {
            return Err(BetSplitError::invalid_odds("Odds must be greater than 0"));
        }

        if stake <= Decimal::ZERO {
            return Err(BetSplitError::invalid_stake("Stake must be greater than 0"));
        }

        let available = self.available_pool(contributors);
        if stake > available {
            tracing::debug!(
                "Rejected bet '{}': stake {} exceeds available {}",
                name,
                stake,
                available
            );
            return Err(BetSplitError::InsufficientPool {
                need: stake,
                available,
            });
        }

        let potential_payout = stake.checked_mul(odds).ok_or_else(|| {
            BetSplitError::invalid_odds(format!(
                "Stake {} at odds {} pays out more than the largest supported amount",
                stake, odds
            ))
        })?;

        let wager = Wager {
            id: WagerId::new(),
            name: name.to_string(),
            description: description.to_string(),
            odds,
            stake,
            potential_payout,
            status: WagerStatus::Pending,
        };

        tracing::info!(
            "Placed bet '{}' ({}): stake {} at odds {}, potential payout {}",
            wager.name,
            wager.id,
            wager.stake,
            wager.odds,
            wager.potential_payout
        );

        self.wagers.push(wager);
        Ok(&self.wagers[self.wagers.len() - 1])
    }

    /// Place a new wager from raw text input.
    pub fn add_wager_parsed(
        &mut self,
        contributors: &ContributorLedger,
        name: &str,
        description: &str,
        odds: &str,
        stake: &str,
    ) -> Result<&Wager> {
        let odds = parse_decimal(odds)
            .ok_or_else(|| BetSplitError::invalid_odds("Please enter valid odds"))?;
        let stake = parse_decimal(stake)
            .ok_or_else(|| BetSplitError::invalid_stake("Please enter a valid stake amount"))?;
        self.add_wager(contributors, name, description, odds, stake)
    }

    /// Mark a wager as won or lost. Re-marking overwrites the previous outcome.
    pub fn set_status(&mut self, id: WagerId, status: WagerStatus) -> Result<()> {
        ensure_resolution(status)?;

        let wager = self
            .wagers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(BetSplitError::NotFound(id))?;

        if wager.status != status {
            tracing::info!("Bet '{}' marked {} (was {})", wager.name, status, wager.status);
        }
        wager.status = status;
        Ok(())
    }

    /// Mark every wager with the same outcome.
    pub fn set_all_statuses(&mut self, status: WagerStatus) -> Result<()> {
        ensure_resolution(status)?;

        let ids: Vec<WagerId> = self.wagers.iter().map(|w| w.id).collect();
        for id in ids {
            self.set_status(id, status)?;
        }

        tracing::info!("Marked all {} bets {}", self.wagers.len(), status);
        Ok(())
    }

    /// Remove a wager, returning its stake to the available pool.
    pub fn delete(&mut self, id: WagerId) -> Result<Wager> {
        let position = self
            .wagers
            .iter()
            .position(|w| w.id == id)
            .ok_or(BetSplitError::NotFound(id))?;

        let wager = self.wagers.remove(position);
        tracing::info!("Deleted bet '{}', released stake {}", wager.name, wager.stake);
        Ok(wager)
    }

    /// Restore a wager's recorded outcome, including `Pending`.
    pub(crate) fn restore_status(&mut self, id: WagerId, status: WagerStatus) -> Result<()> {
        let wager = self
            .wagers
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(BetSplitError::NotFound(id))?;
        wager.status = status;
        Ok(())
    }

    pub fn get(&self, id: WagerId) -> Option<&Wager> {
        self.wagers.iter().find(|w| w.id == id)
    }

    /// Id of the wager at a 1-based display position.
    pub fn id_at(&self, position: usize) -> Option<WagerId> {
        position
            .checked_sub(1)
            .and_then(|index| self.wagers.get(index))
            .map(|w| w.id)
    }

    pub fn wagers(&self) -> &[Wager] {
        &self.wagers
    }

    pub fn pending_count(&self) -> usize {
        self.wagers
            .iter()
            .filter(|w| !w.status.is_resolved())
            .count()
    }

    pub fn len(&self) -> usize {
        self.wagers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wagers.is_empty()
    }
}

fn ensure_resolution(status: WagerStatus) -> Result<()> {
    if status.is_resolved() {
        Ok(())
    } else {
        Err(BetSplitError::invalid_field(
            "A bet can only be marked Won or Lost",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pool_of(stakes: &[(&str, Decimal)]) -> ContributorLedger {
        let mut contributors = ContributorLedger::new();
        for (name, stake) in stakes {
            contributors.add(name, *stake).unwrap();
        }
        contributors
    }

    #[test]
    fn test_add_wager_reserves_stake() {
        let contributors = pool_of(&[("A", dec!(100)), ("B", dec!(200))]);
        let mut wagers = WagerLedger::new();

        let wager = wagers
            .add_wager(&contributors, "Final", "Home win", dec!(2), dec!(150))
            .unwrap();
        assert_eq!(wager.potential_payout(), dec!(300));
        assert_eq!(wager.status(), WagerStatus::Pending);
        assert_eq!(wagers.available_pool(&contributors), dec!(150));
    }

    #[test]
    fn test_insufficient_pool_leaves_ledger_unchanged() {
        let contributors = pool_of(&[("A", dec!(100))]);
        let mut wagers = WagerLedger::new();
        wagers
            .add_wager(&contributors, "One", "first", dec!(1.5), dec!(60))
            .unwrap();

        let err = wagers
            .add_wager(&contributors, "Two", "second", dec!(3), dec!(40.01))
            .unwrap_err();
        match err {
            BetSplitError::InsufficientPool { need, available } => {
                assert_eq!(need, dec!(40.01));
                assert_eq!(available, dec!(40));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(wagers.len(), 1);
        assert_eq!(wagers.available_pool(&contributors), dec!(40));

        // exactly the remaining balance is allowed
        wagers
            .add_wager(&contributors, "Two", "second", dec!(3), dec!(40))
            .unwrap();
        assert_eq!(wagers.available_pool(&contributors), Decimal::ZERO);
    }

    #[test]
    fn test_rejects_invalid_fields() {
        let contributors = pool_of(&[("A", dec!(100))]);
        let mut wagers = WagerLedger::new();

        assert!(matches!(
            wagers.add_wager(&contributors, "", "desc", dec!(2), dec!(10)),
            Err(BetSplitError::InvalidField(_))
        ));
        assert!(matches!(
            wagers.add_wager(&contributors, "name", "  ", dec!(2), dec!(10)),
            Err(BetSplitError::InvalidField(_))
        ));
        assert!(matches!(
            wagers.add_wager(&contributors, "name", "desc", dec!(0), dec!(10)),
            Err(BetSplitError::InvalidOdds(_))
        ));
        assert!(matches!(
            wagers.add_wager(&contributors, "name", "desc", dec!(2), dec!(-1)),
            Err(BetSplitError::InvalidStake(_))
        ));
        assert!(matches!(
            wagers.add_wager_parsed(&contributors, "name", "desc", "x", "10"),
            Err(BetSplitError::InvalidOdds(_))
        ));
        assert!(wagers.is_empty());
    }

    #[test]
    fn test_payout_overflow_is_rejected() {
        let contributors = pool_of(&[("A", dec!(50000000000000000000000000000))]);
        let mut wagers = WagerLedger::new();

        let err = wagers
            .add_wager(
                &contributors,
                "Long shot",
                "desc",
                dec!(2),
                dec!(50000000000000000000000000000),
            )
            .unwrap_err();
        assert!(matches!(err, BetSplitError::InvalidOdds(_)));
        assert!(wagers.is_empty());
        assert_eq!(
            wagers.available_pool(&contributors),
            dec!(50000000000000000000000000000)
        );
    }

    #[test]
    fn test_status_does_not_release_stake() {
        let contributors = pool_of(&[("A", dec!(100))]);
        let mut wagers = WagerLedger::new();
        let id = wagers
            .add_wager(&contributors, "Bet", "desc", dec!(2), dec!(70))
            .unwrap()
            .id();

        wagers.set_status(id, WagerStatus::Lost).unwrap();
        assert_eq!(wagers.available_pool(&contributors), dec!(30));
        assert!(matches!(
            wagers.add_wager(&contributors, "Next", "desc", dec!(2), dec!(50)),
            Err(BetSplitError::InsufficientPool { .. })
        ));

        // re-marking is allowed in either direction
        wagers.set_status(id, WagerStatus::Won).unwrap();
        wagers.set_status(id, WagerStatus::Won).unwrap();
        assert_eq!(wagers.get(id).unwrap().status(), WagerStatus::Won);
        assert_eq!(wagers.available_pool(&contributors), dec!(30));
    }

    #[test]
    fn test_pending_is_not_a_target() {
        let contributors = pool_of(&[("A", dec!(100))]);
        let mut wagers = WagerLedger::new();
        let id = wagers
            .add_wager(&contributors, "Bet", "desc", dec!(2), dec!(10))
            .unwrap()
            .id();
        wagers.set_status(id, WagerStatus::Won).unwrap();

        assert!(wagers.set_status(id, WagerStatus::Pending).is_err());
        assert!(wagers.set_all_statuses(WagerStatus::Pending).is_err());
        assert_eq!(wagers.get(id).unwrap().status(), WagerStatus::Won);
    }

    #[test]
    fn test_delete_round_trip_restores_available_pool() {
        let contributors = pool_of(&[("A", dec!(100)), ("B", dec!(50))]);
        let mut wagers = WagerLedger::new();
        wagers
            .add_wager(&contributors, "Keep", "desc", dec!(1.8), dec!(25))
            .unwrap();
        let before = wagers.available_pool(&contributors);

        let id = wagers
            .add_wager(&contributors, "Drop", "desc", dec!(4), dec!(80))
            .unwrap()
            .id();
        wagers.set_status(id, WagerStatus::Won).unwrap();
        let removed = wagers.delete(id).unwrap();
        assert_eq!(removed.stake(), dec!(80));
        assert_eq!(wagers.available_pool(&contributors), before);

        wagers
            .add_wager(&contributors, "Again", "desc", dec!(4), dec!(80))
            .unwrap();
        assert_eq!(wagers.available_pool(&contributors), before - dec!(80));
    }

    #[test]
    fn test_unknown_reference() {
        let mut wagers = WagerLedger::new();
        let id = WagerId::new();
        assert!(matches!(wagers.delete(id), Err(BetSplitError::NotFound(_))));
        assert!(matches!(
            wagers.set_status(id, WagerStatus::Won),
            Err(BetSplitError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_all_statuses_and_positions() {
        let contributors = pool_of(&[("A", dec!(100))]);
        let mut wagers = WagerLedger::new();
        for name in ["one", "two", "three"] {
            wagers
                .add_wager(&contributors, name, "desc", dec!(2), dec!(10))
                .unwrap();
        }
        assert_eq!(wagers.pending_count(), 3);

        let second = wagers.id_at(2).unwrap();
        wagers.set_status(second, WagerStatus::Won).unwrap();
        wagers.set_all_statuses(WagerStatus::Lost).unwrap();

        assert_eq!(wagers.pending_count(), 0);
        assert!(wagers
            .wagers()
            .iter()
            .all(|w| w.status() == WagerStatus::Lost));
        assert_eq!(wagers.id_at(0), None);
        assert_eq!(wagers.id_at(4), None);
    }
}
