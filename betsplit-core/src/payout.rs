//! Final settlement of a session's pool.
//!
//! Every contributor gets back a slice of the pool's final value, in
//! proportion to their stake:
//!
//! ```text
//! total_profit  = Σ payout of won bets - Σ stake of all bets
//! leftover      = pool never reserved by a bet
//! final_amount  = total_pool + total_profit
//! share         = stake / total_pool
//! final_payout  = final_amount * share
//! ```
//!
//! Payouts are rounded to the currency's smallest unit. Any units lost to
//! rounding go to the contributors with the largest discarded remainders, so
//! the payouts always add up to `final_amount` rounded to that unit.

use crate::config::SettlementConfig;
use crate::error::{BetSplitError, Result};
use crate::ledger::{ContributorLedger, WagerLedger};
use crate::types::{round_money, Money, WagerStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// What one contributor walks away with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub stake: Money,
    /// Fraction of the pool (0..=1).
    #[serde(with = "rust_decimal::serde::str")]
    pub percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub share_of_winnings: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub share_of_leftover: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_payout: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub net_profit_loss: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_pool: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_stake: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_won: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_lost: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_profit: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub leftover: Money,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_amount: Money,
    /// `final_amount` at currency precision; equals the sum of all payouts.
    #[serde(with = "rust_decimal::serde::str")]
    pub settled_amount: Money,
    /// Bets still pending when the report was produced.
    pub pending_wagers: usize,
    pub payouts: Vec<Payout>,
}

impl SettlementReport {
    pub fn total_paid_out(&self) -> Money {
        self.payouts.iter().map(|p| p.final_payout).sum()
    }

    pub fn is_final(&self) -> bool {
        self.pending_wagers == 0
    }
}

/// Stateless settlement over the final state of both ledgers.
///
/// Pending bets are settled as if they paid nothing; callers are expected to
/// resolve them first; `SettlementReport::pending_wagers` reports any left.
#[derive(Debug, Clone, Default)]
pub struct PayoutCalculator {
    config: SettlementConfig,
}

impl PayoutCalculator {
    pub fn new(config: SettlementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SettlementConfig {
        &self.config
    }

    pub fn calculate(
        &self,
        contributors: &ContributorLedger,
        wagers: &WagerLedger,
    ) -> Result<SettlementReport> {
        if contributors.is_empty() {
            return Err(BetSplitError::NoContributors);
        }
        if wagers.is_empty() {
            return Err(BetSplitError::NoWagers);
        }

        let pending_wagers = wagers.pending_count();
        if pending_wagers > 0 {
            tracing::warn!(
                "Calculating results with {} pending bet(s); they count as paying nothing",
                pending_wagers
            );
        }

        let total_pool = contributors.total_pool();
        let total_stake = wagers.reserved_stake();
        let total_won = wagers
            .wagers()
            .iter()
            .filter(|w| w.status() == WagerStatus::Won)
            .try_fold(Decimal::ZERO, |acc, w| acc.checked_add(w.potential_payout()))
            .ok_or_else(|| BetSplitError::out_of_range("total winnings are too large to settle"))?;
        let total_lost: Money = wagers
            .wagers()
            .iter()
            .filter(|w| w.status() == WagerStatus::Lost)
            .map(|w| w.stake())
            .sum();
        let total_profit = total_won - total_stake;
        let leftover = wagers.available_pool(contributors);
        let final_amount = total_pool
            .checked_add(total_profit)
            .ok_or_else(|| BetSplitError::out_of_range("final pool value is too large to settle"))?;

        let scale = self.config.currency_scale;
        let settled_amount = round_money(final_amount, scale);
        let shares: Vec<Decimal> = contributors
            .contributors()
            .iter()
            .map(|c| contributors.percentage_share(c))
            .collect();
        let final_payouts = allocate(&shares, final_amount, settled_amount, scale)?;

        let payouts = contributors
            .contributors()
            .iter()
            .zip(shares)
            .zip(final_payouts)
            .map(|((c, share), final_payout)| {
                // leftover <= total_pool and share <= 1
                let share_of_leftover = round_money(leftover * share, scale);
                Payout {
                    name: c.name().to_string(),
                    stake: c.stake(),
                    percentage: share,
                    share_of_winnings: final_payout - share_of_leftover,
                    share_of_leftover,
                    final_payout,
                    net_profit_loss: final_payout - c.stake(),
                }
            })
            .collect();

        tracing::info!(
            "Settled pool {}: profit {}, leftover {}, paying out {} to {} bettor(s)",
            total_pool,
            total_profit,
            leftover,
            settled_amount,
            contributors.len()
        );

        Ok(SettlementReport {
            total_pool,
            total_stake,
            total_won,
            total_lost,
            total_profit,
            leftover,
            final_amount,
            settled_amount,
            pending_wagers,
            payouts,
        })
    }
}

/// Settle with the default configuration (cents).
pub fn settle(contributors: &ContributorLedger, wagers: &WagerLedger) -> Result<SettlementReport> {
    PayoutCalculator::default().calculate(contributors, wagers)
}

/// Split `amount` by share, rounded down to `scale`, then hand the missing
/// smallest units to the largest remainders until the parts sum to `target`.
fn allocate(shares: &[Decimal], amount: Money, target: Money, scale: u32) -> Result<Vec<Money>> {
    let unit = Decimal::new(1, scale);
    let exact = shares
        .iter()
        .map(|share| amount.checked_mul(*share))
        .collect::<Option<Vec<Money>>>()
        .ok_or_else(|| BetSplitError::out_of_range("payout share is too large to settle"))?;
    let mut parts: Vec<Money> = exact
        .iter()
        .map(|v| v.round_dp_with_strategy(scale, RoundingStrategy::ToNegativeInfinity))
        .collect();
    let remainders: Vec<Money> = exact.iter().zip(&parts).map(|(e, p)| e - p).collect();

    let shortfall: Money = target - parts.iter().copied().sum::<Money>();
    let missing_units = (shortfall / unit).round().to_usize().unwrap_or(0);
    if missing_units == 0 {
        return Ok(parts);
    }

    // stable sort keeps insertion order among equal remainders
    let mut order: Vec<usize> = (0..parts.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    for i in 0..missing_units {
        parts[order[i % order.len()]] += unit;
    }

    tracing::debug!("Distributed {} rounding unit(s) of {}", missing_units, unit);
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WagerId;
    use rust_decimal_macros::dec;

    fn setup(stakes: &[(&str, Decimal)]) -> (ContributorLedger, WagerLedger) {
        let mut contributors = ContributorLedger::new();
        for (name, stake) in stakes {
            contributors.add(name, *stake).unwrap();
        }
        (contributors, WagerLedger::new())
    }

    fn place(
        contributors: &ContributorLedger,
        wagers: &mut WagerLedger,
        odds: Decimal,
        stake: Decimal,
    ) -> WagerId {
        wagers
            .add_wager(contributors, "Bet", "desc", odds, stake)
            .unwrap()
            .id()
    }

    #[test]
    fn test_won_scenario() {
        let (contributors, mut wagers) = setup(&[("A", dec!(100)), ("B", dec!(200))]);
        let id = place(&contributors, &mut wagers, dec!(2), dec!(150));
        wagers.set_status(id, WagerStatus::Won).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        assert_eq!(report.total_stake, dec!(150));
        assert_eq!(report.total_won, dec!(300));
        assert_eq!(report.total_profit, dec!(150));
        assert_eq!(report.leftover, dec!(150));
        assert_eq!(report.final_amount, dec!(450));

        let a = &report.payouts[0];
        assert_eq!(a.final_payout, dec!(150.00));
        assert_eq!(a.net_profit_loss, dec!(50.00));
        let b = &report.payouts[1];
        assert_eq!(b.final_payout, dec!(300.00));
        assert_eq!(b.net_profit_loss, dec!(100.00));

        assert_eq!(report.total_paid_out(), dec!(450.00));
        assert!(report.is_final());
    }

    #[test]
    fn test_lost_scenario() {
        let (contributors, mut wagers) = setup(&[("A", dec!(100)), ("B", dec!(200))]);
        let id = place(&contributors, &mut wagers, dec!(2), dec!(150));
        wagers.set_status(id, WagerStatus::Lost).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        assert_eq!(report.total_won, Decimal::ZERO);
        assert_eq!(report.total_lost, dec!(150));
        assert_eq!(report.total_profit, dec!(-150));
        assert_eq!(report.final_amount, dec!(150));
        assert_eq!(report.payouts[0].final_payout, dec!(50.00));
        assert_eq!(report.payouts[1].final_payout, dec!(100.00));
        assert_eq!(report.total_paid_out(), dec!(150.00));
    }

    #[test]
    fn test_two_term_breakdown_matches_payout() {
        let (contributors, mut wagers) = setup(&[("A", dec!(100)), ("B", dec!(200))]);
        let id = place(&contributors, &mut wagers, dec!(2), dec!(150));
        wagers.set_status(id, WagerStatus::Won).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        let a = &report.payouts[0];
        assert_eq!(a.share_of_leftover, dec!(50.00));
        assert_eq!(a.share_of_winnings, dec!(100.00));
        for p in &report.payouts {
            assert_eq!(p.share_of_winnings + p.share_of_leftover, p.final_payout);
        }
    }

    #[test]
    fn test_rounding_units_are_conserved() {
        let (contributors, mut wagers) =
            setup(&[("A", dec!(100)), ("B", dec!(100)), ("C", dec!(100))]);
        let id = place(&contributors, &mut wagers, dec!(1.5), dec!(100));
        wagers.set_status(id, WagerStatus::Won).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        assert_eq!(report.final_amount, dec!(350));
        let paid: Vec<Money> = report.payouts.iter().map(|p| p.final_payout).collect();
        assert_eq!(paid, vec![dec!(116.67), dec!(116.67), dec!(116.66)]);
        assert_eq!(report.total_paid_out(), dec!(350.00));
    }

    #[test]
    fn test_fractional_final_amount_rounds_once() {
        let (contributors, mut wagers) = setup(&[("A", dec!(10)), ("B", dec!(20))]);
        let id = place(&contributors, &mut wagers, dec!(1.333), dec!(10.01));
        wagers.set_status(id, WagerStatus::Won).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        // 30 - 10.01 + 13.34333 = 33.33333
        assert_eq!(report.final_amount, dec!(33.33333));
        assert_eq!(report.settled_amount, dec!(33.33));
        assert_eq!(report.total_paid_out(), dec!(33.33));
    }

    #[test]
    fn test_pending_bets_are_reported() {
        let (contributors, mut wagers) = setup(&[("A", dec!(100))]);
        let won = place(&contributors, &mut wagers, dec!(3), dec!(20));
        place(&contributors, &mut wagers, dec!(2), dec!(30));
        wagers.set_status(won, WagerStatus::Won).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        assert_eq!(report.pending_wagers, 1);
        assert!(!report.is_final());
        // pending stake is spent, not returned
        assert_eq!(report.final_amount, dec!(110));
        assert_eq!(report.payouts[0].final_payout, dec!(110.00));
    }

    #[test]
    fn test_custom_scale() {
        let (contributors, mut wagers) =
            setup(&[("A", dec!(1)), ("B", dec!(1)), ("C", dec!(1))]);
        let id = place(&contributors, &mut wagers, dec!(2), dec!(1));
        wagers.set_status(id, WagerStatus::Won).unwrap();

        let calculator = PayoutCalculator::new(SettlementConfig::new(0, "¥")).unwrap();
        let report = calculator.calculate(&contributors, &wagers).unwrap();
        let paid: Vec<Money> = report.payouts.iter().map(|p| p.final_payout).collect();
        assert_eq!(paid, vec![dec!(2), dec!(1), dec!(1)]);
    }

    #[test]
    fn test_large_pool_settles() {
        let (contributors, mut wagers) = setup(&[("A", dec!(1000000000000000))]);
        let id = place(&contributors, &mut wagers, dec!(2), dec!(1));
        wagers.set_status(id, WagerStatus::Lost).unwrap();

        let report = settle(&contributors, &wagers).unwrap();
        assert_eq!(report.final_amount, dec!(999999999999999));
        assert_eq!(report.payouts[0].final_payout, dec!(999999999999999.00));
        assert_eq!(report.payouts[0].share_of_leftover, dec!(999999999999999.00));
        assert_eq!(report.total_paid_out(), report.settled_amount);
    }

    #[test]
    fn test_final_amount_out_of_range() {
        let (contributors, mut wagers) = setup(&[("A", dec!(50000000000000000000000000000))]);
        let id = place(
            &contributors,
            &mut wagers,
            dec!(30000000000000000000000000000),
            dec!(1),
        );
        wagers.set_status(id, WagerStatus::Won).unwrap();

        assert!(matches!(
            settle(&contributors, &wagers),
            Err(BetSplitError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_requires_contributors_and_wagers() {
        let empty = ContributorLedger::new();
        let wagers = WagerLedger::new();
        assert!(matches!(
            settle(&empty, &wagers),
            Err(BetSplitError::NoContributors)
        ));

        let (contributors, wagers) = setup(&[("A", dec!(100))]);
        assert!(matches!(
            settle(&contributors, &wagers),
            Err(BetSplitError::NoWagers)
        ));
    }
}
