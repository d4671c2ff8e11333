use crate::error::{BetSplitError, Result};
use crate::types::{parse_decimal, Money};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A bettor who paid into the shared pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    name: String,
    stake: Money,
}

impl Contributor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stake(&self) -> Money {
        self.stake
    }
}

/// Append-only set of contributors and the pool they fund.
#[derive(Debug, Clone, Default)]
pub struct ContributorLedger {
    contributors: Vec<Contributor>,
    // lowercased name -> position in `contributors`
    index: HashMap<String, usize>,
    total_pool: Money,
}

impl ContributorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contributor. Nothing is changed unless every check passes.
    pub fn add(&mut self, name: &str, stake: Money) -> Result<&Contributor> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Rejected bettor with empty name");
            return Err(BetSplitError::InvalidName);
        }

        if stake <= Decimal::ZERO {
            tracing::debug!("Rejected bettor '{}' with stake {}", name, stake);
            return Err(BetSplitError::invalid_stake(
                "Stake must be greater than 0",
            ));
        }

        let key = normalize(name);
        if self.index.contains_key(&key) {
            return Err(BetSplitError::DuplicateName {
                name: name.to_string(),
            });
        }

        let total_pool = self.total_pool.checked_add(stake).ok_or_else(|| {
            BetSplitError::invalid_stake(format!(
                "Stake {} would take the pool past the largest supported amount",
                stake
            ))
        })?;

        let position = self.contributors.len();
        self.contributors.push(Contributor {
            name: name.to_string(),
            stake,
        });
        self.index.insert(key, position);
        self.total_pool = total_pool;

        tracing::info!(
            "Added bettor '{}' with stake {} (pool now {})",
            name,
            stake,
            self.total_pool
        );
        Ok(&self.contributors[position])
    }

    /// Add a contributor from raw text input.
    pub fn add_parsed(&mut self, name: &str, stake: &str) -> Result<&Contributor> {
        let stake = parse_decimal(stake)
            .ok_or_else(|| BetSplitError::invalid_stake("Please enter a valid stake amount"))?;
        self.add(name, stake)
    }

    pub fn total_pool(&self) -> Money {
        self.total_pool
    }

    /// Fraction of the pool funded by `contributor`, 0 for an empty pool.
    pub fn percentage_share(&self, contributor: &Contributor) -> Decimal {
        if self.total_pool.is_zero() {
            return Decimal::ZERO;
        }
        contributor.stake / self.total_pool
    }

    pub fn get(&self, name: &str) -> Option<&Contributor> {
        self.index
            .get(&normalize(name.trim()))
            .map(|&position| &self.contributors[position])
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}
