use crate::types::{Money, WagerId};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BetSplitError>;

#[derive(Error, Debug)]
pub enum BetSplitError {
    #[error("Invalid name: a name is required")]
    InvalidName,

    #[error("Invalid stake: {0}")]
    InvalidStake(String),

    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Bettor name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Not enough funds: need {need}, available {available}")]
    InsufficientPool { need: Money, available: Money },

    #[error("Bet not found: {0}")]
    NotFound(WagerId),

    #[error("No bettors in this session")]
    NoContributors,

    #[error("No bets to calculate")]
    NoWagers,

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Malformed session: {0}")]
    MalformedSession(String),

    #[error("Session not found: {}", path.display())]
    SessionNotFound { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BetSplitError {
    pub fn invalid_stake(msg: impl Into<String>) -> Self {
        Self::InvalidStake(msg.into())
    }

    pub fn invalid_odds(msg: impl Into<String>) -> Self {
        Self::InvalidOdds(msg.into())
    }

    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::InvalidField(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedSession(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::AmountOutOfRange(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the validation failures a caller can correct and retry.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName
                | Self::InvalidStake(_)
                | Self::InvalidOdds(_)
                | Self::InvalidField(_)
                | Self::DuplicateName { .. }
                | Self::InsufficientPool { .. }
        )
    }
}
