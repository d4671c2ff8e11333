//! betsplit - pool accounting for shared betting sessions
//!
//! Bettors pay into a shared pool, bets are placed against what is left of
//! it, and once every bet is resolved the pool's final value is paid back to
//! the bettors in proportion to their stakes.
//!
//! ```
//! use betsplit_core::{settle, ContributorLedger, WagerLedger, WagerStatus};
//! use rust_decimal_macros::dec;
//!
//! let mut bettors = ContributorLedger::new();
//! bettors.add("A", dec!(100)).unwrap();
//! bettors.add("B", dec!(200)).unwrap();
//!
//! let mut bets = WagerLedger::new();
//! let id = bets.add_wager(&bettors, "Final", "Home win", dec!(2), dec!(150)).unwrap().id();
//! bets.set_status(id, WagerStatus::Won).unwrap();
//!
//! let report = settle(&bettors, &bets).unwrap();
//! assert_eq!(report.payouts[0].final_payout, dec!(150.00));
//! assert_eq!(report.payouts[1].final_payout, dec!(300.00));
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod payout;
pub mod session;
pub mod storage;
pub mod types;

pub use config::SettlementConfig;
pub use error::{BetSplitError, Result};
pub use ledger::{Contributor, ContributorLedger, Wager, WagerLedger};
pub use payout::{settle, Payout, PayoutCalculator, SettlementReport};
pub use session::{from_session, to_session, BettingSession, Session, SessionMeta};
pub use storage::{SessionStore, SessionSummary};
pub use types::{Money, WagerId, WagerStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let temp_dir = tempdir().unwrap();
        let store = SessionStore::new(temp_dir.path()).await.unwrap();

        let mut session = BettingSession::new("Grand National").unwrap();
        session.add_contributor("A", "100").unwrap();
        session.add_contributor("B", "200").unwrap();
        let path = store.create(&session.snapshot()).await.unwrap();

        let mut session = BettingSession::from_snapshot(&store.load(&path).await.unwrap()).unwrap();
        let id = session.add_wager("Horse 7", "Each way", "2", "150").unwrap();
        session.set_status(id, WagerStatus::Lost).unwrap();
        store.save(&path, &session.snapshot()).await.unwrap();

        let session = BettingSession::from_snapshot(&store.load(&path).await.unwrap()).unwrap();
        let report = session.calculate(&PayoutCalculator::default()).unwrap();
        assert_eq!(report.payouts[0].final_payout, dec!(50.00));
        assert_eq!(report.payouts[1].final_payout, dec!(100.00));
    }
}
