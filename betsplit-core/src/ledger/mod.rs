pub mod contributor;
pub mod wager;

pub use contributor::{Contributor, ContributorLedger};
pub use wager::{Wager, WagerLedger};
