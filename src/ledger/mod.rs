//! Liquidity-mining ledger.
//!
//! - [`range`] - Stake eligibility of a position's tick range
//! - [`accumulator`] - Global time-weighted reward index
//! - [`events`] - Structured events returned by each operation
//! - [`staking`] - Per-position records and the stake/claim/unstake state machine

pub mod accumulator;
pub mod events;
mod guard;
pub mod range;
pub mod staking;

pub use accumulator::{RewardAccumulator, PRECISION};
pub use events::{LedgerEvent, Receipt};
pub use range::is_in_range;
pub use staking::{LedgerParams, StakedPosition, StakingLedger};
