//! Time-weighted liquidity mining for concentrated-liquidity positions.
//!
//! Holders of Uniswap V3 style position NFTs stake them with a
//! [`StakingLedger`] and earn a fixed per-second emission of a reward
//! token, shared in proportion to staked liquidity. Only positions whose
//! tick range contains the pool's current tick are accepted.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alloy::primitives::{address, U256};
//! use liquidity_mining::{
//!     collaborators::{InMemoryErc20, InMemoryPool, InMemoryPositionManager},
//!     LedgerParams, StakingLedger,
//! };
//!
//! let ledger = address!("0x00000000000000000000000000000000000000d1");
//! let deployer = address!("0x00000000000000000000000000000000000000a0");
//!
//! let token = Arc::new(InMemoryErc20::new(
//!     address!("0x00000000000000000000000000000000000000e1"),
//!     "Token",
//!     "TKN",
//!     18,
//!     U256::from(10u8).pow(U256::from(26u8)),
//!     deployer,
//! ));
//! let manager = Arc::new(InMemoryPositionManager::new(address!(
//!     "0xC36442b4a4522E871399CD717aBDD847Ab11FE88"
//! )));
//! let pool = Arc::new(InMemoryPool::new(
//!     address!("0x00000000000000000000000000000000000000f1"),
//!     address!("0x0000000000000000000000000000000000000001"),
//!     address!("0x0000000000000000000000000000000000000002"),
//!     3000,
//! ));
//!
//! let params = LedgerParams {
//!     address: ledger,
//!     factory: address!("0x1F98431c8aD98523631AE4a59f267346ea31F984"),
//!     reward_rate_per_second: U256::from(10u8).pow(U256::from(18u8)),
//!     genesis_timestamp: 0,
//! };
//! let staking = StakingLedger::new(params, token, manager, pool);
//! assert!(staking.total_staked_liquidity().is_zero());
//! ```

pub mod abis;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod ledger;
pub mod utils;

pub use config::{LedgerSettings, Settings};
pub use error::{CustodyError, LedgerError, MathError, TokenError};
pub use ledger::{
    is_in_range, LedgerEvent, LedgerParams, Receipt, RewardAccumulator, StakedPosition,
    StakingLedger, PRECISION,
};
pub use utils::{price_from_ratio, sqrt};
