//! External contracts the staking ledger talks to.
//!
//! The ledger never owns token balances, position NFTs or pool prices; it
//! reaches them through these traits. The EVM's implicit `msg.sender` is an
//! explicit `Address` argument on every state-changing call.
//!
//! In-memory implementations back the tests and local simulations:
//!
//! - [`InMemoryErc20`] - fungible reward token
//! - [`InMemoryPositionManager`] - position NFT custody
//! - [`InMemoryPool`] - pool price source

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod erc20;
pub mod pool;
pub mod position_manager;

pub use erc20::{Erc20, InMemoryErc20};
pub use pool::{InMemoryPool, PricePool, Slot0};
pub use position_manager::{InMemoryPositionManager, PositionInfo, PositionManager};

/// Lock a collaborator's state, recovering the data from a poisoned lock.
///
/// The in-memory collaborators never leave half-applied writes behind, so
/// a panic in another holder does not invalidate the state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
