//! Time-weighted reward index shared by every staked position.
//!
//! Rather than crediting each position on every second, the ledger keeps
//! one running total of reward earned per unit of liquidity:
//!
//! ```text
//! Δacc = elapsed × rewardRate × PRECISION / totalStakedLiquidity
//! ```
//!
//! A position remembers the index at its last checkpoint (its reward debt)
//! and its entitlement is recovered lazily when read:
//!
//! ```text
//! pending = (acc − rewardDebt) × liquidity / PRECISION
//! ```
//!
//! Every division floors, so the sum of payouts stays at or below the
//! amount emitted.

use alloy::primitives::U256;
use log::debug;
use serde::Serialize;

use crate::error::MathError;

/// Fixed-point scale of the accumulator (10^18).
pub const PRECISION: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Global accounting state of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardAccumulator {
    /// Cumulative reward per unit of liquidity, scaled by [`PRECISION`].
    pub acc_reward_per_liquidity: U256,
    /// Sum of the liquidity of all staked positions.
    pub total_staked_liquidity: U256,
    /// Timestamp of the last refresh; never decreases.
    pub last_update_time: u64,
    /// Tokens emitted per second across all stakers.
    pub reward_rate_per_second: U256,
}

impl RewardAccumulator {
    pub fn new(reward_rate_per_second: U256, genesis_timestamp: u64) -> Self {
        Self {
            acc_reward_per_liquidity: U256::ZERO,
            total_staked_liquidity: U256::ZERO,
            last_update_time: genesis_timestamp,
            reward_rate_per_second,
        }
    }

    /// Accrue rewards up to `now`.
    ///
    /// While nothing is staked the clock still advances and the emission
    /// for that period is dropped. A `now` earlier than the last refresh
    /// accrues nothing and leaves the clock where it is. On error the
    /// accumulator is untouched.
    pub fn refresh(&mut self, now: u64) -> Result<(), MathError> {
        let acc = self.accumulated_at(now)?;
        if acc != self.acc_reward_per_liquidity {
            debug!(
                "Accumulator {} -> {} over {}s (total liquidity {})",
                self.acc_reward_per_liquidity,
                acc,
                now.saturating_sub(self.last_update_time),
                self.total_staked_liquidity
            );
        }

        self.acc_reward_per_liquidity = acc;
        self.last_update_time = self.last_update_time.max(now);
        Ok(())
    }

    /// Value the accumulator would have after a refresh at `now`, without
    /// mutating it.
    pub fn accumulated_at(&self, now: u64) -> Result<U256, MathError> {
        let elapsed = now.saturating_sub(self.last_update_time);
        if elapsed == 0 || self.total_staked_liquidity.is_zero() {
            return Ok(self.acc_reward_per_liquidity);
        }

        let delta = U256::from(elapsed)
            .checked_mul(self.reward_rate_per_second)
            .and_then(|emitted| emitted.checked_mul(PRECISION))
            .ok_or(MathError::Overflow)?
            / self.total_staked_liquidity;

        self.acc_reward_per_liquidity
            .checked_add(delta)
            .ok_or(MathError::Overflow)
    }

    /// Reward owed to `liquidity` checkpointed at `reward_debt`.
    pub fn pending(&self, liquidity: u128, reward_debt: U256) -> Result<U256, MathError> {
        pending_between(self.acc_reward_per_liquidity, reward_debt, liquidity)
    }

    /// Project the reward for `liquidity` staked for `duration` seconds at
    /// the current rate and current total stake. Read-only.
    ///
    /// With nothing staked the hypothetical staker owns the whole pool and
    /// earns `rate × duration`.
    pub fn estimate(&self, liquidity: u128, duration: u64) -> Result<U256, MathError> {
        let emitted = U256::from(duration)
            .checked_mul(self.reward_rate_per_second)
            .ok_or(MathError::Overflow)?;

        if self.total_staked_liquidity.is_zero() {
            return Ok(emitted);
        }

        let per_liquidity = emitted
            .checked_mul(PRECISION)
            .ok_or(MathError::Overflow)?
            / self.total_staked_liquidity;

        pending_between(per_liquidity, U256::ZERO, liquidity)
    }

    pub fn add_liquidity(&mut self, liquidity: u128) -> Result<(), MathError> {
        self.total_staked_liquidity = self
            .total_staked_liquidity
            .checked_add(U256::from(liquidity))
            .ok_or(MathError::Overflow)?;
        Ok(())
    }

    pub fn remove_liquidity(&mut self, liquidity: u128) -> Result<(), MathError> {
        self.total_staked_liquidity = self
            .total_staked_liquidity
            .checked_sub(U256::from(liquidity))
            .ok_or(MathError::Overflow)?;
        Ok(())
    }
}

fn pending_between(acc: U256, reward_debt: U256, liquidity: u128) -> Result<U256, MathError> {
    let accrued = acc.saturating_sub(reward_debt);
    Ok(accrued
        .checked_mul(U256::from(liquidity))
        .ok_or(MathError::Overflow)?
        / PRECISION)
}
