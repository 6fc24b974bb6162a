use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy::primitives::{Address, U256};
use anyhow::{ensure, Context};
use log::{error, info, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{
    accumulator::RewardAccumulator,
    events::{LedgerEvent, Receipt},
    guard::ReentrancyGuard,
    range::is_in_range,
};
use crate::{
    abis::{ClaimReward, Stake, Unstake},
    collaborators::{Erc20, PositionManager, PricePool},
    config::LedgerSettings,
    error::LedgerError,
};

/// Deployment parameters fixed when the ledger is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerParams {
    /// Address the ledger holds rewards and positions under.
    pub address: Address,
    /// Factory the staking pool was created by.
    pub factory: Address,
    pub reward_rate_per_second: U256,
    pub genesis_timestamp: u64,
}

/// Record of a staked position. An unstaked position keeps a zeroed
/// record with `staked == false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StakedPosition {
    pub owner: Address,
    /// Liquidity read from the position manager at stake time.
    pub liquidity: u128,
    /// Accumulator value at the last stake or claim.
    pub reward_debt: U256,
    pub staked: bool,
}

struct LedgerState {
    accumulator: RewardAccumulator,
    positions: FxHashMap<U256, StakedPosition>,
}

impl LedgerState {
    /// Record of `id` if it is staked and owned by `caller`.
    fn owned_record(&self, id: U256, caller: Address) -> Result<StakedPosition, LedgerError> {
        match self.positions.get(&id) {
            Some(record) if record.staked && record.owner == caller => Ok(*record),
            _ => Err(LedgerError::NotOwnerOrNotStaked),
        }
    }

    fn snapshot(&self, id: U256) -> Snapshot {
        Snapshot {
            accumulator: self.accumulator,
            id,
            record: self.positions.get(&id).copied(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.accumulator = snapshot.accumulator;
        match snapshot.record {
            Some(record) => self.positions.insert(snapshot.id, record),
            None => self.positions.remove(&snapshot.id),
        };
    }
}

/// Everything a single operation may touch: the global accumulator and
/// one position record.
struct Snapshot {
    accumulator: RewardAccumulator,
    id: U256,
    record: Option<StakedPosition>,
}

/// Liquidity-mining ledger for concentrated-liquidity positions.
///
/// Stakers deposit a position NFT and earn a share of a fixed per-second
/// reward emission proportional to their liquidity. Accounting is O(1) per
/// call through [`RewardAccumulator`].
///
/// Operations are totally ordered: calls from other threads wait for the
/// running operation to finish, while a call made from a transfer callback
/// of the running operation fails with [`LedgerError::ReentrancyRejected`].
/// Ledger state is updated before any external transfer is issued; if a
/// transfer fails the state is rolled back, so every operation is
/// all-or-nothing. The ledger's own reward tokens always move last.
pub struct StakingLedger {
    params: LedgerParams,
    state: Mutex<LedgerState>,
    guard: ReentrancyGuard,
    reward_token: Arc<dyn Erc20>,
    position_manager: Arc<dyn PositionManager>,
    pool: Arc<dyn PricePool>,
}

impl StakingLedger {
    pub fn new(
        params: LedgerParams,
        reward_token: Arc<dyn Erc20>,
        position_manager: Arc<dyn PositionManager>,
        pool: Arc<dyn PricePool>,
    ) -> Self {
        info!(
            "Staking ledger {} rewarding {} {}/s for pool {}",
            params.address,
            params.reward_rate_per_second,
            reward_token.symbol(),
            pool.address()
        );

        Self {
            params,
            state: Mutex::new(LedgerState {
                accumulator: RewardAccumulator::new(
                    params.reward_rate_per_second,
                    params.genesis_timestamp,
                ),
                positions: FxHashMap::default(),
            }),
            guard: ReentrancyGuard::default(),
            reward_token,
            position_manager,
            pool,
        }
    }

    /// Build a ledger from deployment settings, checking that the
    /// collaborators are the contracts the settings name.
    pub fn from_settings(
        settings: &LedgerSettings,
        reward_token: Arc<dyn Erc20>,
        position_manager: Arc<dyn PositionManager>,
        pool: Arc<dyn PricePool>,
    ) -> anyhow::Result<Self> {
        ensure!(
            reward_token.address() == settings.reward_token,
            "reward token is {}, configured {}",
            reward_token.address(),
            settings.reward_token
        );
        ensure!(
            position_manager.address() == settings.position_manager,
            "position manager is {}, configured {}",
            position_manager.address(),
            settings.position_manager
        );
        ensure!(
            pool.address() == settings.pool,
            "pool is {}, configured {}",
            pool.address(),
            settings.pool
        );

        let params = settings
            .params()
            .context("failed to read ledger parameters")?;
        Ok(Self::new(params, reward_token, position_manager, pool))
    }

    // ============================================
    // Operations
    // ============================================

    /// Take custody of position `id` from `caller` and start accruing
    /// rewards for it.
    ///
    /// `caller` must own the position and have approved the ledger to move
    /// it. The position must belong to the staking pool and its range must
    /// contain the pool's current tick.
    pub fn stake(&self, id: U256, caller: Address, now: u64) -> Result<Receipt, LedgerError> {
        let _entered = self.guard.enter()?;

        if self.state().positions.get(&id).is_some_and(|record| record.staked) {
            warn!("Rejected stake of {}: already staked", id);
            return Err(LedgerError::AlreadyStaked);
        }

        let position = self.position_manager.positions(id)?;
        if position.token0 != self.pool.token0()
            || position.token1 != self.pool.token1()
            || position.fee != self.pool.fee()
        {
            warn!("Rejected stake of {}: position belongs to another pool", id);
            return Err(LedgerError::PoolMismatch);
        }

        let current_tick = self.pool.slot0().tick;
        if !is_in_range(position.tick_lower, position.tick_upper, current_tick) {
            warn!(
                "Rejected stake of {}: range {}..{} excludes tick {}",
                id, position.tick_lower, position.tick_upper, current_tick
            );
            return Err(LedgerError::PositionOutOfRange);
        }

        let snapshot = self.mutate(id, |state| {
            state.accumulator.refresh(now)?;
            state.accumulator.add_liquidity(position.liquidity)?;
            state.positions.insert(
                id,
                StakedPosition {
                    owner: caller,
                    liquidity: position.liquidity,
                    reward_debt: state.accumulator.acc_reward_per_liquidity,
                    staked: true,
                },
            );
            Ok(())
        })?;

        if let Err(e) = self
            .position_manager
            .transfer_from(self.params.address, caller, self.params.address, id)
        {
            self.state().restore(snapshot);
            warn!("Stake of {} by {} rolled back: {}", id, caller, e);
            return Err(e.into());
        }

        info!(
            "{} staked position {} with liquidity {}",
            caller, id, position.liquidity
        );

        let mut receipt = Receipt::default();
        receipt.push(LedgerEvent::Stake(Stake {
            owner: caller,
            tokenId: id,
            liquidity: position.liquidity,
        }));
        Ok(receipt)
    }

    /// Pay out the reward accrued by position `id` since its last checkpoint.
    pub fn claim_rewards(
        &self,
        id: U256,
        caller: Address,
        now: u64,
    ) -> Result<Receipt, LedgerError> {
        let _entered = self.guard.enter()?;

        let mut pending = U256::ZERO;
        let snapshot = self.mutate(id, |state| {
            let mut record = state.owned_record(id, caller)?;
            state.accumulator.refresh(now)?;
            pending = state
                .accumulator
                .pending(record.liquidity, record.reward_debt)?;

            record.reward_debt = state.accumulator.acc_reward_per_liquidity;
            state.positions.insert(id, record);
            Ok(())
        })?;

        if let Err(e) = self.pay_reward(caller, pending) {
            self.state().restore(snapshot);
            warn!("Claim on {} by {} rolled back: {}", id, caller, e);
            return Err(e);
        }

        info!("{} claimed {} from position {}", caller, pending, id);

        let mut receipt = Receipt::default();
        receipt.push(LedgerEvent::ClaimReward(ClaimReward {
            owner: caller,
            amount: pending,
        }));
        Ok(receipt)
    }

    /// Settle the pending reward of position `id`, stop accruing and hand
    /// the position back to `caller`.
    pub fn unstake(&self, id: U256, caller: Address, now: u64) -> Result<Receipt, LedgerError> {
        let _entered = self.guard.enter()?;

        let mut pending = U256::ZERO;
        let snapshot = self.mutate(id, |state| {
            let record = state.owned_record(id, caller)?;
            state.accumulator.refresh(now)?;
            pending = state
                .accumulator
                .pending(record.liquidity, record.reward_debt)?;

            state.accumulator.remove_liquidity(record.liquidity)?;
            state.positions.insert(id, StakedPosition::default());
            Ok(())
        })?;

        let returned = self.ensure_reward_balance(pending).and_then(|()| {
            self.position_manager
                .transfer_from(self.params.address, self.params.address, caller, id)
                .map_err(LedgerError::from)
        });
        if let Err(e) = returned {
            self.state().restore(snapshot);
            warn!("Unstake of {} by {} rolled back: {}", id, caller, e);
            return Err(e);
        }

        if let Err(e) = self.pay_reward(caller, pending) {
            // Take custody back before the record says the ledger holds it again
            if let Err(custody) = self
                .position_manager
                .transfer_from(caller, caller, self.params.address, id)
            {
                error!(
                    "Unstake of {} by {} unsettled: {}; custody not recovered: {}",
                    id, caller, e, custody
                );
                return Err(e);
            }

            self.state().restore(snapshot);
            warn!("Unstake of {} by {} rolled back: {}", id, caller, e);
            return Err(e);
        }

        info!("{} unstaked position {} (settled {})", caller, id, pending);

        let mut receipt = Receipt::default();
        receipt.push(LedgerEvent::ClaimReward(ClaimReward {
            owner: caller,
            amount: pending,
        }));
        receipt.push(LedgerEvent::Unstake(Unstake {
            owner: caller,
            tokenId: id,
            liquidity: 0,
        }));
        Ok(receipt)
    }

    // ============================================
    // Views
    // ============================================

    /// Projected reward for `liquidity` staked `duration` seconds at the
    /// current rate and total stake.
    pub fn estimate_rewards(&self, liquidity: u128, duration: u64) -> Result<U256, LedgerError> {
        Ok(self.state().accumulator.estimate(liquidity, duration)?)
    }

    /// Reward position `id` could claim at `now`.
    pub fn pending_rewards(&self, id: U256, now: u64) -> Result<U256, LedgerError> {
        let state = self.state();
        let record = match state.positions.get(&id) {
            Some(record) if record.staked => *record,
            _ => return Err(LedgerError::NotOwnerOrNotStaked),
        };

        let mut accumulator = state.accumulator;
        accumulator.refresh(now)?;
        Ok(accumulator.pending(record.liquidity, record.reward_debt)?)
    }

    pub fn position(&self, id: U256) -> Option<StakedPosition> {
        self.state().positions.get(&id).copied()
    }

    pub fn accumulator(&self) -> RewardAccumulator {
        self.state().accumulator
    }

    pub fn total_staked_liquidity(&self) -> U256 {
        self.state().accumulator.total_staked_liquidity
    }

    pub fn acc_reward_per_liquidity(&self) -> U256 {
        self.state().accumulator.acc_reward_per_liquidity
    }

    pub fn last_update_time(&self) -> u64 {
        self.state().accumulator.last_update_time
    }

    pub fn reward_rate_per_second(&self) -> U256 {
        self.params.reward_rate_per_second
    }

    pub fn address(&self) -> Address {
        self.params.address
    }

    pub fn factory(&self) -> Address {
        self.params.factory
    }

    // ============================================
    // Internal Helpers
    // ============================================

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the state, undoing it if it fails. Returns the snapshot
    /// needed to undo it later.
    ///
    /// The lock is released before returning, so collaborators called
    /// afterwards observe the mutated state.
    fn mutate<F>(&self, id: U256, f: F) -> Result<Snapshot, LedgerError>
    where
        F: FnOnce(&mut LedgerState) -> Result<(), LedgerError>,
    {
        let mut state = self.state();
        let snapshot = state.snapshot(id);

        if let Err(e) = f(&mut *state) {
            state.restore(snapshot);
            return Err(e);
        }

        Ok(snapshot)
    }

    /// Fail unless the ledger holds at least `amount` reward tokens.
    fn ensure_reward_balance(&self, amount: U256) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        let available = self.reward_token.balance_of(self.params.address);
        if available < amount {
            return Err(LedgerError::InsufficientRewardBalance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    /// Send `amount` reward tokens from the ledger to `to`.
    fn pay_reward(&self, to: Address, amount: U256) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Ok(());
        }

        self.ensure_reward_balance(amount)?;
        self.reward_token.transfer(self.params.address, to, amount)?;
        Ok(())
    }
}
