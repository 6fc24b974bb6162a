use alloy::{
    primitives::{Address, Log, U256},
    sol_types::SolEvent,
};

use crate::abis::{ClaimReward, Stake, Unstake};

/// Structured record emitted by a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Stake(Stake),
    Unstake(Unstake),
    ClaimReward(ClaimReward),
}

impl LedgerEvent {
    /// Encode as the EVM log the staking contract would emit from `emitter`.
    pub fn to_log(&self, emitter: Address) -> Log {
        let data = match self {
            LedgerEvent::Stake(event) => event.encode_log_data(),
            LedgerEvent::Unstake(event) => event.encode_log_data(),
            LedgerEvent::ClaimReward(event) => event.encode_log_data(),
        };

        Log {
            address: emitter,
            data,
        }
    }
}

/// Ordered events of one successful ledger operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    pub events: Vec<LedgerEvent>,
}

impl Receipt {
    pub(crate) fn push(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Total reward paid out by the operation.
    pub fn claimed(&self) -> U256 {
        self.events
            .iter()
            .filter_map(|event| match event {
                LedgerEvent::ClaimReward(claim) => Some(claim.amount),
                _ => None,
            })
            .fold(U256::ZERO, |total, amount| total.saturating_add(amount))
    }

    /// Encode every event as an EVM log.
    pub fn logs(&self, emitter: Address) -> Vec<Log> {
        self.events.iter().map(|event| event.to_log(emitter)).collect()
    }
}
