use std::sync::Mutex;

use alloy::primitives::{Address, U256};
use log::debug;
use rustc_hash::FxHashMap;

use super::lock;
use crate::{abis::erc20, error::TokenError};

/// Fungible token used for rewards.
///
/// Implementations must apply each call atomically and fail loudly on
/// insufficient balance or allowance.
pub trait Erc20: Send + Sync {
    fn address(&self) -> Address;
    fn name(&self) -> String;
    fn symbol(&self) -> String;
    fn decimals(&self) -> u8;
    fn total_supply(&self) -> U256;
    fn balance_of(&self, account: Address) -> U256;
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Move `amount` from `from` (the caller) to `to`.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    fn approve(&self, owner: Address, spender: Address, amount: U256) -> Result<(), TokenError>;
}

#[derive(Default)]
struct Ledger {
    balances: FxHashMap<Address, U256>,
    allowances: FxHashMap<(Address, Address), U256>,
    log: Vec<erc20::Transfer>,
}

impl Ledger {
    fn balance(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let available = self.balance(&from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        self.balances.insert(from, available - amount);
        let credited = self.balance(&to) + amount;
        self.balances.insert(to, credited);
        self.log.push(erc20::Transfer {
            from,
            to,
            value: amount,
        });

        Ok(())
    }
}

/// ERC-20 token kept in process memory.
///
/// Mirrors the OpenZeppelin token the liquidity-mining deployment uses: the
/// whole supply is minted to the deployer, allowances of `U256::MAX` are
/// never decreased.
pub struct InMemoryErc20 {
    address: Address,
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: U256,
    ledger: Mutex<Ledger>,
}

impl InMemoryErc20 {
    pub fn new(
        address: Address,
        name: &str,
        symbol: &str,
        decimals: u8,
        total_supply: U256,
        owner: Address,
    ) -> Self {
        let mut ledger = Ledger::default();
        ledger.balances.insert(owner, total_supply);
        ledger.log.push(erc20::Transfer {
            from: Address::ZERO,
            to: owner,
            value: total_supply,
        });

        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply,
            ledger: Mutex::new(ledger),
        }
    }

    /// All transfers applied so far, mint included, in order.
    pub fn transfer_log(&self) -> Vec<erc20::Transfer> {
        lock(&self.ledger).log.clone()
    }
}

impl Erc20 for InMemoryErc20 {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn symbol(&self) -> String {
        self.symbol.clone()
    }

    fn decimals(&self) -> u8 {
        self.decimals
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn balance_of(&self, account: Address) -> U256 {
        lock(&self.ledger).balance(&account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        lock(&self.ledger)
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        lock(&self.ledger).move_balance(from, to, amount)?;
        debug!("[{}] transfer {} from {} to {}", self.symbol, amount, from, to);
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let mut ledger = lock(&self.ledger);

        let allowance = ledger
            .allowances
            .get(&(from, spender))
            .copied()
            .unwrap_or_default();
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                available: allowance,
                required: amount,
            });
        }

        ledger.move_balance(from, to, amount)?;
        if allowance != U256::MAX {
            ledger.allowances.insert((from, spender), allowance - amount);
        }

        debug!(
            "[{}] {} moved {} from {} to {}",
            self.symbol, spender, amount, from, to
        );
        Ok(())
    }

    fn approve(&self, owner: Address, spender: Address, amount: U256) -> Result<(), TokenError> {
        if spender.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        lock(&self.ledger).allowances.insert((owner, spender), amount);
        Ok(())
    }
}
