use std::sync::Mutex;

use alloy::primitives::{Address, U256};
use log::info;
use serde::Serialize;

use super::lock;
use crate::utils::{
    f64_to_u256, sqrt_price_x96_to_adjusted_price, tick_at_sqrt_price_x96, tick_to_sqrt_price_x96,
};

/// Current price of a pool, the `slot0()` subset the ledger reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

/// Source of the active price tick.
pub trait PricePool: Send + Sync {
    fn address(&self) -> Address;
    fn token0(&self) -> Address;
    fn token1(&self) -> Address;
    fn fee(&self) -> u32;
    fn slot0(&self) -> Slot0;
}

/// Pool price kept in process memory.
pub struct InMemoryPool {
    address: Address,
    token0: Address,
    token1: Address,
    fee: u32,
    slot0: Mutex<Slot0>,
}

impl InMemoryPool {
    /// Create an uninitialized pool. Tokens are sorted so that `token0` is
    /// the lower address, as the factory does.
    pub fn new(address: Address, token_a: Address, token_b: Address, fee: u32) -> Self {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        Self {
            address,
            token0,
            token1,
            fee,
            slot0: Mutex::new(Slot0::default()),
        }
    }

    /// Set the pool price and derive its tick.
    pub fn initialize(&self, sqrt_price_x96: U256) {
        let tick = tick_at_sqrt_price_x96(sqrt_price_x96);
        *lock(&self.slot0) = Slot0 {
            sqrt_price_x96,
            tick,
        };

        // Token decimals are unknown here, so the raw token1/token0 price is logged
        let price = sqrt_price_x96_to_adjusted_price(sqrt_price_x96, 0, 0).unwrap_or_default();
        info!(
            "Pool {} initialized at sqrtPriceX96 {} (tick {}, price {:e})",
            self.address, sqrt_price_x96, tick, price
        );
    }

    /// Move the price to `tick`, as a swap would.
    pub fn set_tick(&self, tick: i32) {
        *lock(&self.slot0) = Slot0 {
            sqrt_price_x96: f64_to_u256(tick_to_sqrt_price_x96(tick)),
            tick,
        };
    }
}

impl PricePool for InMemoryPool {
    fn address(&self) -> Address {
        self.address
    }

    fn token0(&self) -> Address {
        self.token0
    }

    fn token1(&self) -> Address {
        self.token1
    }

    fn fee(&self) -> u32 {
        self.fee
    }

    fn slot0(&self) -> Slot0 {
        *lock(&self.slot0)
    }
}
