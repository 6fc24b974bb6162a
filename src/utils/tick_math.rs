//! Tick math for Uniswap V3 pools.
//!
//! Approximate (f64) conversions between ticks and Q64.96 prices. The
//! staking ledger itself only compares ticks; these helpers exist so an
//! in-memory pool can be seeded from a `sqrtPriceX96`.

use alloy::primitives::U256;

use super::conversion::u256_to_f64;
use super::price::Q96_F64;

/// Lowest tick a Uniswap V3 pool supports.
pub const MIN_TICK: i32 = -887272;
/// Highest tick a Uniswap V3 pool supports.
pub const MAX_TICK: i32 = -MIN_TICK;

// 1/sqrt(1.0001)^(2^i) = 1.0001^(-0.5 * 2^i) for i = 0..19,
// the same bit decomposition TickMath.sol uses.
const TICK_MULTIPLIERS: [f64; 20] = [
    0.9999500037496876,
    0.9999000099990001,
    0.9998000299960005,
    0.9996000999800035,
    0.9992003598800331,
    0.9984013591843877,
    0.9968052740212325,
    0.9936207543165446,
    0.9872822034085791,
    0.9747261491672988,
    0.9500910658705113,
    0.9026730334469643,
    0.8148186053123443,
    0.6639293595631539,
    0.4408021944899397,
    0.1943065746671466,
    0.0377550449588794,
    0.0014254434198470,
    0.0000020318889432,
    0.0000000000041286,
];

/// Convert a tick to an approximate sqrt price ratio (Q64.96 format).
///
/// Formula: sqrt(1.0001^tick) * 2^96, tick clamped to the valid range.
pub fn tick_to_sqrt_price_x96(tick: i32) -> f64 {
    let clamped_tick = tick.clamp(MIN_TICK, MAX_TICK);
    let abs_tick = clamped_tick.unsigned_abs();

    let mut ratio = 1.0_f64;
    for (bit, multiplier) in TICK_MULTIPLIERS.iter().enumerate() {
        if abs_tick & (1 << bit) != 0 {
            ratio *= multiplier;
        }
    }

    if clamped_tick > 0 {
        ratio = 1.0 / ratio;
    }

    ratio * Q96_F64
}

/// Greatest tick whose price does not exceed `sqrt_price_x96`.
///
/// Starts from the logarithmic estimate and nudges it against
/// [`tick_to_sqrt_price_x96`] so both directions agree.
pub fn tick_at_sqrt_price_x96(sqrt_price_x96: U256) -> i32 {
    let sqrt_price = u256_to_f64(sqrt_price_x96, 0);
    if sqrt_price <= 0.0 {
        return MIN_TICK;
    }

    let normalized = sqrt_price / Q96_F64;
    let estimate = (2.0 * normalized.ln() / 1.0001_f64.ln()).floor();
    if !estimate.is_finite() {
        return MIN_TICK;
    }

    let mut tick = (estimate as i64).clamp(MIN_TICK as i64, MAX_TICK as i64) as i32;

    while tick > MIN_TICK && tick_to_sqrt_price_x96(tick) > sqrt_price {
        tick -= 1;
    }
    while tick < MAX_TICK && tick_to_sqrt_price_x96(tick + 1) <= sqrt_price {
        tick += 1;
    }

    tick
}
