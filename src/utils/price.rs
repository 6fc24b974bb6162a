//! Price initialization utilities for Uniswap V3 pools.
//!
//! Converts a desired token ratio into the Q64.96 `sqrtPriceX96` encoding,
//! and back into amounts or human-readable prices.

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;

use super::conversion::{big_pow10, bigint_to_u256, u256_to_bigint};
use super::sqrt::sqrt;
use crate::error::MathError;

// ============================================
// Constants
// ============================================

/// Q64.96 fixed point resolution in bits.
pub const RESOLUTION: usize = 96;

/// 2^96 as U256. Value: 79228162514264337593543950336
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// 2^96 as f64 for approximate conversions.
pub(crate) const Q96_F64: f64 = 79228162514264337593543950336.0;

/// 2^192, the scale of a squared Q64.96 price.
static Q192: Lazy<BigDecimal> =
    Lazy::new(|| BigDecimal::from(BigInt::from(1u8) << (2 * RESOLUTION)));

// ============================================
// Ratio -> sqrtPriceX96
// ============================================

/// Compute the initial `sqrtPriceX96` for a pool seeded with
/// `amount0` of token0 and `amount1` of token1.
///
/// ```text
/// sqrtPriceX96 = floor(sqrt(floor((amount1 << 192) / amount0)))
/// ```
///
/// Both steps truncate, so squaring the result reconstructs the ratio only
/// up to one part in 2^96. Fails with `MathError::DivisionByZero` when
/// `amount0` is zero.
pub fn price_from_ratio(amount0: U256, amount1: U256) -> Result<U256, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let ratio = (u256_to_bigint(amount1) << (2 * RESOLUTION)) / u256_to_bigint(amount0);
    let sqrt_price_x96 = sqrt(&ratio)?;

    bigint_to_u256(&sqrt_price_x96)
}

// ============================================
// sqrtPriceX96 -> amounts / prices
// ============================================

/// Reconstruct the token1 amount matching `amount0` at `sqrt_price_x96`.
///
/// ```text
/// amount1 = floor(amount0 * sqrtPriceX96^2 / 2^192)
/// ```
pub fn amount1_from_sqrt_price(sqrt_price_x96: U256, amount0: U256) -> BigInt {
    let sqrt_price = u256_to_bigint(sqrt_price_x96);
    (u256_to_bigint(amount0) * &sqrt_price * &sqrt_price) >> (2 * RESOLUTION)
}

/// Convert `sqrtPriceX96` to a decimal-adjusted token1/token0 price.
///
/// # Arguments
/// * `sqrt_price_x96` - The pool price in Q64.96
/// * `token0_decimals` - Decimal places of token0
/// * `token1_decimals` - Decimal places of token1
///
/// # Returns
/// * `Some(adjusted_price)` if representable, `None` for a zero price or
///   unsupported decimals
pub fn sqrt_price_x96_to_adjusted_price(
    sqrt_price_x96: U256,
    token0_decimals: u8,
    token1_decimals: u8,
) -> Option<f64> {
    if token0_decimals > 24 || token1_decimals > 24 || sqrt_price_x96.is_zero() {
        return None;
    }

    let sqrt_price = u256_to_bigint(sqrt_price_x96);
    let raw_price = BigDecimal::from(&sqrt_price * &sqrt_price) / &*Q192;

    // decimal adjustment: 10^(decimals0 - decimals1)
    let decimal_diff = token0_decimals as i32 - token1_decimals as i32;
    let adjusted = if decimal_diff >= 0 {
        raw_price * big_pow10(decimal_diff as u8)
    } else {
        raw_price / big_pow10((-decimal_diff) as u8)
    };

    let adjusted_f64 = adjusted.to_f64()?;
    if adjusted_f64.is_finite() && !adjusted.is_zero() {
        Some(adjusted_f64)
    } else {
        None
    }
}
