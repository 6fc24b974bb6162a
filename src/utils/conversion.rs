//! Type conversion utilities.
//!
//! Functions for moving between alloy's fixed-width U256, num-bigint's
//! arbitrary-precision integers and f64 with proper decimal handling.

use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, ToPrimitive};
use once_cell::sync::Lazy;

use crate::error::MathError;

// ============================================
// U256 <-> BigInt
// ============================================

/// Convert U256 to a non-negative BigInt.
pub fn u256_to_bigint(value: U256) -> BigInt {
    let bytes: [u8; 32] = value.to_le_bytes();
    BigInt::from_bytes_le(Sign::Plus, &bytes)
}

/// Convert a BigInt back into U256.
///
/// Negative values and values wider than 256 bits do not fit and
/// are reported as `MathError::Overflow`.
pub fn bigint_to_u256(value: &BigInt) -> Result<U256, MathError> {
    let (sign, bytes) = value.to_bytes_le();
    if sign == Sign::Minus {
        return Err(MathError::Overflow);
    }

    U256::try_from_le_slice(&bytes).ok_or(MathError::Overflow)
}

// ============================================
// U256 -> f64
// ============================================

/// Scale a raw token amount down by `decimals` into an f64.
///
/// The division runs in BigDecimal so large amounts keep their leading
/// digits; a result that is not a finite f64 becomes 0.0.
pub fn u256_to_f64(value: U256, decimals: u8) -> f64 {
    let raw = BigDecimal::from(u256_to_bigint(value));
    let adjusted = match decimals {
        0 => raw,
        _ => raw / big_pow10(decimals),
    };

    match adjusted.to_f64() {
        Some(result) if result.is_finite() => result,
        _ => 0.0,
    }
}

/// Convert a non-negative f64 into U256, truncating the fraction.
///
/// NaN, negative and out-of-range inputs map to zero.
pub fn f64_to_u256(value: f64) -> U256 {
    if !value.is_finite() || value < 0.0 {
        return U256::ZERO;
    }

    BigInt::from_f64(value.trunc())
        .and_then(|big| bigint_to_u256(&big).ok())
        .unwrap_or_default()
}

// ============================================
// Internal Helpers
// ============================================

static POW10_CACHE: Lazy<[BigDecimal; 25]> =
    Lazy::new(|| std::array::from_fn(|i| BigDecimal::from(BigInt::from(10u32).pow(i as u32))));

/// Compute 10^exp as BigDecimal.
pub(crate) fn big_pow10(exp: u8) -> BigDecimal {
    if (exp as usize) < POW10_CACHE.len() {
        POW10_CACHE[exp as usize].clone()
    } else {
        BigDecimal::from(BigInt::from(10u32).pow(exp as u32))
    }
}
