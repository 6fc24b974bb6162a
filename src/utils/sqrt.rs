//! Exact integer square root for arbitrary-precision integers.
//!
//! Floating point is never involved: for the 200+ bit ratios produced by
//! price initialization an f64 root would already be off by many units.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::error::MathError;

/// Floor of the exact square root of `value`.
///
/// Binary search over candidate roots in `[1, value / 2 + 1]`, so the cost
/// is O(log value) comparisons. Negative input fails with
/// `MathError::DomainError`.
pub fn sqrt(value: &BigInt) -> Result<BigInt, MathError> {
    if value.is_negative() {
        return Err(MathError::DomainError);
    }

    if value.is_zero() || value.is_one() {
        return Ok(value.clone());
    }

    let mut low = BigInt::one();
    let mut high: BigInt = value / 2 + 1;

    while low <= high {
        let mid: BigInt = &low + (&high - &low) / 2;
        let mid_squared = &mid * &mid;

        match mid_squared.cmp(value) {
            std::cmp::Ordering::Equal => return Ok(mid),
            std::cmp::Ordering::Less => low = mid + 1,
            std::cmp::Ordering::Greater => high = mid - 1,
        }
    }

    // `high` is the last candidate whose square did not exceed `value`
    Ok(high)
}
