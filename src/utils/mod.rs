//! Fixed-point math utilities.
//!
//! This module is organized into focused submodules:
//!
//! - [`sqrt`] - Exact integer square root over arbitrary-precision integers
//! - [`price`] - Pool price initialization (ratio -> sqrtPriceX96) and reconstruction
//! - [`tick_math`] - Uniswap V3 tick <-> sqrtPriceX96 conversions
//! - [`conversion`] - Type conversions (U256, BigInt, f64)

mod conversion;
mod price;
mod sqrt;
mod tick_math;

// ============================================
// Re-exports
// ============================================

// Conversion utilities
pub use conversion::{bigint_to_u256, f64_to_u256, u256_to_bigint, u256_to_f64};

// Price initialization utilities
pub use price::{
    amount1_from_sqrt_price, price_from_ratio, sqrt_price_x96_to_adjusted_price, Q96, RESOLUTION,
};

// Square root
pub use sqrt::sqrt;

// Tick math utilities
pub use tick_math::{tick_at_sqrt_price_x96, tick_to_sqrt_price_x96, MAX_TICK, MIN_TICK};
