//! Stake eligibility of a position's price range.

/// Whether a position spanning `[tick_lower, tick_upper)` is active at
/// `current_tick`.
///
/// The upper bound is exclusive: a pool sitting exactly on `tick_upper`
/// prices the position entirely in token1, so it earns nothing.
#[inline]
pub fn is_in_range(tick_lower: i32, tick_upper: i32, current_tick: i32) -> bool {
    tick_lower <= current_tick && current_tick < tick_upper
}
