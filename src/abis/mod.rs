pub mod erc20;
pub mod erc721;
pub mod liquidity_mining;

pub use liquidity_mining::{ClaimReward, Stake, Unstake};
