use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event Stake(address indexed owner, uint256 indexed tokenId, uint128 liquidity);
    #[derive(Debug, PartialEq, Eq)]
    event Unstake(address indexed owner, uint256 indexed tokenId, uint128 liquidity);
    #[derive(Debug, PartialEq, Eq)]
    event ClaimReward(address indexed owner, uint256 amount);
}
