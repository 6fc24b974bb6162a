use alloy::primitives::{Address, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - square root of a negative value")]
    DomainError,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("Math error - overflow")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("ERC20: transfer amount exceeds balance ({available} < {required})")]
    InsufficientBalance { available: U256, required: U256 },
    #[error("ERC20: insufficient allowance ({available} < {required})")]
    InsufficientAllowance { available: U256, required: U256 },
    #[error("ERC20: zero address")]
    ZeroAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    #[error("ERC721: invalid token ID {0}")]
    NonexistentPosition(U256),
    #[error("ERC721: {operator} is not token owner or approved for {id}")]
    NotOwnerOrApproved { operator: Address, id: U256 },
    #[error("ERC721: transfer of {id} from incorrect owner {from}")]
    IncorrectOwner { from: Address, id: U256 },
}

/// Reasons a ledger operation is aborted.
///
/// Every variant aborts the whole operation; no partial state survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Position is out of range")]
    PositionOutOfRange,
    #[error("Token already staked")]
    AlreadyStaked,
    #[error("Not the owner or token not staked")]
    NotOwnerOrNotStaked,
    #[error("Insufficient reward balance ({available} < {required})")]
    InsufficientRewardBalance { available: U256, required: U256 },
    #[error("Reentrant call rejected")]
    ReentrancyRejected,
    #[error("Position does not belong to the staking pool")]
    PoolMismatch,

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Custody(#[from] CustodyError),
}
