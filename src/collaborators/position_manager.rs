use std::sync::Mutex;

use alloy::primitives::{Address, U256};
use log::debug;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::lock;
use crate::{abis::erc721, error::CustodyError};

/// Geometry of a concentrated-liquidity position as reported by
/// `NonfungiblePositionManager.positions(tokenId)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionInfo {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

/// Custody of position NFTs.
pub trait PositionManager: Send + Sync {
    fn address(&self) -> Address;
    fn positions(&self, id: U256) -> Result<PositionInfo, CustodyError>;
    fn owner_of(&self, id: U256) -> Result<Address, CustodyError>;
    fn get_approved(&self, id: U256) -> Result<Address, CustodyError>;

    /// Let `to` move position `id`; only the current owner may approve.
    fn approve(&self, caller: Address, to: Address, id: U256) -> Result<(), CustodyError>;

    /// Move position `id` from `from` to `to`. `operator` must be the owner
    /// or the approved address; the approval is cleared by the move.
    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        id: U256,
    ) -> Result<(), CustodyError>;
}

struct Custody {
    info: PositionInfo,
    owner: Address,
    approved: Address,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    positions: FxHashMap<U256, Custody>,
    log: Vec<erc721::Transfer>,
}

impl Registry {
    fn get(&self, id: U256) -> Result<&Custody, CustodyError> {
        self.positions
            .get(&id)
            .ok_or(CustodyError::NonexistentPosition(id))
    }
}

/// Position NFT registry kept in process memory.
///
/// Ids are issued sequentially from 1, like the Uniswap V3 position manager.
pub struct InMemoryPositionManager {
    address: Address,
    registry: Mutex<Registry>,
}

impl InMemoryPositionManager {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Issue a new position owned by `owner` and return its id.
    pub fn mint(&self, owner: Address, info: PositionInfo) -> U256 {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = U256::from(registry.next_id);

        registry.positions.insert(
            id,
            Custody {
                info,
                owner,
                approved: Address::ZERO,
            },
        );
        registry.log.push(erc721::Transfer {
            from: Address::ZERO,
            to: owner,
            tokenId: id,
        });

        debug!(
            "Minted position {} for {} (ticks {}..{}, liquidity {})",
            id, owner, info.tick_lower, info.tick_upper, info.liquidity
        );
        id
    }

    /// All custody moves applied so far, mints included, in order.
    pub fn transfer_log(&self) -> Vec<erc721::Transfer> {
        lock(&self.registry).log.clone()
    }
}

impl PositionManager for InMemoryPositionManager {
    fn address(&self) -> Address {
        self.address
    }

    fn positions(&self, id: U256) -> Result<PositionInfo, CustodyError> {
        Ok(lock(&self.registry).get(id)?.info)
    }

    fn owner_of(&self, id: U256) -> Result<Address, CustodyError> {
        Ok(lock(&self.registry).get(id)?.owner)
    }

    fn get_approved(&self, id: U256) -> Result<Address, CustodyError> {
        Ok(lock(&self.registry).get(id)?.approved)
    }

    fn approve(&self, caller: Address, to: Address, id: U256) -> Result<(), CustodyError> {
        let mut registry = lock(&self.registry);
        let custody = registry
            .positions
            .get_mut(&id)
            .ok_or(CustodyError::NonexistentPosition(id))?;

        if custody.owner != caller {
            return Err(CustodyError::NotOwnerOrApproved {
                operator: caller,
                id,
            });
        }

        custody.approved = to;
        Ok(())
    }

    fn transfer_from(
        &self,
        operator: Address,
        from: Address,
        to: Address,
        id: U256,
    ) -> Result<(), CustodyError> {
        let mut registry = lock(&self.registry);
        let custody = registry
            .positions
            .get_mut(&id)
            .ok_or(CustodyError::NonexistentPosition(id))?;

        if custody.owner != from {
            return Err(CustodyError::IncorrectOwner { from, id });
        }
        if operator != custody.owner && operator != custody.approved {
            return Err(CustodyError::NotOwnerOrApproved { operator, id });
        }

        custody.owner = to;
        custody.approved = Address::ZERO;
        registry.log.push(erc721::Transfer {
            from,
            to,
            tokenId: id,
        });

        debug!("Position {} moved from {} to {}", id, from, to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const MANAGER: Address = address!("0xC36442b4a4522E871399CD717aBDD847Ab11FE88");
    const HOLDER: Address = address!("0x00000000000000000000000000000000000000a1");
    const OPERATOR: Address = address!("0x00000000000000000000000000000000000000b2");

    fn info() -> PositionInfo {
        PositionInfo {
            token0: address!("0x0000000000000000000000000000000000000001"),
            token1: address!("0x0000000000000000000000000000000000000002"),
            fee: 3000,
            tick_lower: -887220,
            tick_upper: 887220,
            liquidity: 1_000,
        }
    }

    #[test]
    fn test_mint_issues_sequential_ids() {
        let manager = InMemoryPositionManager::new(MANAGER);
        assert_eq!(manager.mint(HOLDER, info()), U256::from(1u8));
        assert_eq!(manager.mint(HOLDER, info()), U256::from(2u8));
        assert_eq!(manager.owner_of(U256::from(2u8)).unwrap(), HOLDER);
        assert_eq!(manager.positions(U256::from(1u8)).unwrap(), info());
    }

    #[test]
    fn test_unknown_position_is_rejected() {
        let manager = InMemoryPositionManager::new(MANAGER);
        let id = U256::from(7u8);
        assert_eq!(
            manager.positions(id),
            Err(CustodyError::NonexistentPosition(id))
        );
    }

    #[test]
    fn test_transfer_requires_approval() {
        let manager = InMemoryPositionManager::new(MANAGER);
        let id = manager.mint(HOLDER, info());

        let result = manager.transfer_from(OPERATOR, HOLDER, OPERATOR, id);
        assert_eq!(
            result,
            Err(CustodyError::NotOwnerOrApproved {
                operator: OPERATOR,
                id
            })
        );

        manager.approve(HOLDER, OPERATOR, id).unwrap();
        manager
            .transfer_from(OPERATOR, HOLDER, OPERATOR, id)
            .unwrap();

        assert_eq!(manager.owner_of(id).unwrap(), OPERATOR);
        assert_eq!(manager.get_approved(id).unwrap(), Address::ZERO);
        assert_eq!(manager.transfer_log().len(), 2);
    }

    #[test]
    fn test_transfer_from_wrong_owner_fails() {
        let manager = InMemoryPositionManager::new(MANAGER);
        let id = manager.mint(HOLDER, info());

        assert_eq!(
            manager.transfer_from(OPERATOR, OPERATOR, HOLDER, id),
            Err(CustodyError::IncorrectOwner { from: OPERATOR, id })
        );
    }

    #[test]
    fn test_only_owner_can_approve() {
        let manager = InMemoryPositionManager::new(MANAGER);
        let id = manager.mint(HOLDER, info());

        assert!(manager.approve(OPERATOR, OPERATOR, id).is_err());
        assert_eq!(manager.get_approved(id).unwrap(), Address::ZERO);
    }
}
