//! # In-Memory Asset Registry
//!
//! Reference implementation of the `AssetRegistry` port. Backs the test
//! suites and any single-process wiring; a production deployment adapts
//! the real registry contract behind the same trait.

use crate::ports::outbound::{AssetRegistry, RegistryError};
use shared_types::{Address, BasisPoints, TokenId, BPS_DENOMINATOR, U256};
use std::collections::HashMap;

/// In-memory balances, supplies and royalty terms.
#[derive(Debug, Default)]
pub struct InMemoryAssetRegistry {
    current_token_id: u64,
    balances: HashMap<(Address, TokenId), U256>,
    supplies: HashMap<TokenId, U256>,
    royalties: HashMap<TokenId, (Address, BasisPoints)>,
}

impl InMemoryAssetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a new token line of `amount` units to `to`, optionally with
    /// royalty terms `(receiver, bps)`. Returns the new token id.
    pub fn mint(
        &mut self,
        to: Address,
        amount: U256,
        royalty: Option<(Address, BasisPoints)>,
    ) -> TokenId {
        self.current_token_id += 1;
        let token = TokenId::new(self.current_token_id);
        self.balances.insert((to, token), amount);
        self.supplies.insert(token, amount);
        if let Some(terms) = royalty {
            self.royalties.insert(token, terms);
        }
        token
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn balance_of(&self, owner: Address, token: TokenId) -> U256 {
        self.balances
            .get(&(owner, token))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        token: TokenId,
        amount: U256,
    ) -> Result<(), RegistryError> {
        if !self.supplies.contains_key(&token) {
            return Err(RegistryError::UnknownToken(token));
        }
        let from_balance = self.balance_of(from, token);
        if from_balance < amount {
            return Err(RegistryError::InsufficientBalance {
                required: amount,
                available: from_balance,
            });
        }
        self.balances.insert((from, token), from_balance - amount);
        let to_balance = self.balance_of(to, token);
        self.balances.insert((to, token), to_balance + amount);
        Ok(())
    }

    fn royalty_info(&self, token: TokenId, sale_amount: U256) -> (Address, U256) {
        match self.royalties.get(&token) {
            Some(&(receiver, bps)) => (
                receiver,
                sale_amount * U256::from(bps) / U256::from(BPS_DENOMINATOR),
            ),
            None => (Address::ZERO, U256::zero()),
        }
    }

    fn supply_of(&self, token: TokenId) -> U256 {
        self.supplies.get(&token).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[test]
    fn test_mint_assigns_sequential_tokens() {
        let mut registry = InMemoryAssetRegistry::new();
        let a = registry.mint(addr(1), U256::from(10), None);
        let b = registry.mint(addr(1), U256::from(5), None);
        assert_eq!(a, TokenId::new(1));
        assert_eq!(b, TokenId::new(2));
        assert_eq!(registry.supply_of(a), U256::from(10));
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mut registry = InMemoryAssetRegistry::new();
        let token = registry.mint(addr(1), U256::from(10), None);

        registry
            .transfer(addr(1), addr(2), token, U256::from(4))
            .unwrap();
        assert_eq!(registry.balance_of(addr(1), token), U256::from(6));
        assert_eq!(registry.balance_of(addr(2), token), U256::from(4));

        let err = registry
            .transfer(addr(1), addr(2), token, U256::from(7))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InsufficientBalance {
                required: U256::from(7),
                available: U256::from(6),
            }
        );
    }

    #[test]
    fn test_transfer_unknown_token_rejected() {
        let mut registry = InMemoryAssetRegistry::new();
        let err = registry
            .transfer(addr(1), addr(2), TokenId::new(99), U256::from(1))
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownToken(TokenId::new(99)));
    }

    #[test]
    fn test_royalty_info_proportional_to_sale() {
        let mut registry = InMemoryAssetRegistry::new();
        let token = registry.mint(addr(1), U256::from(1), Some((addr(9), 1_000)));

        let (receiver, royalty) = registry.royalty_info(token, U256::from(50_000));
        assert_eq!(receiver, addr(9));
        assert_eq!(royalty, U256::from(5_000));

        let plain = registry.mint(addr(1), U256::from(1), None);
        assert_eq!(
            registry.royalty_info(plain, U256::from(50_000)),
            (Address::ZERO, U256::zero())
        );
    }
}
