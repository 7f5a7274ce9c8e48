//! Wiring helpers: a ledger-backed implementation of the governance
//! gateway port, plus common fixtures.
//!
//! In production the gateway is the call plumbing between the two
//! deployed contracts; here it borrows the in-process ledger and executes
//! privileged calls on behalf of the governance address.

use market_governance::prelude::{GatewayError, MarketplaceGateway};
use market_ledger::prelude::*;
use shared_types::{AdminCall, Address, Timestamp, TxContext, U256};

/// Marketplace fee used by the fixtures (2.5%).
pub const MARKET_FEE_BPS: u16 = 250;

/// Royalty used by the fixtures (10%).
pub const ROYALTY_BPS: u16 = 1_000;

/// Shorthand address constructor.
pub fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

/// Whole-coin amounts in the smallest currency unit.
pub fn eth(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// Gateway executing privileged calls against a borrowed ledger as the
/// governance address.
pub struct LedgerGateway<'a> {
    market: &'a mut Marketplace<InMemoryAssetRegistry>,
    governance: Address,
    now: Timestamp,
}

impl<'a> LedgerGateway<'a> {
    /// Borrows `market` for calls made by `governance` at time `now`.
    pub fn new(
        market: &'a mut Marketplace<InMemoryAssetRegistry>,
        governance: Address,
        now: Timestamp,
    ) -> Self {
        Self {
            market,
            governance,
            now,
        }
    }

    fn ctx(&self) -> TxContext {
        TxContext::new(self.governance, self.now)
    }
}

impl MarketplaceGateway for LedgerGateway<'_> {
    fn execute_admin(&mut self, call: &AdminCall, _value: U256) -> Result<(), GatewayError> {
        let ctx = self.ctx();
        let outcome = match call {
            AdminCall::SetMarketFee { kind, fee_bps } => {
                self.market.set_market_fee(&ctx, *kind, *fee_bps)
            }
            AdminCall::SetMigrator { migrator } => self.market.set_migrator(&ctx, *migrator),
            AdminCall::TransferOwnership { new_owner } => {
                self.market.transfer_ownership(&ctx, *new_owner)
            }
            AdminCall::Retire => self.market.retire(&ctx),
        };
        outcome.map_err(|err| GatewayError::Rejected(err.to_string()))
    }

    fn withdraw_accrued(&mut self) -> Result<U256, GatewayError> {
        let ctx = self.ctx();
        self.market
            .withdraw(&ctx)
            .map_err(|err| GatewayError::Rejected(err.to_string()))
    }
}

/// A marketplace owned by `owner`, with fresh registry and fixed entropy.
pub fn market_owned_by(owner: Address) -> Marketplace<InMemoryAssetRegistry> {
    Marketplace::new(
        MarketConfig::new(owner, addr(0xFF), MARKET_FEE_BPS),
        InMemoryAssetRegistry::new(),
        Box::new(FixedEntropy::new(U256::zero())),
    )
}

/// Mints `supply` units to `seller` (10% royalty to `artist`) and
/// registers the item. Returns the item id.
pub fn seed_item(
    market: &mut Marketplace<InMemoryAssetRegistry>,
    seller: Address,
    artist: Address,
    supply: u64,
) -> shared_types::ItemId {
    let token = market
        .registry_mut()
        .mint(seller, U256::from(supply), Some((artist, ROYALTY_BPS)));
    let ctx = TxContext::new(seller, 0);
    market.register_item(&ctx, addr(0xAA), token).unwrap()
}
