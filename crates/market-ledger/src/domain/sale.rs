//! # Listing & Regular Sale
//!
//! Fixed-price listings: units move from an Available position into an
//! escrowed RegularSale position, buyers pay the exact unit price, and the
//! proceeds split royalty / platform fee / seller at settlement.

use crate::domain::entities::{PositionKind, PositionState, RaffleData};
use crate::domain::errors::LedgerError;
use crate::domain::ledger::Marketplace;
use crate::events::MarketEvent;
use crate::ports::outbound::AssetRegistry;
use shared_types::{Address, FeeKind, ItemId, PositionId, TokenId, TxContext, U256};
use tracing::info;

impl<R: AssetRegistry> Marketplace<R> {
    /// Lists `amount` units of an item at `unit_price` each.
    ///
    /// The caller's registry balance is synced first, so units received
    /// outside the marketplace count toward the listing. The listed units
    /// are escrowed into market custody; the fee rate for regular sales is
    /// snapshotted onto the new position.
    pub fn list_for_sale(
        &mut self,
        ctx: &TxContext,
        item_id: ItemId,
        amount: U256,
        unit_price: U256,
    ) -> Result<PositionId, LedgerError> {
        self.ensure_active()?;
        if unit_price.is_zero() {
            return Err(LedgerError::ZeroPayment);
        }
        self.consume_available(ctx, item_id, amount)?;

        let fee_bps = self.market_fee(FeeKind::RegularSale);
        let position_id = self.insert_position(
            item_id,
            ctx.caller,
            amount,
            unit_price,
            fee_bps,
            PositionState::RegularSale,
        );
        info!(
            position_id = %position_id,
            item_id = %item_id,
            seller = %ctx.caller,
            amount = %amount,
            unit_price = %unit_price,
            "listed for sale"
        );
        Ok(position_id)
    }

    /// Registers (or re-syncs) an item and lists units in one atomic call.
    ///
    /// Journal order is fixed: the `ItemRegistered` record (when the item is
    /// new) precedes the listing's `PositionCreated` record.
    pub fn register_and_list(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
        amount: U256,
        unit_price: U256,
    ) -> Result<(ItemId, PositionId), LedgerError> {
        let item_id = self.register_or_sync(ctx, asset_contract, token_id)?;
        let position_id = self.list_for_sale(ctx, item_id, amount, unit_price)?;
        Ok((item_id, position_id))
    }

    /// Returns an open position to Available.
    ///
    /// Only the position owner may unlist, and only while nothing is
    /// committed against the position: a regular sale at any time, an
    /// auction with no bids, a raffle before its deadline with no entries,
    /// or an unfunded loan proposal. Escrowed units go back to the owner.
    pub fn unlist(&mut self, ctx: &TxContext, position_id: PositionId) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        if position.owner != ctx.caller {
            return Err(LedgerError::NotOwner);
        }
        let can_unlist = match &position.state {
            PositionState::RegularSale => true,
            PositionState::Auction(auction) => auction.highest_bidder.is_none(),
            PositionState::Raffle(RaffleData {
                deadline, entries, ..
            }) => entries.is_empty() && ctx.now < *deadline,
            PositionState::Loan(loan) => loan.lender.is_none(),
            PositionState::Available => false,
        };
        if !can_unlist {
            return Err(LedgerError::InvalidStateForOperation);
        }

        let item_id = position.item_id;
        let amount = position.amount;
        self.release_escrow(item_id, ctx.caller, amount)?;
        self.remove_position(position_id)?;
        self.journal.push(MarketEvent::PositionUnlisted {
            position_id,
            item_id,
        });
        info!(position_id = %position_id, owner = %ctx.caller, "position unlisted");
        Ok(())
    }

    /// Buys `amount` units from a RegularSale position.
    ///
    /// The attached payment must equal `amount * unit_price` exactly. A
    /// partial purchase shrinks the listing and leaves the remainder on
    /// sale. The buyer receives the units as a fresh (or grown) Available
    /// position; its id is returned.
    pub fn buy(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
        amount: U256,
    ) -> Result<PositionId, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let position = self.position(position_id)?;
        if position.kind() != PositionKind::RegularSale {
            return Err(LedgerError::InvalidStateForOperation);
        }
        if amount > position.amount {
            return Err(LedgerError::InsufficientAvailableUnits {
                requested: amount,
                available: position.amount,
            });
        }
        let expected = amount
            .checked_mul(position.price)
            .ok_or(LedgerError::AmountOverflow)?;
        if ctx.payment != expected {
            return Err(LedgerError::IncorrectPayment {
                expected,
                actual: ctx.payment,
            });
        }

        let item_id = position.item_id;
        let seller = position.owner;
        let fee_bps = position.market_fee_bps;
        let buyer_position = self.settle_sale(
            position_id,
            item_id,
            seller,
            ctx.caller,
            amount,
            ctx.payment,
            fee_bps,
        )?;

        let position = self.position_mut(position_id)?;
        position.amount -= amount;
        if position.amount.is_zero() {
            self.remove_position(position_id)?;
        }
        Ok(buyer_position)
    }

    /// Registers the item if the pair is new, otherwise syncs the caller's
    /// held units. Never fails with `DuplicateItem`; used by the composite
    /// register-and-open entry points.
    pub(crate) fn register_or_sync(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
    ) -> Result<ItemId, LedgerError> {
        self.ensure_active()?;
        if let Some(&item_id) = self.item_lookup.get(&(asset_contract, token_id)) {
            self.sync_held_units(ctx, item_id, ctx.caller)?;
            return Ok(item_id);
        }
        self.register_item(ctx, asset_contract, token_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
