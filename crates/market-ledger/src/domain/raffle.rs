//! # Raffle
//!
//! Escrowed units raffled off among paying entrants. Entries merge per
//! address; the winner is drawn with probability proportional to each
//! address's total contribution over the pot.
//!
//! The draw consumes the entropy port. The production adapter derives its
//! value from locally available call data, which is manipulable by a caller
//! controlling transaction ordering — a known limitation carried over from
//! the environment this ledger models, not an oversight.

use crate::domain::entities::{PositionState, RaffleData};
use crate::domain::errors::LedgerError;
use crate::domain::ledger::Marketplace;
use crate::events::MarketEvent;
use crate::ports::outbound::AssetRegistry;
use shared_types::{
    Address, FeeKind, ItemId, PositionId, TokenId, TxContext, SECONDS_PER_MINUTE, U256,
};
use tracing::info;

impl<R: AssetRegistry> Marketplace<R> {
    /// Opens a raffle over `amount` units of an item.
    pub fn create_raffle(
        &mut self,
        ctx: &TxContext,
        item_id: ItemId,
        amount: U256,
        duration_minutes: u64,
    ) -> Result<PositionId, LedgerError> {
        self.ensure_active()?;
        self.consume_available(ctx, item_id, amount)?;

        let deadline = ctx.now + duration_minutes * SECONDS_PER_MINUTE;
        let fee_bps = self.market_fee(FeeKind::Raffle);
        let position_id = self.insert_position(
            item_id,
            ctx.caller,
            amount,
            U256::zero(),
            fee_bps,
            PositionState::Raffle(RaffleData {
                deadline,
                total_value: U256::zero(),
                entries: Vec::new(),
                total_addresses: 0,
            }),
        );
        info!(
            position_id = %position_id,
            item_id = %item_id,
            seller = %ctx.caller,
            amount = %amount,
            deadline,
            "raffle created"
        );
        Ok(position_id)
    }

    /// Registers (or re-syncs) an item and opens a raffle in one atomic
    /// call. Journal order: `ItemRegistered` first, then the raffle's
    /// `PositionCreated`.
    pub fn register_and_raffle(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
        amount: U256,
        duration_minutes: u64,
    ) -> Result<(ItemId, PositionId), LedgerError> {
        let item_id = self.register_or_sync(ctx, asset_contract, token_id)?;
        let position_id = self.create_raffle(ctx, item_id, amount, duration_minutes)?;
        Ok((item_id, position_id))
    }

    /// Enters a raffle with the attached payment.
    ///
    /// A repeat entrant's contribution merges into their existing entry;
    /// selection weighting always uses the address's total.
    pub fn enter_raffle(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        if ctx.payment.is_zero() {
            return Err(LedgerError::ZeroPayment);
        }
        let caller = ctx.caller;
        let payment = ctx.payment;
        let now = ctx.now;

        let position = self.position_mut(position_id)?;
        let PositionState::Raffle(raffle) = &mut position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if now >= raffle.deadline {
            return Err(LedgerError::DeadlinePassed {
                deadline: raffle.deadline,
                now,
            });
        }

        match raffle.entries.iter_mut().find(|(addr, _)| *addr == caller) {
            Some((_, contribution)) => {
                *contribution = contribution
                    .checked_add(payment)
                    .ok_or(LedgerError::AmountOverflow)?;
            }
            None => {
                raffle.entries.push((caller, payment));
                raffle.total_addresses += 1;
            }
        }
        raffle.total_value = raffle
            .total_value
            .checked_add(payment)
            .ok_or(LedgerError::AmountOverflow)?;
        let total_value = raffle.total_value;

        self.journal.push(MarketEvent::RaffleEntered {
            position_id,
            entrant: caller,
            payment,
            total_value,
        });
        info!(
            position_id = %position_id,
            entrant = %caller,
            payment = %payment,
            total_value = %total_value,
            "raffle entry accepted"
        );
        Ok(())
    }

    /// Settles a raffle once its deadline has passed. Callable by anyone.
    ///
    /// With entries: draws a winner weighted by contribution, splits the
    /// pot royalty / fee / seller, hands the units to the winner and
    /// records one `Sale` at the pot value. Without entries: the units
    /// return to the owner and no funds move.
    pub fn end_raffle(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Raffle(raffle) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if ctx.now < raffle.deadline {
            return Err(LedgerError::DeadlineNotReached {
                deadline: raffle.deadline,
                now: ctx.now,
            });
        }

        let item_id = position.item_id;
        let seller = position.owner;
        let amount = position.amount;
        let fee_bps = position.market_fee_bps;
        let total_value = raffle.total_value;
        let entries = raffle.entries.clone();

        if entries.is_empty() {
            self.release_escrow(item_id, seller, amount)?;
            self.remove_position(position_id)?;
            self.journal.push(MarketEvent::PositionUnlisted {
                position_id,
                item_id,
            });
            info!(position_id = %position_id, "raffle expired with no entries");
            return Ok(());
        }

        let winner = self.draw_winner(ctx, position_id, total_value, &entries);
        self.settle_sale(
            position_id,
            item_id,
            seller,
            winner,
            amount,
            total_value,
            fee_bps,
        )?;
        self.remove_position(position_id)?;
        info!(position_id = %position_id, winner = %winner, pot = %total_value, "raffle settled");
        Ok(())
    }

    /// Weighted draw over the entry list. The ticket is the entropy value
    /// reduced modulo the pot; the winner is the entry whose cumulative
    /// contribution range covers the ticket.
    fn draw_winner(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
        total_value: U256,
        entries: &[(Address, U256)],
    ) -> Address {
        let mut material = Vec::with_capacity(8 * 3 + 32);
        material.extend_from_slice(&ctx.now.to_be_bytes());
        material.extend_from_slice(&position_id.as_u64().to_be_bytes());
        material.extend_from_slice(&(entries.len() as u64).to_be_bytes());
        let mut pot_bytes = [0u8; 32];
        total_value.to_big_endian(&mut pot_bytes);
        material.extend_from_slice(&pot_bytes);

        let ticket = self.entropy.draw(&material) % total_value;

        let mut cumulative = U256::zero();
        for (addr, contribution) in entries {
            cumulative += *contribution;
            if ticket < cumulative {
                return *addr;
            }
        }
        // Contributions sum to the pot, so the loop always returns; the
        // last entry covers any residue.
        entries[entries.len() - 1].0
    }
}

// =============================================================================
// TESTS
// =============================================================================
