//! # Auction
//!
//! Timed auctions over escrowed units. Bids accumulate per bidder: the
//! current leader may top up, while a challenger's fresh bid must strictly
//! exceed the leading total. Displaced leaders are refunded in full through
//! the balance map. A qualifying bid landing inside the final window pushes
//! the deadline out, so there is always a reaction window after any
//! accepted bid.
//!
//! Settlement is lazy: nothing happens at the deadline until some caller —
//! any caller — submits `end_auction`.

use crate::domain::entities::{AuctionData, PositionState};
use crate::domain::errors::LedgerError;
use crate::domain::ledger::Marketplace;
use crate::events::MarketEvent;
use crate::ports::outbound::AssetRegistry;
use shared_types::{
    Address, FeeKind, ItemId, PositionId, TokenId, TxContext, SECONDS_PER_MINUTE, U256,
};
use tracing::info;

/// Anti-snipe window: a qualifying bid closer than this to the deadline
/// extends the deadline to `now + AUCTION_EXTENSION_SECS`.
pub const AUCTION_EXTENSION_SECS: u64 = 600;

impl<R: AssetRegistry> Marketplace<R> {
    /// Opens an auction over `amount` units of an item.
    ///
    /// Units are escrowed for the duration; the auction fee rate is
    /// snapshotted onto the position.
    pub fn create_auction(
        &mut self,
        ctx: &TxContext,
        item_id: ItemId,
        amount: U256,
        duration_minutes: u64,
        min_bid: U256,
    ) -> Result<PositionId, LedgerError> {
        self.ensure_active()?;
        self.consume_available(ctx, item_id, amount)?;

        let deadline = ctx.now + duration_minutes * SECONDS_PER_MINUTE;
        let fee_bps = self.market_fee(FeeKind::Auction);
        let position_id = self.insert_position(
            item_id,
            ctx.caller,
            amount,
            U256::zero(),
            fee_bps,
            PositionState::Auction(AuctionData {
                deadline,
                min_bid,
                highest_bidder: None,
                highest_bid: U256::zero(),
            }),
        );
        info!(
            position_id = %position_id,
            item_id = %item_id,
            seller = %ctx.caller,
            amount = %amount,
            deadline,
            min_bid = %min_bid,
            "auction created"
        );
        Ok(position_id)
    }

    /// Registers (or re-syncs) an item and opens an auction in one atomic
    /// call. Journal order: `ItemRegistered` first, then the auction's
    /// `PositionCreated`.
    pub fn register_and_auction(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
        amount: U256,
        duration_minutes: u64,
        min_bid: U256,
    ) -> Result<(ItemId, PositionId), LedgerError> {
        let item_id = self.register_or_sync(ctx, asset_contract, token_id)?;
        let position_id = self.create_auction(ctx, item_id, amount, duration_minutes, min_bid)?;
        Ok((item_id, position_id))
    }

    /// Places (or tops up) a bid with the attached payment.
    ///
    /// The caller's resulting total is their prior live contribution plus
    /// the payment; it must reach `min_bid` for the first accepted bid and
    /// strictly exceed the leading total afterwards. Only the current
    /// leader has a live contribution, so a displaced leader's funds are
    /// refunded in full at replacement time.
    pub fn bid(&mut self, ctx: &TxContext, position_id: PositionId) -> Result<(), LedgerError> {
        if ctx.payment.is_zero() {
            return Err(LedgerError::ZeroPayment);
        }
        let position = self.position(position_id)?;
        let PositionState::Auction(auction) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if ctx.now >= auction.deadline {
            return Err(LedgerError::DeadlinePassed {
                deadline: auction.deadline,
                now: ctx.now,
            });
        }

        let is_leader = auction.highest_bidder == Some(ctx.caller);
        let new_total = if is_leader {
            auction
                .highest_bid
                .checked_add(ctx.payment)
                .ok_or(LedgerError::AmountOverflow)?
        } else {
            ctx.payment
        };
        match auction.highest_bidder {
            None => {
                if new_total < auction.min_bid {
                    return Err(LedgerError::BidTooLow {
                        bid: new_total,
                        required: auction.min_bid,
                    });
                }
            }
            Some(_) if !is_leader && new_total <= auction.highest_bid => {
                return Err(LedgerError::BidTooLow {
                    bid: new_total,
                    required: auction.highest_bid,
                });
            }
            Some(_) => {}
        }

        let displaced = if is_leader {
            None
        } else {
            auction
                .highest_bidder
                .map(|bidder| (bidder, auction.highest_bid))
        };
        if let Some((bidder, refund)) = displaced {
            self.credit(bidder, refund);
        }

        let now = ctx.now;
        let caller = ctx.caller;
        let position = self.position_mut(position_id)?;
        let PositionState::Auction(auction) = &mut position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        auction.highest_bidder = Some(caller);
        auction.highest_bid = new_total;
        if auction.deadline - now < AUCTION_EXTENSION_SECS {
            auction.deadline = now + AUCTION_EXTENSION_SECS;
        }
        let deadline = auction.deadline;

        self.journal.push(MarketEvent::BidPlaced {
            position_id,
            bidder: caller,
            total_bid: new_total,
            deadline,
        });
        info!(
            position_id = %position_id,
            bidder = %caller,
            total_bid = %new_total,
            deadline,
            "bid accepted"
        );
        Ok(())
    }

    /// Settles an auction once its deadline has passed. Callable by anyone;
    /// settlement is mechanical.
    ///
    /// With a leader: royalty / fee / seller split on the winning total,
    /// escrowed units to the winner, a `Sale` appended. Without bids: the
    /// units return to the owner as Available and no funds move.
    pub fn end_auction(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Auction(auction) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if ctx.now < auction.deadline {
            return Err(LedgerError::DeadlineNotReached {
                deadline: auction.deadline,
                now: ctx.now,
            });
        }

        let item_id = position.item_id;
        let seller = position.owner;
        let amount = position.amount;
        let fee_bps = position.market_fee_bps;
        let outcome = auction.highest_bidder.map(|winner| (winner, auction.highest_bid));

        match outcome {
            Some((winner, winning_bid)) => {
                self.settle_sale(
                    position_id,
                    item_id,
                    seller,
                    winner,
                    amount,
                    winning_bid,
                    fee_bps,
                )?;
                self.remove_position(position_id)?;
                info!(position_id = %position_id, winner = %winner, "auction settled");
            }
            None => {
                self.release_escrow(item_id, seller, amount)?;
                self.remove_position(position_id)?;
                self.journal.push(MarketEvent::PositionUnlisted {
                    position_id,
                    item_id,
                });
                info!(position_id = %position_id, "auction expired with no bids");
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::entropy::WeakEntropy;
    use crate::adapters::memory_registry::InMemoryAssetRegistry;
    use crate::domain::entities::{MarketConfig, PositionKind};

    const ROYALTY_BPS: u16 = 1_000; // 10%

    fn addr(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn owner() -> Address {
        addr(0xEE)
    }

    fn market() -> Marketplace<InMemoryAssetRegistry> {
        let config = MarketConfig::new(owner(), addr(0xFF), 250);
        Marketplace::new(
            config,
            InMemoryAssetRegistry::new(),
            Box::new(WeakEntropy::default()),
        )
    }

    fn seeded_auction(
        market: &mut Marketplace<InMemoryAssetRegistry>,
        seller: Address,
        artist: Address,
        amount: u64,
        duration_minutes: u64,
        min_bid: U256,
    ) -> (ItemId, PositionId) {
        let token = market
            .registry_mut()
            .mint(seller, U256::from(amount), Some((artist, ROYALTY_BPS)));
        let ctx = TxContext::new(seller, 0);
        market
            .register_and_auction(
                &ctx,
                addr(0xAA),
                token,
                U256::from(amount),
                duration_minutes,
                min_bid,
            )
            .unwrap()
    }

    #[test]
    fn test_create_auction_escrows_units() {
        let mut market = market();
        let seller = addr(1);
        let (item_id, position_id) =
            seeded_auction(&mut market, seller, addr(4), 8, 11, eth(50));

        let position = market.position(position_id).unwrap();
        assert_eq!(position.kind(), PositionKind::Auction);
        assert_eq!(position.amount, U256::from(8));
        let PositionState::Auction(auction) = &position.state else {
            panic!("expected auction state");
        };
        assert_eq!(auction.deadline, 11 * 60);
        assert_eq!(auction.min_bid, eth(50));
        assert!(auction.highest_bidder.is_none());

        let token = market.item(item_id).unwrap().token_id;
        assert_eq!(
            market.registry().balance_of(market.market_account(), token),
            U256::from(8)
        );
    }

    #[test]
    fn test_first_bid_below_min_rejected() {
        let mut market = market();
        let (_, position_id) = seeded_auction(&mut market, addr(1), addr(4), 8, 11, eth(50));

        let ctx = TxContext::with_payment(addr(2), eth(49), 10);
        assert_eq!(
            market.bid(&ctx, position_id).unwrap_err(),
            LedgerError::BidTooLow {
                bid: eth(49),
                required: eth(50),
            }
        );
    }

    #[test]
    fn test_bid_monotonicity_and_refund_on_outbid() {
        let mut market = market();
        let bidder1 = addr(2);
        let bidder2 = addr(3);
        let (_, position_id) = seeded_auction(&mut market, addr(1), addr(4), 8, 11, eth(50));

        // bidder1 leads with 60.
        market
            .bid(&TxContext::with_payment(bidder1, eth(60), 10), position_id)
            .unwrap();

        // Equal bid from bidder2 is rejected.
        assert_eq!(
            market
                .bid(&TxContext::with_payment(bidder2, eth(60), 20), position_id)
                .unwrap_err(),
            LedgerError::BidTooLow {
                bid: eth(60),
                required: eth(60),
            }
        );

        // bidder1 tops up by 1 -> total 61.
        market
            .bid(&TxContext::with_payment(bidder1, eth(1), 30), position_id)
            .unwrap();
        let PositionState::Auction(auction) = &market.position(position_id).unwrap().state else {
            panic!("expected auction state");
        };
        assert_eq!(auction.highest_bid, eth(61));
        assert_eq!(auction.highest_bidder, Some(bidder1));
        assert!(market.address_balance(bidder1).is_zero());

        // bidder2 takes the lead with 62; bidder1 refunded 61 in full.
        market
            .bid(&TxContext::with_payment(bidder2, eth(62), 40), position_id)
            .unwrap();
        let PositionState::Auction(auction) = &market.position(position_id).unwrap().state else {
            panic!("expected auction state");
        };
        assert_eq!(auction.highest_bid, eth(62));
        assert_eq!(auction.highest_bidder, Some(bidder2));
        assert_eq!(market.address_balance(bidder1), eth(61));
    }

    #[test]
    fn test_early_bid_leaves_deadline_untouched() {
        let mut market = market();
        let (_, position_id) = seeded_auction(&mut market, addr(1), addr(4), 8, 11, eth(50));

        // 11 min auction; bid at t=10 is 650s before the deadline.
        market
            .bid(&TxContext::with_payment(addr(2), eth(60), 10), position_id)
            .unwrap();
        let PositionState::Auction(auction) = &market.position(position_id).unwrap().state else {
            panic!("expected auction state");
        };
        assert_eq!(auction.deadline, 11 * 60);
    }

    #[test]
    fn test_late_bid_extends_deadline() {
        let mut market = market();
        let (_, position_id) = seeded_auction(&mut market, addr(1), addr(4), 8, 11, eth(50));

        // 599s before the deadline: extension kicks in.
        let now = 11 * 60 - 599;
        market
            .bid(&TxContext::with_payment(addr(2), eth(60), now), position_id)
            .unwrap();
        let PositionState::Auction(auction) = &market.position(position_id).unwrap().state else {
            panic!("expected auction state");
        };
        assert_eq!(auction.deadline, now + AUCTION_EXTENSION_SECS);
    }

    #[test]
    fn test_end_auction_before_deadline_rejected() {
        let mut market = market();
        let (_, position_id) = seeded_auction(&mut market, addr(1), addr(4), 8, 11, eth(50));

        let err = market
            .end_auction(&TxContext::new(addr(9), 100), position_id)
            .unwrap_err();
        assert!(matches!(err, LedgerError::DeadlineNotReached { .. }));
    }

    #[test]
    fn test_end_auction_with_bids_settles_like_a_sale() {
        let mut market = market();
        let seller = addr(1);
        let winner = addr(3);
        let artist = addr(4);
        let helper = addr(9);
        let (item_id, position_id) =
            seeded_auction(&mut market, seller, artist, 8, 11, eth(50));

        market
            .bid(&TxContext::with_payment(winner, eth(62), 10), position_id)
            .unwrap();

        // Any caller may settle after the deadline.
        market
            .end_auction(&TxContext::new(helper, 11 * 60 + 1), position_id)
            .unwrap();

        let royalty = eth(62) / 10;
        let fee = (eth(62) - royalty) * U256::from(250) / U256::from(10_000);
        assert_eq!(market.address_balance(artist), royalty);
        assert_eq!(market.address_balance(owner()), fee);
        assert_eq!(market.address_balance(seller), eth(62) - royalty - fee);

        let item = market.item(item_id).unwrap();
        assert_eq!(item.sales.len(), 1);
        assert_eq!(item.sales[0].buyer, winner);
        assert_eq!(item.sales[0].price, eth(62));
        assert!(market.position(position_id).is_err());
        assert_eq!(market.tracked_available(item_id, winner), U256::from(8));
    }

    #[test]
    fn test_end_auction_without_bids_returns_units() {
        let mut market = market();
        let seller = addr(1);
        let (item_id, position_id) =
            seeded_auction(&mut market, seller, addr(4), 8, 1, eth(50));

        market
            .end_auction(&TxContext::new(addr(9), 61), position_id)
            .unwrap();

        assert!(market.position(position_id).is_err());
        assert_eq!(market.tracked_available(item_id, seller), U256::from(8));
        assert!(market.address_balance(seller).is_zero());
        assert!(market.item(item_id).unwrap().sales.is_empty());
    }

    #[test]
    fn test_unlist_auction_only_without_bids() {
        let mut market = market();
        let seller = addr(1);
        let (item_id, position_id) =
            seeded_auction(&mut market, seller, addr(4), 8, 11, eth(50));

        // No bids yet: unlisting returns the escrowed units.
        market
            .unlist(&TxContext::new(seller, 5), position_id)
            .unwrap();
        assert_eq!(market.tracked_available(item_id, seller), U256::from(8));

        // Re-open and take a bid: unlisting is now rejected.
        let ctx = TxContext::new(seller, 6);
        let position_id = market
            .create_auction(&ctx, item_id, U256::from(8), 11, eth(50))
            .unwrap();
        market
            .bid(
                &TxContext::with_payment(addr(2), eth(60), 10),
                position_id,
            )
            .unwrap();
        assert_eq!(
            market
                .unlist(&TxContext::new(seller, 20), position_id)
                .unwrap_err(),
            LedgerError::InvalidStateForOperation
        );
    }
}
