//! # Marketplace Ledger
//!
//! The ledger aggregate: item and position arenas keyed by monotonic id,
//! secondary indices maintained transactionally alongside them, the
//! pull-payment balance map, and the administration / migration surface.
//!
//! Listing, sale, auction, raffle and loan transitions live in sibling
//! modules as further `impl` blocks on [`Marketplace`].
//!
//! ## Invariants
//!
//! - Every guard is checked before any mutation; a returned error implies
//!   no state change (registry transfers run after validation and before
//!   ledger mutation, so a failed transfer also leaves the ledger intact).
//! - Secondary indices (`by_state`, `by_owner`, `by_item`) are updated in
//!   the same call as the arenas, never recomputed.
//! - Balances are only ever credited by settlements and debited by the
//!   balance owner's own `withdraw`.

use crate::domain::entities::{
    Item, MarketConfig, Position, PositionKind, PositionState, Sale, MAX_FEE_BPS,
};
use crate::domain::errors::LedgerError;
use crate::domain::settlement;
use crate::events::MarketEvent;
use crate::ports::outbound::{AssetRegistry, EntropySource};
use shared_types::{
    Address, BasisPoints, FeeKind, ItemId, PositionId, TokenId, TxContext, U256,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// The marketplace ledger.
///
/// Generic over the asset registry capability; the entropy source is held
/// as a trait object so test wiring can substitute a deterministic one.
pub struct Marketplace<R: AssetRegistry> {
    /// Configuration (owner, custody account, fee table, cutover latch).
    pub(crate) config: MarketConfig,
    /// External asset registry.
    pub(crate) registry: R,
    /// Raffle-draw entropy.
    pub(crate) entropy: Box<dyn EntropySource>,

    /// All items, keyed by id.
    pub(crate) items: BTreeMap<ItemId, Item>,
    /// All live positions, keyed by id.
    pub(crate) positions: BTreeMap<PositionId, Position>,
    /// (asset contract, token) -> item.
    pub(crate) item_lookup: HashMap<(Address, TokenId), ItemId>,

    /// Positions per state kind.
    pub(crate) by_state: HashMap<PositionKind, BTreeSet<PositionId>>,
    /// Positions per owner.
    pub(crate) by_owner: HashMap<Address, BTreeSet<PositionId>>,
    /// Positions per item.
    pub(crate) by_item: HashMap<ItemId, BTreeSet<PositionId>>,

    /// Pending withdrawals per address.
    pub(crate) balances: HashMap<Address, U256>,

    /// Last assigned item id.
    pub(crate) current_item_id: u64,
    /// Last assigned position id.
    pub(crate) current_position_id: u64,

    /// Append-only event journal for off-chain indexers.
    pub(crate) journal: Vec<MarketEvent>,
}

impl<R: AssetRegistry> Marketplace<R> {
    /// Creates a ledger over `registry` with the given entropy source.
    #[must_use]
    pub fn new(config: MarketConfig, registry: R, entropy: Box<dyn EntropySource>) -> Self {
        Self {
            config,
            registry,
            entropy,
            items: BTreeMap::new(),
            positions: BTreeMap::new(),
            item_lookup: HashMap::new(),
            by_state: HashMap::new(),
            by_owner: HashMap::new(),
            by_item: HashMap::new(),
            balances: HashMap::new(),
            current_item_id: 0,
            current_position_id: 0,
            journal: Vec::new(),
        }
    }

    // =========================================================================
    // ITEM REGISTRATION & UNIT SYNC
    // =========================================================================

    /// Registers an item for `(asset_contract, token_id)`.
    ///
    /// If the pair is already registered, the caller's externally-held units
    /// are reconciled into an Available position instead; with nothing to
    /// reconcile the call fails with `DuplicateItem`.
    pub fn register_item(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
    ) -> Result<ItemId, LedgerError> {
        self.ensure_active()?;

        if let Some(&item_id) = self.item_lookup.get(&(asset_contract, token_id)) {
            let wallet = self.registry.balance_of(ctx.caller, token_id);
            if wallet <= self.tracked_available(item_id, ctx.caller) {
                return Err(LedgerError::DuplicateItem(item_id));
            }
            self.sync_held_units(ctx, item_id, ctx.caller)?;
            return Ok(item_id);
        }

        self.current_item_id += 1;
        let item_id = ItemId::new(self.current_item_id);
        self.items.insert(
            item_id,
            Item {
                item_id,
                asset_contract,
                token_id,
                creator: ctx.caller,
                position_count: 0,
                sales: Vec::new(),
            },
        );
        self.item_lookup.insert((asset_contract, token_id), item_id);
        self.journal.push(MarketEvent::ItemRegistered {
            item_id,
            asset_contract,
            token_id,
            creator: ctx.caller,
        });
        info!(item_id = %item_id, creator = %ctx.caller, "item registered");

        // Import whatever the creator already holds in their wallet.
        self.sync_held_units(ctx, item_id, ctx.caller)?;
        Ok(item_id)
    }

    /// Reconciles `holder`'s registry balance into their Available position.
    ///
    /// Detects units transferred outside the marketplace — in either
    /// direction — and imports them into a fresh Available position (or
    /// shrinks the stale one). Callable by anyone for any holder: it only
    /// aligns ledger records with registry balances and moves no funds.
    pub fn sync_held_units(
        &mut self,
        _ctx: &TxContext,
        item_id: ItemId,
        holder: Address,
    ) -> Result<Option<PositionId>, LedgerError> {
        let token_id = self.item(item_id)?.token_id;
        let wallet = self.registry.balance_of(holder, token_id);

        match self.find_available(item_id, holder) {
            Some(position_id) if wallet.is_zero() => {
                self.remove_position(position_id)?;
                debug!(position_id = %position_id, holder = %holder, "available position drained");
                Ok(None)
            }
            Some(position_id) => {
                let position = self.position_mut(position_id)?;
                if position.amount != wallet {
                    debug!(
                        position_id = %position_id,
                        holder = %holder,
                        tracked = %position.amount,
                        wallet = %wallet,
                        "available position re-synced"
                    );
                    position.amount = wallet;
                }
                Ok(Some(position_id))
            }
            None if wallet.is_zero() => Ok(None),
            None => Ok(Some(self.insert_position(
                item_id,
                holder,
                wallet,
                U256::zero(),
                0,
                PositionState::Available,
            ))),
        }
    }

    // =========================================================================
    // FUNDS
    // =========================================================================

    /// Pending balance of `addr`.
    #[must_use]
    pub fn address_balance(&self, addr: Address) -> U256 {
        self.balances.get(&addr).copied().unwrap_or_default()
    }

    /// Withdraws the caller's entire pending balance.
    ///
    /// Returns the amount debited; the execution environment performs the
    /// actual outbound transfer. Pull-payments are the only path out of the
    /// balance map.
    pub fn withdraw(&mut self, ctx: &TxContext) -> Result<U256, LedgerError> {
        let amount = self
            .balances
            .remove(&ctx.caller)
            .filter(|amount| !amount.is_zero())
            .ok_or(LedgerError::NothingToWithdraw)?;
        self.journal.push(MarketEvent::BalanceWithdrawn {
            owner: ctx.caller,
            amount,
        });
        info!(owner = %ctx.caller, amount = %amount, "balance withdrawn");
        Ok(amount)
    }

    // =========================================================================
    // ADMINISTRATION (owner-only; driven by governance)
    // =========================================================================

    /// Changes the fee rate for one transaction type.
    ///
    /// Open positions keep the rate snapshotted at their creation.
    pub fn set_market_fee(
        &mut self,
        ctx: &TxContext,
        kind: FeeKind,
        fee_bps: BasisPoints,
    ) -> Result<(), LedgerError> {
        self.only_owner(ctx)?;
        if fee_bps > MAX_FEE_BPS {
            return Err(LedgerError::FeeOutOfRange(fee_bps));
        }
        self.config.fees.set(kind, fee_bps);
        self.journal.push(MarketEvent::FeeChanged { kind, fee_bps });
        info!(?kind, fee_bps, "market fee changed");
        Ok(())
    }

    /// Rewires the migration target contract.
    pub fn set_migrator(
        &mut self,
        ctx: &TxContext,
        migrator: Option<Address>,
    ) -> Result<(), LedgerError> {
        self.only_owner(ctx)?;
        self.config.migrator = migrator;
        self.journal.push(MarketEvent::MigratorChanged { migrator });
        Ok(())
    }

    /// Transfers platform ownership (and with it fee custody and the admin
    /// surface) to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        ctx: &TxContext,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        self.only_owner(ctx)?;
        if new_owner.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let previous_owner = self.config.owner;
        self.config.owner = new_owner;
        self.journal.push(MarketEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        info!(previous = %previous_owner, new = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Sets the one-way retired latch.
    ///
    /// Afterwards every listing-creating entry point fails, while reads,
    /// bids and entries on open positions, settlement completion and
    /// withdrawals stay live so in-flight positions resolve during cutover.
    pub fn retire(&mut self, ctx: &TxContext) -> Result<(), LedgerError> {
        self.only_owner(ctx)?;
        if self.config.retired {
            return Err(LedgerError::AlreadyRetired);
        }
        self.config.retired = true;
        self.journal.push(MarketEvent::MarketRetired);
        info!("marketplace retired");
        Ok(())
    }

    // =========================================================================
    // MIGRATION SNAPSHOTS
    // =========================================================================

    /// Last assigned item id (migration counter).
    #[must_use]
    pub fn current_item_id(&self) -> u64 {
        self.current_item_id
    }

    /// Last assigned position id (migration counter).
    #[must_use]
    pub fn current_position_id(&self) -> u64 {
        self.current_position_id
    }

    /// One page of items, in id order. Requires the retired latch so the
    /// snapshot cannot race new listings. Pages are 1-based.
    pub fn snapshot_items(
        &self,
        page_size: usize,
        page: usize,
    ) -> Result<(Vec<Item>, usize), LedgerError> {
        self.ensure_retired()?;
        Self::page_of(self.items.values(), self.items.len(), page_size, page)
    }

    /// One page of live positions, in id order. Same guards as
    /// [`Marketplace::snapshot_items`].
    pub fn snapshot_positions(
        &self,
        page_size: usize,
        page: usize,
    ) -> Result<(Vec<Position>, usize), LedgerError> {
        self.ensure_retired()?;
        Self::page_of(
            self.positions.values(),
            self.positions.len(),
            page_size,
            page,
        )
    }

    fn page_of<'a, T: Clone + 'a>(
        values: impl Iterator<Item = &'a T>,
        total: usize,
        page_size: usize,
        page: usize,
    ) -> Result<(Vec<T>, usize), LedgerError> {
        if page_size == 0 {
            return Err(LedgerError::PageOutOfBounds {
                page,
                total_pages: 0,
            });
        }
        let total_pages = total.div_ceil(page_size);
        let in_range = page >= 1 && (page <= total_pages || (page == 1 && total_pages == 0));
        if !in_range {
            return Err(LedgerError::PageOutOfBounds { page, total_pages });
        }
        let items = values
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();
        Ok((items, total_pages))
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    /// The item with this id.
    pub fn item(&self, item_id: ItemId) -> Result<&Item, LedgerError> {
        self.items
            .get(&item_id)
            .ok_or(LedgerError::UnknownItem(item_id))
    }

    /// The position with this id.
    pub fn position(&self, position_id: PositionId) -> Result<&Position, LedgerError> {
        self.positions
            .get(&position_id)
            .ok_or(LedgerError::UnknownPosition(position_id))
    }

    /// All live positions in one state, in id order.
    #[must_use]
    pub fn positions_by_state(&self, kind: PositionKind) -> Vec<&Position> {
        self.by_state
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|id| self.positions.get(id))
            .collect()
    }

    /// All of `owner`'s live positions, in id order.
    #[must_use]
    pub fn address_positions(&self, owner: Address) -> Vec<&Position> {
        self.by_owner
            .get(&owner)
            .into_iter()
            .flatten()
            .filter_map(|id| self.positions.get(id))
            .collect()
    }

    /// All of `item_id`'s live positions, in id order.
    #[must_use]
    pub fn item_positions(&self, item_id: ItemId) -> Vec<&Position> {
        self.by_item
            .get(&item_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.positions.get(id))
            .collect()
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of live positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Current fee rate for one transaction type.
    #[must_use]
    pub fn market_fee(&self, kind: FeeKind) -> BasisPoints {
        self.config.fees.rate(kind)
    }

    /// Platform owner address.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.config.owner
    }

    /// Custody account for escrowed units.
    #[must_use]
    pub fn market_account(&self) -> Address {
        self.config.market_account
    }

    /// Migration target, if wired.
    #[must_use]
    pub fn migrator(&self) -> Option<Address> {
        self.config.migrator
    }

    /// Whether the retired latch is set.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.config.retired
    }

    /// The append-only event journal.
    #[must_use]
    pub fn journal(&self) -> &[MarketEvent] {
        &self.journal
    }

    /// Read access to the asset registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Mutable access to the asset registry, for wiring and tests.
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    // =========================================================================
    // INTERNAL: GUARDS
    // =========================================================================

    pub(crate) fn only_owner(&self, ctx: &TxContext) -> Result<(), LedgerError> {
        if ctx.caller == self.config.owner {
            Ok(())
        } else {
            Err(LedgerError::NotOwner)
        }
    }

    pub(crate) fn ensure_active(&self) -> Result<(), LedgerError> {
        if self.config.retired {
            Err(LedgerError::AlreadyRetired)
        } else {
            Ok(())
        }
    }

    fn ensure_retired(&self) -> Result<(), LedgerError> {
        if self.config.retired {
            Ok(())
        } else {
            Err(LedgerError::NotRetired)
        }
    }

    // =========================================================================
    // INTERNAL: ARENA & INDEX MAINTENANCE
    // =========================================================================

    pub(crate) fn position_mut(
        &mut self,
        position_id: PositionId,
    ) -> Result<&mut Position, LedgerError> {
        self.positions
            .get_mut(&position_id)
            .ok_or(LedgerError::UnknownPosition(position_id))
    }

    /// Inserts a new position and updates every index transactionally.
    pub(crate) fn insert_position(
        &mut self,
        item_id: ItemId,
        owner: Address,
        amount: U256,
        price: U256,
        market_fee_bps: BasisPoints,
        state: PositionState,
    ) -> PositionId {
        self.current_position_id += 1;
        let position_id = PositionId::new(self.current_position_id);
        let position = Position {
            position_id,
            item_id,
            owner,
            amount,
            price,
            market_fee_bps,
            state,
        };
        let kind = position.kind();

        self.by_state.entry(kind).or_default().insert(position_id);
        self.by_owner.entry(owner).or_default().insert(position_id);
        self.by_item.entry(item_id).or_default().insert(position_id);
        self.positions.insert(position_id, position);
        if let Some(item) = self.items.get_mut(&item_id) {
            item.position_count += 1;
        }

        self.journal.push(MarketEvent::PositionCreated {
            position_id,
            item_id,
            owner,
            amount,
            kind,
        });
        position_id
    }

    /// Removes a position from the arena and every index.
    pub(crate) fn remove_position(
        &mut self,
        position_id: PositionId,
    ) -> Result<Position, LedgerError> {
        let position = self
            .positions
            .remove(&position_id)
            .ok_or(LedgerError::UnknownPosition(position_id))?;
        if let Some(set) = self.by_state.get_mut(&position.kind()) {
            set.remove(&position_id);
        }
        if let Some(set) = self.by_owner.get_mut(&position.owner) {
            set.remove(&position_id);
        }
        if let Some(set) = self.by_item.get_mut(&position.item_id) {
            set.remove(&position_id);
        }
        Ok(position)
    }

    /// The holder's Available position for an item, if one exists.
    pub(crate) fn find_available(&self, item_id: ItemId, holder: Address) -> Option<PositionId> {
        let owned = self.by_owner.get(&holder)?;
        let in_item = self.by_item.get(&item_id)?;
        owned
            .iter()
            .filter(|id| in_item.contains(id))
            .find(|id| {
                self.positions
                    .get(id)
                    .is_some_and(|p| p.kind() == PositionKind::Available)
            })
            .copied()
    }

    /// Units of `item_id` the holder has tracked as Available.
    #[must_use]
    pub fn tracked_available(&self, item_id: ItemId, holder: Address) -> U256 {
        self.find_available(item_id, holder)
            .and_then(|id| self.positions.get(&id))
            .map(|p| p.amount)
            .unwrap_or_default()
    }

    /// Adds units to the holder's Available position, creating it if absent.
    pub(crate) fn upsert_available(
        &mut self,
        item_id: ItemId,
        holder: Address,
        amount: U256,
    ) -> Result<PositionId, LedgerError> {
        match self.find_available(item_id, holder) {
            Some(position_id) => {
                let position = self.position_mut(position_id)?;
                position.amount = position
                    .amount
                    .checked_add(amount)
                    .ok_or(LedgerError::AmountOverflow)?;
                Ok(position_id)
            }
            None => Ok(self.insert_position(
                item_id,
                holder,
                amount,
                U256::zero(),
                0,
                PositionState::Available,
            )),
        }
    }

    /// Takes `amount` units out of the caller's Available position and
    /// escrows them into market custody. Runs a sync first so externally
    /// received units count.
    pub(crate) fn consume_available(
        &mut self,
        ctx: &TxContext,
        item_id: ItemId,
        amount: U256,
    ) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        self.sync_held_units(ctx, item_id, ctx.caller)?;

        let available = self.tracked_available(item_id, ctx.caller);
        if available < amount {
            return Err(LedgerError::InsufficientAvailableUnits {
                requested: amount,
                available,
            });
        }

        let token_id = self.item(item_id)?.token_id;
        let market_account = self.config.market_account;
        self.registry
            .transfer(ctx.caller, market_account, token_id, amount)?;

        let position_id = self
            .find_available(item_id, ctx.caller)
            .ok_or(LedgerError::InsufficientAvailableUnits {
                requested: amount,
                available: U256::zero(),
            })?;
        let position = self.position_mut(position_id)?;
        position.amount -= amount;
        if position.amount.is_zero() {
            self.remove_position(position_id)?;
        }
        Ok(())
    }

    /// Returns escrowed units to `holder`'s wallet and Available position.
    pub(crate) fn release_escrow(
        &mut self,
        item_id: ItemId,
        holder: Address,
        amount: U256,
    ) -> Result<PositionId, LedgerError> {
        let token_id = self.item(item_id)?.token_id;
        let market_account = self.config.market_account;
        self.registry
            .transfer(market_account, holder, token_id, amount)?;
        self.upsert_available(item_id, holder, amount)
    }

    /// Credits a pending balance. Zero credits and the zero address are
    /// skipped (a token without royalty terms reports the zero address).
    pub(crate) fn credit(&mut self, addr: Address, amount: U256) {
        if amount.is_zero() || addr.is_zero() {
            return;
        }
        let balance = self.balances.entry(addr).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Shared settlement leg: royalty lookup, three-way split, unit
    /// handover to the buyer, sale record and journal entry. Returns the
    /// buyer's Available position.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn settle_sale(
        &mut self,
        position_id: PositionId,
        item_id: ItemId,
        seller: Address,
        buyer: Address,
        amount: U256,
        gross: U256,
        fee_bps: BasisPoints,
    ) -> Result<PositionId, LedgerError> {
        let token_id = self.item(item_id)?.token_id;
        let (royalty_receiver, royalty) = self.registry.royalty_info(token_id, gross);
        let split = settlement::split_payment(gross, royalty_receiver, royalty, fee_bps);

        let market_account = self.config.market_account;
        self.registry
            .transfer(market_account, buyer, token_id, amount)?;

        let platform_owner = self.config.owner;
        self.credit(split.royalty_receiver, split.royalty);
        self.credit(platform_owner, split.fee);
        self.credit(seller, split.seller_proceeds);

        let item = self
            .items
            .get_mut(&item_id)
            .ok_or(LedgerError::UnknownItem(item_id))?;
        item.sales.push(Sale {
            seller,
            buyer,
            amount,
            price: gross,
        });
        self.journal.push(MarketEvent::SaleCompleted {
            item_id,
            position_id,
            seller,
            buyer,
            amount,
            price: gross,
        });
        let buyer_position = self.upsert_available(item_id, buyer, amount)?;

        info!(
            position_id = %position_id,
            item_id = %item_id,
            seller = %seller,
            buyer = %buyer,
            gross = %gross,
            royalty = %split.royalty,
            fee = %split.fee,
            "sale settled"
        );
        Ok(buyer_position)
    }
}

// =============================================================================
// TESTS
// =============================================================================
