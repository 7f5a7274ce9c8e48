//! # Collateralized Loan
//!
//! Borrowers escrow units as collateral against a proposed principal and
//! premium. Funding starts the clock; repayment releases the collateral,
//! and a missed deadline lets the lender keep it. The platform fee is
//! charged once, on the principal at funding time — repayment and
//! liquidation move no fees.

use crate::domain::entities::{LoanData, PositionState};
use crate::domain::errors::LedgerError;
use crate::domain::ledger::Marketplace;
use crate::domain::settlement;
use crate::events::MarketEvent;
use crate::ports::outbound::AssetRegistry;
use shared_types::{
    Address, FeeKind, ItemId, PositionId, TokenId, TxContext, SECONDS_PER_MINUTE, U256,
};
use tracing::info;

impl<R: AssetRegistry> Marketplace<R> {
    /// Proposes a loan: escrows `amount` units as collateral against a
    /// `loan_amount` principal and `fee_amount` premium.
    ///
    /// The deadline stays unset until a lender funds the proposal.
    pub fn propose_loan(
        &mut self,
        ctx: &TxContext,
        item_id: ItemId,
        amount: U256,
        loan_amount: U256,
        fee_amount: U256,
        duration_minutes: u64,
    ) -> Result<PositionId, LedgerError> {
        self.ensure_active()?;
        if loan_amount.is_zero() {
            return Err(LedgerError::ZeroPayment);
        }
        self.consume_available(ctx, item_id, amount)?;

        let fee_bps = self.market_fee(FeeKind::Loan);
        let position_id = self.insert_position(
            item_id,
            ctx.caller,
            amount,
            U256::zero(),
            fee_bps,
            PositionState::Loan(LoanData {
                loan_amount,
                fee_amount,
                duration_minutes,
                deadline: 0,
                lender: None,
            }),
        );
        info!(
            position_id = %position_id,
            item_id = %item_id,
            borrower = %ctx.caller,
            collateral = %amount,
            loan_amount = %loan_amount,
            fee_amount = %fee_amount,
            "loan proposed"
        );
        Ok(position_id)
    }

    /// Registers (or re-syncs) an item and proposes a loan in one atomic
    /// call. Journal order: `ItemRegistered` first, then the loan's
    /// `PositionCreated`.
    #[allow(clippy::too_many_arguments)]
    pub fn register_and_loan(
        &mut self,
        ctx: &TxContext,
        asset_contract: Address,
        token_id: TokenId,
        amount: U256,
        loan_amount: U256,
        fee_amount: U256,
        duration_minutes: u64,
    ) -> Result<(ItemId, PositionId), LedgerError> {
        let item_id = self.register_or_sync(ctx, asset_contract, token_id)?;
        let position_id = self.propose_loan(
            ctx,
            item_id,
            amount,
            loan_amount,
            fee_amount,
            duration_minutes,
        )?;
        Ok((item_id, position_id))
    }

    /// Cancels an unfunded loan proposal and returns the collateral.
    /// Borrower-only.
    pub fn cancel_loan_proposal(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Loan(loan) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if position.owner != ctx.caller {
            return Err(LedgerError::NotOwner);
        }
        if loan.lender.is_some() {
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
        info!(position_id = %position_id, borrower = %ctx.caller, "loan proposal cancelled");
        Ok(())
    }

    /// Funds a loan proposal with exactly the principal.
    ///
    /// Starts the repayment clock and credits the borrower the principal
    /// net of the platform fee (snapshotted Loan rate, charged on the
    /// principal).
    pub fn fund_loan(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Loan(loan) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if loan.lender.is_some() {
            return Err(LedgerError::InvalidStateForOperation);
        }
        if ctx.payment != loan.loan_amount {
            return Err(LedgerError::IncorrectPayment {
                expected: loan.loan_amount,
                actual: ctx.payment,
            });
        }

        let borrower = position.owner;
        let loan_amount = loan.loan_amount;
        let duration_minutes = loan.duration_minutes;
        let fee = settlement::platform_fee(loan_amount, position.market_fee_bps);
        let deadline = ctx.now + duration_minutes * SECONDS_PER_MINUTE;
        let lender = ctx.caller;

        let platform_owner = self.owner();
        self.credit(borrower, loan_amount - fee);
        self.credit(platform_owner, fee);

        let position = self.position_mut(position_id)?;
        let PositionState::Loan(loan) = &mut position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        loan.lender = Some(lender);
        loan.deadline = deadline;

        self.journal.push(MarketEvent::LoanFunded {
            position_id,
            lender,
            deadline,
        });
        info!(
            position_id = %position_id,
            lender = %lender,
            borrower = %borrower,
            principal = %loan_amount,
            fee = %fee,
            deadline,
            "loan funded"
        );
        Ok(())
    }

    /// Repays a funded loan with exactly principal plus premium.
    ///
    /// Borrower-only. The lender is credited the full repayment and the
    /// collateral returns to the borrower. Repayment stays open past the
    /// deadline until the lender actually liquidates.
    pub fn repay_loan(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Loan(loan) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if position.owner != ctx.caller {
            return Err(LedgerError::NotOwner);
        }
        let Some(lender) = loan.lender else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        let expected = loan
            .loan_amount
            .checked_add(loan.fee_amount)
            .ok_or(LedgerError::AmountOverflow)?;
        if ctx.payment != expected {
            return Err(LedgerError::IncorrectPayment {
                expected,
                actual: ctx.payment,
            });
        }

        let item_id = position.item_id;
        let amount = position.amount;
        self.release_escrow(item_id, ctx.caller, amount)?;
        self.remove_position(position_id)?;
        self.credit(lender, ctx.payment);
        self.journal.push(MarketEvent::LoanRepaid {
            position_id,
            borrower: ctx.caller,
            lender,
            payment: ctx.payment,
        });
        info!(
            position_id = %position_id,
            borrower = %ctx.caller,
            lender = %lender,
            payment = %ctx.payment,
            "loan repaid"
        );
        Ok(())
    }

    /// Claims the collateral of a defaulted loan. Lender-only, after the
    /// deadline. No funds move; the lender simply keeps the collateral as
    /// a new Available position.
    pub fn liquidate_loan(
        &mut self,
        ctx: &TxContext,
        position_id: PositionId,
    ) -> Result<(), LedgerError> {
        let position = self.position(position_id)?;
        let PositionState::Loan(loan) = &position.state else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        let Some(lender) = loan.lender else {
            return Err(LedgerError::InvalidStateForOperation);
        };
        if lender != ctx.caller {
            return Err(LedgerError::NotOwner);
        }
        if ctx.now < loan.deadline {
            return Err(LedgerError::DeadlineNotReached {
                deadline: loan.deadline,
                now: ctx.now,
            });
        }

        let item_id = position.item_id;
        let amount = position.amount;
        self.release_escrow(item_id, lender, amount)?;
        self.remove_position(position_id)?;
        self.journal.push(MarketEvent::LoanLiquidated {
            position_id,
            lender,
        });
        info!(
            position_id = %position_id,
            lender = %lender,
            collateral = %amount,
            "loan liquidated"
        );
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
