//! Governance driving the marketplace: quorum-gated fee changes,
//! retirement, and the fee pull-and-split flow against real ledger
//! balances.

#[cfg(test)]
mod tests {
    use crate::integration::support::{
        addr, eth, market_owned_by, seed_item, LedgerGateway,
    };
    use market_governance::prelude::*;
    use market_ledger::prelude::*;
    use shared_types::{AdminCall, Address, FeeKind, TxContext, U256};

    // The marketplace is deployed with the governance contract address as
    // platform owner, so fees accrue to it and only it holds the admin
    // surface.

    fn owners() -> Vec<Address> {
        vec![addr(1), addr(2), addr(3)]
    }

    #[test]
    fn test_quorum_gated_fee_change_reaches_ledger() {
        let governance_addr = addr(0x70);
        let mut market = market_owned_by(governance_addr);
        let mut multisig = GovernanceMultisig::new(owners(), 2).unwrap();

        // Direct privileged calls from an owner address are rejected by
        // the ledger: only the governance address holds the surface.
        let rogue = TxContext::new(addr(1), 0);
        assert_eq!(
            market
                .set_market_fee(&rogue, FeeKind::RegularSale, 350)
                .unwrap_err(),
            LedgerError::NotOwner
        );

        let call = AdminCall::SetMarketFee {
            kind: FeeKind::RegularSale,
            fee_bps: 350,
        };
        let id = multisig
            .propose_transaction(
                &TxContext::new(addr(1), 0),
                governance_addr,
                U256::zero(),
                call,
            )
            .unwrap();

        // Below quorum the ledger is untouched.
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 10);
        assert!(matches!(
            multisig
                .execute(&TxContext::new(addr(1), 10), id, &mut gateway)
                .unwrap_err(),
            GovernanceError::QuorumNotMet { .. }
        ));
        assert_eq!(market.market_fee(FeeKind::RegularSale), 250);

        multisig.approve(&TxContext::new(addr(2), 20), id).unwrap();
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 30);
        multisig
            .execute(&TxContext::new(addr(3), 30), id, &mut gateway)
            .unwrap();
        assert_eq!(market.market_fee(FeeKind::RegularSale), 350);
    }

    #[test]
    fn test_quorum_gated_retirement_latches_ledger() {
        let governance_addr = addr(0x70);
        let mut market = market_owned_by(governance_addr);
        let mut multisig = GovernanceMultisig::new(owners(), 2).unwrap();
        let seller = addr(8);
        let item_id = seed_item(&mut market, seller, addr(9), 10);

        let id = multisig
            .propose_transaction(
                &TxContext::new(addr(1), 0),
                governance_addr,
                U256::zero(),
                AdminCall::Retire,
            )
            .unwrap();
        multisig.approve(&TxContext::new(addr(2), 1), id).unwrap();
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 2);
        multisig
            .execute(&TxContext::new(addr(1), 2), id, &mut gateway)
            .unwrap();

        assert!(market.is_retired());
        let seller_ctx = TxContext::new(seller, 3);
        assert_eq!(
            market
                .list_for_sale(&seller_ctx, item_id, U256::from(1), eth(1))
                .unwrap_err(),
            LedgerError::AlreadyRetired
        );

        // Retiring twice surfaces the ledger's rejection through the
        // gateway and leaves the proposal pending.
        let id = multisig
            .propose_transaction(
                &TxContext::new(addr(1), 4),
                governance_addr,
                U256::zero(),
                AdminCall::Retire,
            )
            .unwrap();
        multisig.approve(&TxContext::new(addr(3), 5), id).unwrap();
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 6);
        let err = multisig
            .execute(&TxContext::new(addr(1), 6), id, &mut gateway)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Gateway(_)));
        assert!(multisig.proposal(id).unwrap().is_active());
    }

    #[test]
    fn test_fee_pull_splits_real_ledger_balance() {
        let governance_addr = addr(0x70);
        let mut market = market_owned_by(governance_addr);
        let mut multisig = GovernanceMultisig::new(owners(), 2).unwrap();
        let seller = addr(8);
        let buyer = addr(9);

        // A 100 ETH sale with no royalty: the whole 2.5% fee accrues to
        // the governance address.
        let token = market.registry_mut().mint(seller, U256::from(1), None);
        let ctx = TxContext::new(seller, 0);
        let (_, position_id) = market
            .register_and_list(&ctx, addr(0xAA), token, U256::from(1), eth(100))
            .unwrap();
        market
            .buy(
                &TxContext::with_payment(buyer, eth(100), 10),
                position_id,
                U256::from(1),
            )
            .unwrap();

        let fee = eth(100) * U256::from(250) / U256::from(10_000);
        assert_eq!(market.address_balance(governance_addr), fee);

        // Pull and split across three owners; remainder stays in custody.
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 20);
        let pulled = multisig
            .pull_from_marketplace(&TxContext::new(addr(1), 20), &mut gateway)
            .unwrap();
        assert_eq!(pulled, fee);
        assert!(market.address_balance(governance_addr).is_zero());

        let share = fee / U256::from(3);
        for owner in owners() {
            assert_eq!(multisig.address_balance(owner), share);
        }
        assert_eq!(
            multisig.treasury(),
            fee - share * U256::from(3),
        );

        // Each owner withdraws their own share exactly once.
        assert_eq!(
            multisig.withdraw(&TxContext::new(addr(1), 30)).unwrap(),
            share
        );
        assert_eq!(
            multisig
                .withdraw(&TxContext::new(addr(1), 31))
                .unwrap_err(),
            GovernanceError::NothingToWithdraw
        );
        assert_eq!(multisig.address_balance(addr(2)), share);
    }

    #[test]
    fn test_ownership_transfer_back_to_operator() {
        let governance_addr = addr(0x70);
        let operator = addr(0x60);
        let mut market = market_owned_by(governance_addr);
        let mut multisig = GovernanceMultisig::new(owners(), 3).unwrap();

        let id = multisig
            .propose_transaction(
                &TxContext::new(addr(1), 0),
                governance_addr,
                U256::zero(),
                AdminCall::TransferOwnership {
                    new_owner: operator,
                },
            )
            .unwrap();
        multisig.approve(&TxContext::new(addr(2), 1), id).unwrap();

        // Full quorum of 3 required here.
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 2);
        assert!(matches!(
            multisig
                .execute(&TxContext::new(addr(1), 2), id, &mut gateway)
                .unwrap_err(),
            GovernanceError::QuorumNotMet { .. }
        ));

        multisig.approve(&TxContext::new(addr(3), 3), id).unwrap();
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 4);
        multisig
            .execute(&TxContext::new(addr(3), 4), id, &mut gateway)
            .unwrap();

        assert_eq!(market.owner(), operator);
        // The governance address no longer holds the admin surface.
        let mut gateway = LedgerGateway::new(&mut market, governance_addr, 5);
        let id = multisig
            .propose_transaction(
                &TxContext::new(addr(1), 5),
                governance_addr,
                U256::zero(),
                AdminCall::Retire,
            )
            .unwrap();
        multisig.approve(&TxContext::new(addr(2), 6), id).unwrap();
        multisig.approve(&TxContext::new(addr(3), 7), id).unwrap();
        let err = multisig
            .execute(&TxContext::new(addr(1), 8), id, &mut gateway)
            .unwrap_err();
        assert!(matches!(err, GovernanceError::Gateway(_)));
    }
}
