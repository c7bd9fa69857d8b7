//! The floor treasury
//!
//! Holds native capital and prices redemptions against live total supply.
//! Pure functions of (capital, total_supply) plus a capital counter that
//! mirrors the component's native balance 1:1.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use ember_core::{apply_basis_points, mul_div, Address, Amount, CoinLedger};
use ember_ledger::ElasticToken;

use crate::error::{FloorError, Result};

/// Payout fraction of the pre-fee backing ratio; the remaining 10% stays
/// in the treasury
pub const REFUND_BASIS_POINTS: u64 = 9_000;

pub struct Floor {
    address: Address,
    ledger: Arc<ElasticToken>,
    coin: Arc<CoinLedger>,
    capital: RwLock<Amount>,
}

impl Floor {
    pub fn new(address: Address, ledger: Arc<ElasticToken>, coin: Arc<CoinLedger>) -> Self {
        Self {
            address,
            ledger,
            coin,
            capital: RwLock::new(0),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Backing capital; mirrors the native balance held at the floor address
    pub fn capital(&self) -> Amount {
        *self.capital.read()
    }

    /// Accept capital from `from`, increasing the backing
    pub fn fund(&self, from: &Address, value: Amount) -> Result<()> {
        self.coin.transfer(from, &self.address, value)?;
        *self.capital.write() += value;
        info!(%from, value, capital = self.capital(), "floor funded");
        Ok(())
    }

    /// Native coin paid out for destroying `burn_amount` tokens
    ///
    /// `capital * burn_amount / total_supply`, then the 90% payout
    /// fraction, floor division at each step.
    pub fn get_refund_amount(&self, burn_amount: Amount) -> Result<Amount> {
        let total_supply = self.ledger.total_supply();
        if total_supply == 0 {
            return Ok(0);
        }
        let pre_fee = mul_div(self.capital(), burn_amount, total_supply)
            .ok_or(FloorError::Overflow)?;
        Ok(apply_basis_points(pre_fee, REFUND_BASIS_POINTS))
    }

    /// Destroy `burn_amount` of the caller's tokens for their pro-rata
    /// share of the capital
    pub fn refund(
        &self,
        caller: &Address,
        receiver: &Address,
        burn_amount: Amount,
        now: u64,
    ) -> Result<Amount> {
        let refund_amount = self.get_refund_amount(burn_amount)?;
        if refund_amount == 0 {
            return Err(FloorError::ZeroRefund);
        }
        self.ledger.burn(&self.address, caller, burn_amount, now)?;
        *self.capital.write() -= refund_amount;
        self.coin.transfer(&self.address, receiver, refund_amount)?;
        info!(%caller, %receiver, burn_amount, refund_amount, "floor refund");
        Ok(refund_amount)
    }

    /// Token issuance ceiling for `eth_in` of incoming capital
    ///
    /// The exchange rate implied by treating the whole treasury as 1:1
    /// backing; the minter caps its quotes with this.
    pub fn get_max_mint_amount(&self, eth_in: Amount) -> Result<Amount> {
        let capital = self.capital();
        if capital == 0 {
            return Ok(0);
        }
        mul_div(self.ledger.total_supply(), eth_in, capital).ok_or(FloorError::Overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ONE;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    /// 1000 EMBR supply, 2000 max, floor wired as the burn authority
    fn setup() -> (Arc<ElasticToken>, Arc<CoinLedger>, Floor, Address) {
        let gov = addr("gov");
        let ledger = Arc::new(ElasticToken::new(
            gov,
            addr("fund"),
            1_000 * ONE,
            2_000 * ONE,
            0,
        ));
        let coin = Arc::new(CoinLedger::new());
        let floor = Floor::new(addr("floor"), ledger.clone(), coin.clone());
        ledger.set_floor(&gov, floor.address()).unwrap();
        (ledger, coin, floor, gov)
    }

    #[test]
    fn test_fund_tracks_capital() {
        let (_, coin, floor, gov) = setup();
        coin.deposit(&gov, 7 * ONE);

        assert_eq!(floor.capital(), 0);
        floor.fund(&gov, 7 * ONE).unwrap();
        assert_eq!(floor.capital(), 7 * ONE);
        assert_eq!(coin.balance_of(&floor.address()), 7 * ONE);
    }

    #[test]
    fn test_get_refund_amount() {
        let (_, coin, floor, gov) = setup();
        let burn_amount = 10 * ONE;
        assert_eq!(floor.get_refund_amount(burn_amount).unwrap(), 0);

        coin.deposit(&gov, 300 * ONE);
        floor.fund(&gov, 300 * ONE).unwrap();

        // 10 / 1000 * 300, minus the 10% fee
        assert_eq!(
            floor.get_refund_amount(burn_amount).unwrap(),
            27 * ONE / 10
        );
    }

    #[test]
    fn test_get_max_mint_amount() {
        let (_, coin, floor, gov) = setup();
        assert_eq!(floor.get_max_mint_amount(1).unwrap(), 0);

        coin.deposit(&gov, 200 * ONE);
        floor.fund(&gov, 200 * ONE).unwrap();
        assert_eq!(floor.get_max_mint_amount(1).unwrap(), 5);
    }

    #[test]
    fn test_refund() {
        let (ledger, coin, floor, gov) = setup();
        let (user, receiver) = (addr("user"), addr("receiver"));
        ledger.transfer(&gov, &user, 100 * ONE, 0).unwrap();

        let err = floor.refund(&user, &receiver, 10 * ONE, 0).unwrap_err();
        assert_eq!(err.to_string(), "Floor: refund amount is zero");

        coin.deposit(&gov, 300 * ONE);
        floor.fund(&gov, 300 * ONE).unwrap();

        // 1 wei of burn still rounds to zero payout
        let err = floor.refund(&user, &receiver, 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "Floor: refund amount is zero");

        let supply_before = ledger.total_supply();
        let refunded = floor.refund(&user, &receiver, 10 * ONE, 0).unwrap();

        let expected = apply_basis_points(
            mul_div(300 * ONE, 10 * ONE, supply_before).unwrap(),
            REFUND_BASIS_POINTS,
        );
        assert_eq!(refunded, expected);
        assert_eq!(coin.balance_of(&receiver), expected);
        assert_eq!(floor.capital(), 300 * ONE - expected);
        assert_eq!(ledger.total_supply(), supply_before - 10 * ONE);
        assert_eq!(ledger.balance_of(&user), 90 * ONE);
    }

    #[test]
    fn test_refund_sequence_improves_backing() {
        // capital 300 against a supply of 1000
        let gov = addr("gov");
        let ledger = Arc::new(ElasticToken::new(
            gov,
            addr("fund"),
            1_000 * ONE,
            2_000 * ONE,
            0,
        ));
        let coin = Arc::new(CoinLedger::new());
        let floor = Floor::new(addr("floor"), ledger.clone(), coin.clone());
        ledger.set_floor(&gov, floor.address()).unwrap();
        coin.deposit(&gov, 300 * ONE);
        floor.fund(&gov, 300 * ONE).unwrap();

        let first = floor.get_refund_amount(10 * ONE).unwrap();
        assert_eq!(first, 2_700_000_000_000_000_000); // 2.7

        floor.refund(&gov, &gov, 10 * ONE, 0).unwrap();
        assert_eq!(floor.capital(), 300 * ONE - first);
        assert_eq!(ledger.total_supply(), 990 * ONE);

        // 10 / 990 * 297.3 * 0.9 ~= 2.7027, strictly above the first quote
        let second = floor.get_refund_amount(10 * ONE).unwrap();
        assert_eq!(second, 2_702_727_272_727_272_727);
        assert!(second > first);
    }

    #[test]
    fn test_refund_never_beats_backing_ratio() {
        let (_, coin, floor, gov) = setup();
        coin.deposit(&gov, 300 * ONE);
        floor.fund(&gov, 300 * ONE).unwrap();

        for burn in [1, ONE / 7, 3 * ONE, 999 * ONE] {
            let refund = floor.get_refund_amount(burn).unwrap();
            // the fee keeps every payout at or below the pre-fee backing ratio
            let pre_fee = mul_div(300 * ONE, burn, 1_000 * ONE).unwrap();
            assert!(refund <= pre_fee);
            assert!(refund >= apply_basis_points(pre_fee, REFUND_BASIS_POINTS).saturating_sub(1));
        }
    }
}
