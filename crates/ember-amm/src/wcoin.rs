//! Wrapped native coin
//!
//! Pairs only hold allowance-based token legs, so native value is wrapped
//! 1:1 before pairing.

use std::sync::Arc;

use ember_core::{Address, Amount, BaseToken, CoinLedger, Fungible, Result};

/// 1:1 token wrapper over the native coin ledger
pub struct WrappedCoin {
    address: Address,
    token: BaseToken,
    coin: Arc<CoinLedger>,
}

impl WrappedCoin {
    pub fn new(address: Address, coin: Arc<CoinLedger>) -> Self {
        Self {
            address,
            token: BaseToken::new("Wrapped Coin", "WCOIN", address),
            coin,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn total_supply(&self) -> Amount {
        self.token.total_supply()
    }

    /// Lock native value, receive wrapped units
    pub fn deposit(&self, caller: &Address, value: Amount) -> Result<()> {
        self.coin.transfer(caller, &self.address, value)?;
        self.token.mint(&self.address, caller, value)
    }

    /// Burn wrapped units, release native value
    pub fn withdraw(&self, caller: &Address, amount: Amount) -> Result<()> {
        self.token.burn(&self.address, caller, amount)?;
        self.coin.transfer(&self.address, caller, amount)
    }

    pub fn approve(&self, owner: &Address, spender: &Address, amount: Amount) {
        self.token.approve(owner, spender, amount);
    }
}

impl Fungible for WrappedCoin {
    fn label(&self) -> String {
        self.token.label()
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.token.balance_of(account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: Amount, now: u64) -> Result<()> {
        Fungible::transfer(&self.token, from, to, amount, now)
    }

    fn transfer_as(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: u64,
    ) -> Result<()> {
        self.token.transfer_as(caller, from, to, amount, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let coin = Arc::new(CoinLedger::new());
        let wcoin = WrappedCoin::new(addr("wcoin"), coin.clone());
        let alice = addr("alice");
        coin.deposit(&alice, 100);

        wcoin.deposit(&alice, 60).unwrap();
        assert_eq!(coin.balance_of(&alice), 40);
        assert_eq!(wcoin.balance_of(&alice), 60);
        assert_eq!(wcoin.total_supply(), 60);
        // the wrapper's native balance always matches issued supply
        assert_eq!(coin.balance_of(&wcoin.address()), 60);

        wcoin.withdraw(&alice, 60).unwrap();
        assert_eq!(coin.balance_of(&alice), 100);
        assert_eq!(wcoin.total_supply(), 0);
    }

    #[test]
    fn test_deposit_requires_value() {
        let coin = Arc::new(CoinLedger::new());
        let wcoin = WrappedCoin::new(addr("wcoin"), coin);
        let err = wcoin.deposit(&addr("alice"), 1).unwrap_err();
        assert_eq!(err.to_string(), "Coin: subtraction amount exceeds balance");
    }
}
