//! Native coin ledger
//!
//! Models the execution environment's value transfer: every payable
//! operation in the protocol moves native coin through this ledger, and
//! treasuries cross-check their internal counters against
//! `balance_of(component address)`.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::asset::Fungible;
use crate::error::{CoreError, Result};
use crate::types::{Address, Amount};

const LABEL: &str = "Coin";

/// Per-address native balances
#[derive(Default)]
pub struct CoinLedger {
    balances: RwLock<HashMap<Address, Amount>>,
}

impl CoinLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly issued value to an address
    ///
    /// This is the environment's side of the ledger (genesis allocations,
    /// test faucets); protocol components only ever move existing value.
    pub fn deposit(&self, to: &Address, amount: Amount) {
        let mut balances = self.balances.write();
        *balances.entry(*to).or_insert(0) += amount;
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    /// Total value across all addresses
    pub fn total_value(&self) -> Amount {
        self.balances.read().values().sum()
    }

    pub fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        let mut balances = self.balances.write();
        let from_balance = balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(CoreError::SubtractionExceedsBalance(LABEL.to_string()));
        }
        balances.insert(*from, from_balance - amount);
        *balances.entry(*to).or_insert(0) += amount;
        debug!(%from, %to, amount, "coin transfer");
        Ok(())
    }
}

impl Fungible for CoinLedger {
    fn label(&self) -> String {
        LABEL.to_string()
    }

    fn balance_of(&self, account: &Address) -> Amount {
        CoinLedger::balance_of(self, account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: Amount, _now: u64) -> Result<()> {
        CoinLedger::transfer(self, from, to, amount)
    }

    fn transfer_as(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
        _now: u64,
    ) -> Result<()> {
        // native value has no delegation
        if caller != from {
            return Err(CoreError::Forbidden(LABEL.to_string()));
        }
        CoinLedger::transfer(self, from, to, amount)
    }
}
