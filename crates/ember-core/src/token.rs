//! Base fungible token
//!
//! A minimal owned token: balances, allowances, owner-gated mint/burn.
//! The secondary paired asset and the LGE receipt tokens are built on it.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::asset::Fungible;
use crate::error::{CoreError, Result};
use crate::types::{Address, Amount};

/// Static token descriptor
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Owned fungible token with delegated transfers
pub struct BaseToken {
    info: TokenInfo,
    owner: RwLock<Address>,
    balances: RwLock<HashMap<Address, Amount>>,
    allowances: RwLock<HashMap<Address, HashMap<Address, Amount>>>,
    total_supply: RwLock<Amount>,
}

impl BaseToken {
    pub fn new(name: &str, symbol: &str, owner: Address) -> Self {
        Self {
            info: TokenInfo {
                name: name.to_string(),
                symbol: symbol.to_string(),
                decimals: 18,
            },
            owner: RwLock::new(owner),
            balances: RwLock::new(HashMap::new()),
            allowances: RwLock::new(HashMap::new()),
            total_supply: RwLock::new(0),
        }
    }

    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    pub fn owner(&self) -> Address {
        *self.owner.read()
    }

    pub fn total_supply(&self) -> Amount {
        *self.total_supply.read()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .read()
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner() {
            return Err(CoreError::Forbidden(self.info.symbol.clone()));
        }
        Ok(())
    }

    pub fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        *self.owner.write() = new_owner;
        Ok(())
    }

    pub fn mint(&self, caller: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.ensure_owner(caller)?;
        let mut balances = self.balances.write();
        *balances.entry(*to).or_insert(0) += amount;
        *self.total_supply.write() += amount;
        debug!(token = %self.info.symbol, %to, amount, "mint");
        Ok(())
    }

    pub fn burn(&self, caller: &Address, from: &Address, amount: Amount) -> Result<()> {
        self.ensure_owner(caller)?;
        let mut balances = self.balances.write();
        let balance = balances.get(from).copied().unwrap_or(0);
        if balance < amount {
            return Err(CoreError::BurnExceedsBalance(self.info.symbol.clone()));
        }
        balances.insert(*from, balance - amount);
        *self.total_supply.write() -= amount;
        debug!(token = %self.info.symbol, %from, amount, "burn");
        Ok(())
    }

    pub fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<()> {
        let mut balances = self.balances.write();
        let from_balance = balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(CoreError::SubtractionExceedsBalance(
                self.info.symbol.clone(),
            ));
        }
        balances.insert(*from, from_balance - amount);
        *balances.entry(*to).or_insert(0) += amount;
        Ok(())
    }

    pub fn approve(&self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .write()
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    pub fn transfer_from(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()> {
        let allowed = self.allowance(from, caller);
        if allowed < amount {
            return Err(CoreError::TransferExceedsAllowance(
                self.info.symbol.clone(),
            ));
        }
        self.transfer(from, to, amount)?;
        self.allowances
            .write()
            .entry(*from)
            .or_default()
            .insert(*caller, allowed - amount);
        Ok(())
    }
}

impl Fungible for BaseToken {
    fn label(&self) -> String {
        self.info.symbol.clone()
    }

    fn balance_of(&self, account: &Address) -> Amount {
        BaseToken::balance_of(self, account)
    }

    fn transfer(&self, from: &Address, to: &Address, amount: Amount, _now: u64) -> Result<()> {
        BaseToken::transfer(self, from, to, amount)
    }

    fn transfer_as(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
        _now: u64,
    ) -> Result<()> {
        if caller == from {
            return BaseToken::transfer(self, from, to, amount);
        }
        self.transfer_from(caller, from, to, amount)
    }
}
