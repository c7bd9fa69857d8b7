//! LGE receipt tokens
//!
//! One claim token per paired asset, minted 1:1 with contributed capital
//! during the window. At bootstrap the distributor snapshots the pool
//! liquidity received and the receipt supply outstanding, fixing the
//! receipt-to-liquidity exchange rate forever.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use ember_core::{Address, Amount, BaseToken};

use crate::error::{LgeError, Result};

/// One-shot redemption reference fixed at bootstrap
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionSnapshot {
    /// Pool liquidity units the distributor received for this leg
    pub ref_balance: Amount,
    /// Receipt supply outstanding at the bootstrap instant
    pub ref_supply: Amount,
}

/// Distributor-owned claim token with a redemption snapshot
pub struct ReceiptToken {
    token: BaseToken,
    snapshot: RwLock<Option<RedemptionSnapshot>>,
}

impl ReceiptToken {
    pub fn new(name: &str, symbol: &str, owner: Address) -> Self {
        Self {
            token: BaseToken::new(name, symbol, owner),
            snapshot: RwLock::new(None),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.token.info().symbol
    }

    pub fn total_supply(&self) -> Amount {
        self.token.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.token.balance_of(account)
    }

    pub fn snapshot(&self) -> Option<RedemptionSnapshot> {
        *self.snapshot.read()
    }

    pub fn mint(&self, caller: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.token
            .mint(caller, to, amount)
            .map_err(|_| LgeError::Forbidden)
    }

    pub fn burn(&self, caller: &Address, from: &Address, amount: Amount) -> Result<()> {
        self.token.burn(caller, from, amount).map_err(|err| {
            if err.kind() == ember_core::ErrorKind::Authorization {
                LgeError::Forbidden
            } else {
                LgeError::BurnExceedsBalance
            }
        })
    }

    /// Receipts stay transferable claims until redeemed
    pub fn transfer(&self, caller: &Address, to: &Address, amount: Amount) -> Result<()> {
        self.token
            .transfer(caller, to, amount)
            .map_err(LgeError::from)
    }

    /// Fix the redemption rate; owner-only, once
    pub fn set_snapshot(&self, caller: &Address, ref_balance: Amount, ref_supply: Amount) -> Result<()> {
        if *caller != self.token.owner() {
            return Err(LgeError::Forbidden);
        }
        let mut snapshot = self.snapshot.write();
        if snapshot.is_some() {
            return Err(LgeError::AlreadyEnded);
        }
        *snapshot = Some(RedemptionSnapshot {
            ref_balance,
            ref_supply,
        });
        info!(symbol = self.symbol(), ref_balance, ref_supply, "redemption snapshot fixed");
        Ok(())
    }
}
