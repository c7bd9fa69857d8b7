//! Fungible asset abstraction
//!
//! Liquidity pairs hold one balance per leg without caring whether the leg
//! is the native coin, a plain token or the elastic ledger token. The trait
//! is the narrow surface they share. `now` rides along because the elastic
//! ledger catches up its rebase divisor on every mutation; time-independent
//! assets ignore it.

use crate::error::Result;
use crate::types::{Address, Amount};

/// A transferable balance-per-address asset
pub trait Fungible: Send + Sync {
    /// Component label used in reason strings
    fn label(&self) -> String;

    fn balance_of(&self, account: &Address) -> Amount;

    /// Move `amount` on the caller's own authority (`caller == from`)
    fn transfer(&self, from: &Address, to: &Address, amount: Amount, now: u64) -> Result<()>;

    /// Move `amount` out of `from` on behalf of `caller`
    ///
    /// Allowance-based assets check the (from, caller) approval; assets
    /// without delegation reject any `caller != from`.
    fn transfer_as(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: u64,
    ) -> Result<()>;
}
