//! Two-slot rolling balance history
//!
//! Each account keeps the balance it held in the two most recent windows it
//! was active in. The burn entitlement reads the newest record that is at
//! least one full window old, so fresh receipts earn nothing until a window
//! boundary passes.

use ember_core::{apply_basis_points, Amount, BASIS_POINTS_DIVISOR};
use serde::{Deserialize, Serialize};

/// Rolling (slot, balance) pair history of length two
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub slot0: u64,
    pub balance0: Amount,
    pub slot1: u64,
    pub balance1: Amount,
}

impl LedgerEntry {
    /// Record the post-operation balance for the current window
    pub fn record(&mut self, slot: u64, balance: Amount) {
        if self.slot1 == slot {
            self.balance1 = balance;
        } else {
            self.slot0 = self.slot1;
            self.balance0 = self.balance1;
            self.slot1 = slot;
            self.balance1 = balance;
        }
    }

    /// Balance gating the entitlement at `slot`
    ///
    /// The newest record older than the current window wins: `balance1`
    /// once its window has closed, otherwise `balance0` (which is always
    /// older than `slot1` when the two differ).
    pub fn reference_balance(&self, slot: u64) -> Amount {
        if self.slot1 < slot {
            self.balance1
        } else {
            self.balance0
        }
    }

    /// Entitlement at `slot` as a basis-point fraction of the reference
    pub fn entitlement(&self, slot: u64, basis_points: u64) -> Amount {
        apply_basis_points(self.reference_balance(slot), basis_points)
    }

    /// Consume entitlement worth `amount` by shrinking the reference
    ///
    /// The reference loses `ceil(amount / basis_points)` so that repeated
    /// burns within one window never exceed the window's entitlement.
    pub fn consume(&mut self, slot: u64, amount: Amount, basis_points: u64) {
        if basis_points == 0 {
            return;
        }
        let bps = basis_points as Amount;
        let reference = (amount * BASIS_POINTS_DIVISOR + bps - 1) / bps;
        if self.slot1 < slot {
            self.balance1 = self.balance1.saturating_sub(reference);
        } else {
            self.balance0 = self.balance0.saturating_sub(reference);
        }
    }

    /// Zero the entitlement for the current window
    pub fn zero(&mut self, slot: u64) {
        if self.slot1 < slot {
            self.balance1 = 0;
        } else {
            self.balance0 = 0;
        }
    }
}
