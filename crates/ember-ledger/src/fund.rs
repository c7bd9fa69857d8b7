//! Fee fund splitter
//!
//! Destination of the fund-routed transfer fees. Two receivers share every
//! withdrawal 90/10; each receiver can rotate its own address. Wired with a
//! zero-fee transfer override so withdrawals move the full amount.

use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use ember_core::{apply_basis_points, Address, Amount, ErrorKind};

use crate::token::ElasticToken;

/// Receiver A's share of every withdrawal
pub const RECEIVER_A_BASIS_POINTS: u64 = 9_000;

/// Result type alias for fund operations
pub type Result<T> = std::result::Result<T, FundError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundError {
    #[error("Fund: forbidden")]
    Forbidden,

    #[error("Fund: {0}")]
    Ledger(String),
}

impl FundError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden => ErrorKind::Authorization,
            Self::Ledger(_) => ErrorKind::Balance,
        }
    }
}

/// Splits accumulated transfer fees between two receivers
pub struct FeeFund {
    address: Address,
    receiver_a: RwLock<Address>,
    receiver_b: RwLock<Address>,
}

impl FeeFund {
    pub fn new(address: Address, receiver_a: Address, receiver_b: Address) -> Self {
        Self {
            address,
            receiver_a: RwLock::new(receiver_a),
            receiver_b: RwLock::new(receiver_b),
        }
    }

    /// The ledger address fees accumulate at
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn receiver_a(&self) -> Address {
        *self.receiver_a.read()
    }

    pub fn receiver_b(&self) -> Address {
        *self.receiver_b.read()
    }

    pub fn set_receiver_a(&self, caller: &Address, receiver: Address) -> Result<()> {
        if *caller != self.receiver_a() {
            return Err(FundError::Forbidden);
        }
        *self.receiver_a.write() = receiver;
        Ok(())
    }

    pub fn set_receiver_b(&self, caller: &Address, receiver: Address) -> Result<()> {
        if *caller != self.receiver_b() {
            return Err(FundError::Forbidden);
        }
        *self.receiver_b.write() = receiver;
        Ok(())
    }

    /// Pay out `amount` of accumulated fees, split 90/10
    ///
    /// Either receiver may trigger a withdrawal.
    pub fn withdraw(&self, caller: &Address, token: &ElasticToken, amount: Amount, now: u64) -> Result<()> {
        if *caller != self.receiver_a() && *caller != self.receiver_b() {
            return Err(FundError::Forbidden);
        }
        if token.balance_of(&self.address) < amount {
            return Err(FundError::Ledger(
                "subtraction amount exceeds balance".to_string(),
            ));
        }
        let to_a = apply_basis_points(amount, RECEIVER_A_BASIS_POINTS);
        let to_b = amount - to_a;
        token
            .transfer(&self.address, &self.receiver_a(), to_a, now)
            .map_err(|e| FundError::Ledger(e.to_string()))?;
        token
            .transfer(&self.address, &self.receiver_b(), to_b, now)
            .map_err(|e| FundError::Ledger(e.to_string()))?;
        info!(amount, to_a, to_b, "fund withdrawal");
        Ok(())
    }
}
