//! Core type definitions for the Ember protocol
//!
//! Amounts are 18-decimal fixed point carried in `u128`; percentages are
//! basis points (0-10000). All divisions round down.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount at 18-decimal fixed point
pub type Amount = u128;

/// One whole token (10^18 base units)
pub const ONE: Amount = 1_000_000_000_000_000_000;

/// Denominator for basis-point percentages
pub const BASIS_POINTS_DIVISOR: Amount = 10_000;

/// Scale `amount` by `basis_points / 10000`, rounding down
pub fn apply_basis_points(amount: Amount, basis_points: u64) -> Amount {
    amount / BASIS_POINTS_DIVISOR * basis_points as Amount
        + amount % BASIS_POINTS_DIVISOR * basis_points as Amount / BASIS_POINTS_DIVISOR
}

/// Address - identity of an account or protocol component
///
/// 32 bytes, conventionally derived from a label hash for protocol
/// components and test accounts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address {
    id: [u8; 32],
}

impl Address {
    /// Zero address (burn sink, unset references)
    pub const ZERO: Self = Self { id: [0u8; 32] };

    pub const fn new(id: [u8; 32]) -> Self {
        Self { id }
    }

    /// Derive an address from a human-readable label
    pub fn from_label(label: &str) -> Self {
        Self {
            id: *blake3::hash(label.as_bytes()).as_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.id
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }

    pub fn is_zero(&self) -> bool {
        self.id == [0u8; 32]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..12])
    }
}

/// Error taxonomy shared by every protocol component
///
/// Each crate's error enum maps its variants onto one of these kinds so
/// embedders can classify failures without matching on component enums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Capability-restricted call from an unauthorized caller
    Authorization,
    /// Operation invalid in the current phase
    State,
    /// Zero or malformed numeric input
    Value,
    /// Insufficient balance, allowance or liquidity
    Balance,
    /// Parameter outside configured bounds
    Limit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Value => "value",
            Self::Balance => "balance",
            Self::Limit => "limit",
        };
        write!(f, "{}", name)
    }
}
