//! # Ember Core
//!
//! Shared building blocks for the Ember protocol:
//!
//! - `Address` / `Amount` - 32-byte identities and 18-decimal amounts
//! - `CoinLedger` - the execution environment's native value ledger
//! - `BaseToken` - minimal owned fungible token (secondary asset, receipts)
//! - `Fungible` - the asset surface liquidity pairs operate over
//! - `mul_div` - 256-bit-intermediate bonding-curve arithmetic
//! - `TimeSource` - wall-clock / manual time for embedders and tests
//!
//! Protocol components live in their own crates (`ember-ledger`,
//! `ember-floor`, `ember-minter`, `ember-amm`, `ember-lge`) and receive
//! caller identity and `now` explicitly from the embedding environment.

pub mod asset;
pub mod clock;
pub mod coin;
pub mod error;
pub mod math;
pub mod token;
pub mod types;

pub use asset::*;
pub use clock::*;
pub use coin::*;
pub use error::*;
pub use math::*;
pub use token::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::Fungible;
    pub use crate::clock::{ManualTimeSource, SystemTimeSource, TimeSource};
    pub use crate::coin::CoinLedger;
    pub use crate::error::{CoreError, Result};
    pub use crate::math::mul_div;
    pub use crate::token::BaseToken;
    pub use crate::types::{
        apply_basis_points, Address, Amount, ErrorKind, BASIS_POINTS_DIVISOR, ONE,
    };
}
