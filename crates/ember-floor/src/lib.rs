//! # Ember Floor
//!
//! Capital treasury backing the token's minimum redemption rate. Any holder
//! may destroy tokens for a pro-rata share of the capital, which
//! lower-bounds the market price; the retained 10% fee improves the backing
//! ratio for everyone else. The same capital-to-supply ratio caps primary
//! issuance so the minter can never sell below the floor.

pub mod error;
pub mod floor;

pub use error::{FloorError, Result};
pub use floor::{Floor, REFUND_BASIS_POINTS};
