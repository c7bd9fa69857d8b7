//! # Ember Minter
//!
//! Primary issuance priced off a virtual constant-product pool:
//!
//! ```text
//!   token_reserve = max_supply - total_supply      (recomputed live)
//!   out = token_reserve - eth_reserve * token_reserve / (eth_reserve + in)
//!   out = min(out, floor.get_max_mint_amount(in))  (floor cap wins)
//! ```
//!
//! Activated once by the distributor at the end of the LGE; received
//! capital is forwarded to the floor within the same operation.

pub mod error;
pub mod minter;

pub use error::{MinterError, Result};
pub use minter::Minter;
