//! # Ember LGE
//!
//! The liquidity generation event: a fixed contribution window that turns
//! one-time native-coin contributions into durable paired liquidity.
//!
//! Phases run `Uninitialized -> Open -> Ended`, one way. While open,
//! contributions split between immediate floor backing, a market-rate
//! conversion into the secondary asset, and retained native value. At the
//! bootstrap instant the distributor mints tokens priced at the floor
//! rate, seeds the native/token and secondary/token pools, fixes each
//! receipt token's redemption rate, and activates the minter. Receipts
//! then redeem for proportional pool liquidity at any time past the
//! unlock.

pub mod distributor;
pub mod error;
pub mod receipt;

pub use distributor::{Distributor, DistributorParams, LgePhase, LgeWiring};
pub use error::{LgeError, Result};
pub use receipt::{ReceiptToken, RedemptionSnapshot};
