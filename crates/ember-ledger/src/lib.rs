//! # Ember Ledger
//!
//! The elastic-supply value ledger at the root of the Ember protocol.
//!
//! - **Rebase**: unshielded balances decay 0.02% per hour through a single
//!   compounding divisor; shielded accounts are frozen at shield-time value
//! - **Fee routing**: transfers burn 0.93% and fund 0.07% by default, with
//!   per-account overrides and an exemption list for pools and routers
//! - **Burn entitlements**: a two-slot rolling window grants each account a
//!   3% weekly burn right, enforceable by anyone through `assisted_burn`
//! - **Capability registry**: minter, floor and distributor identities are
//!   wired once; privileged entry points check the caller against them
//!
//! ```text
//!              transfer(amount)
//!   sender ───────────────────────► receiver
//!     │ 0.93% burn        0.07% fund │
//!     ▼                              ▼
//!   supply (burn portions)        fee fund (90/10 split)
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod fund;
pub mod token;

pub use config::{LedgerConfig, TransferConfig, MAX_FEE_BASIS_POINTS};
pub use entry::LedgerEntry;
pub use error::{LedgerError, Result};
pub use fund::{FeeFund, FundError};
pub use token::{
    AccountState, ElasticToken, DEFAULT_REBASE_BASIS_POINTS, DEFAULT_REBASE_INTERVAL,
    GENESIS_DIVISOR,
};
