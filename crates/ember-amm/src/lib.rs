//! # Ember AMM
//!
//! Reference constant-product pool collaborator. The distributor seeds its
//! bootstrap liquidity here and receipt redemption withdraws it; the
//! protocol otherwise only assumes the narrow surface implemented in this
//! crate: pair creation, add/remove liquidity, exact-in swaps and balance
//! queries at constant-product pricing.
//!
//! Pairs hold token legs only; native value enters through the 1:1
//! `WrappedCoin`. Pair and wrapper addresses are expected on the elastic
//! ledger's fee-exemption list so pool math is undistorted.

pub mod error;
pub mod factory;
pub mod pair;
pub mod wcoin;

pub use error::{AmmError, Result};
pub use factory::AmmFactory;
pub use pair::{Pair, MINIMUM_LIQUIDITY};
pub use wcoin::WrappedCoin;
