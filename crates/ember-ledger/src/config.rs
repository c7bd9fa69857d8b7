//! Ledger configuration registry
//!
//! All mutable protocol parameters live here, owned by the ledger and
//! changed only through its governance-gated setters. Fee parameters are
//! basis points and bounded by `MAX_FEE_BASIS_POINTS` per component.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use ember_core::Address;

use crate::error::{LedgerError, Result};

/// Hard ceiling for any single transfer-fee component
pub const MAX_FEE_BASIS_POINTS: u64 = 500;

/// Hard ceiling for the per-interval rebase rate
pub const MAX_REBASE_BASIS_POINTS: u64 = 500;

/// Default transfer routing: 0.93% sender burn, 0.07% sender fund
pub const DEFAULT_SENDER_BURN_BASIS_POINTS: u64 = 93;
pub const DEFAULT_SENDER_FUND_BASIS_POINTS: u64 = 7;
pub const DEFAULT_RECEIVER_BURN_BASIS_POINTS: u64 = 0;
pub const DEFAULT_RECEIVER_FUND_BASIS_POINTS: u64 = 0;

/// Share of the burn entitlement paid to the caller of an assisted burn
pub const DEFAULT_ASSISTED_REWARD_BASIS_POINTS: u64 = 6_666;

/// Delay before governance may touch default routing after genesis
pub const GOV_HANDOVER_DELAY: u64 = 7 * 24 * 60 * 60;

/// Per-account burn/fund routing percentages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    pub sender_burn_basis_points: u64,
    pub sender_fund_basis_points: u64,
    pub receiver_burn_basis_points: u64,
    pub receiver_fund_basis_points: u64,
}

impl TransferConfig {
    /// Routing that moves the full amount with no deductions
    pub const FREE: Self = Self {
        sender_burn_basis_points: 0,
        sender_fund_basis_points: 0,
        receiver_burn_basis_points: 0,
        receiver_fund_basis_points: 0,
    };

    pub fn validate(&self) -> Result<()> {
        let fees = [
            self.sender_burn_basis_points,
            self.sender_fund_basis_points,
            self.receiver_burn_basis_points,
            self.receiver_fund_basis_points,
        ];
        if fees.iter().any(|bps| *bps > MAX_FEE_BASIS_POINTS) {
            return Err(LedgerError::FeeExceedsLimit);
        }
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            sender_burn_basis_points: DEFAULT_SENDER_BURN_BASIS_POINTS,
            sender_fund_basis_points: DEFAULT_SENDER_FUND_BASIS_POINTS,
            receiver_burn_basis_points: DEFAULT_RECEIVER_BURN_BASIS_POINTS,
            receiver_fund_basis_points: DEFAULT_RECEIVER_FUND_BASIS_POINTS,
        }
    }
}

/// Governance-owned registry of addresses, routing and entitlement knobs
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Governance identity (a timelock wrapper in production wiring)
    pub gov: Address,
    /// Destination of fund-routed transfer fees
    pub fund: Address,
    /// Project metadata
    pub website: String,

    /// One-shot component authorities
    pub minter: Option<Address>,
    pub floor: Option<Address>,
    pub distributor: Option<Address>,

    pub default_transfer: TransferConfig,
    pub overrides: HashMap<Address, TransferConfig>,
    /// Callers whose transfers skip every deduction (pools, routers)
    pub exemptions: HashSet<Address>,

    /// Burn-entitlement fraction of the window-start balance
    pub entitlement_basis_points: u64,
    /// Width of the entitlement window in seconds
    pub entitlement_interval: u64,
    /// Assisted-burn reward share
    pub assisted_reward_basis_points: u64,

    /// Default routing stays frozen until this time
    pub gov_handover_time: u64,
}

impl LedgerConfig {
    pub fn new(gov: Address, fund: Address, genesis_time: u64) -> Self {
        Self {
            gov,
            fund,
            website: "https://ember.datachain.one/".to_string(),
            minter: None,
            floor: None,
            distributor: None,
            default_transfer: TransferConfig::default(),
            overrides: HashMap::new(),
            exemptions: HashSet::new(),
            entitlement_basis_points: 300,
            entitlement_interval: 7 * 24 * 60 * 60,
            assisted_reward_basis_points: DEFAULT_ASSISTED_REWARD_BASIS_POINTS,
            gov_handover_time: genesis_time + GOV_HANDOVER_DELAY,
        }
    }

    /// Routing applied to the transfer initiator (sender side)
    pub fn sender_config(&self, caller: &Address) -> TransferConfig {
        self.overrides
            .get(caller)
            .copied()
            .unwrap_or(self.default_transfer)
    }

    /// Routing applied to the receiving account
    pub fn receiver_config(&self, receiver: &Address) -> TransferConfig {
        self.overrides
            .get(receiver)
            .copied()
            .unwrap_or(self.default_transfer)
    }

    pub fn is_exempt(&self, caller: &Address) -> bool {
        self.exemptions.contains(caller)
    }
}
