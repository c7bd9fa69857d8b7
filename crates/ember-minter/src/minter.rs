//! The primary issuance engine
//!
//! Quotes come from a virtual constant-product pool whose token side is the
//! unissued supply (`max_supply - total_supply`), recomputed on every read.
//! Burns anywhere in the system therefore enlarge future mint capacity
//! without any notification channel. Capital received is not retained: it
//! is forwarded to the floor in the same operation, so every mint deepens
//! the backing.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use ember_core::{mul_div, Address, Amount, CoinLedger};
use ember_floor::Floor;
use ember_ledger::ElasticToken;

use crate::error::{MinterError, Result};

struct MinterState {
    active: bool,
    eth_reserve: Amount,
}

pub struct Minter {
    address: Address,
    /// Only this identity may activate issuance
    distributor: Address,
    ledger: Arc<ElasticToken>,
    floor: Arc<Floor>,
    coin: Arc<CoinLedger>,
    state: RwLock<MinterState>,
}

impl Minter {
    pub fn new(
        address: Address,
        distributor: Address,
        ledger: Arc<ElasticToken>,
        floor: Arc<Floor>,
        coin: Arc<CoinLedger>,
    ) -> Self {
        Self {
            address,
            distributor,
            ledger,
            floor,
            coin,
            state: RwLock::new(MinterState {
                active: false,
                eth_reserve: 0,
            }),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn is_active(&self) -> bool {
        self.state.read().active
    }

    pub fn eth_reserve(&self) -> Amount {
        self.state.read().eth_reserve
    }

    /// Unissued supply, the elastic token side of the virtual pool
    pub fn token_reserve(&self) -> Amount {
        self.ledger
            .max_supply()
            .saturating_sub(self.ledger.total_supply())
    }

    /// One-way activation; the initial reserve anchors the curve's price
    pub fn enable_mint(&self, caller: &Address, initial_eth_reserve: Amount) -> Result<()> {
        if *caller != self.distributor {
            return Err(MinterError::Forbidden);
        }
        let mut state = self.state.write();
        if state.active {
            return Err(MinterError::AlreadyActive);
        }
        if initial_eth_reserve == 0 {
            return Err(MinterError::InsufficientReserve);
        }
        state.active = true;
        state.eth_reserve = initial_eth_reserve;
        info!(initial_eth_reserve, "minting enabled");
        Ok(())
    }

    /// Tokens issued for `eth_in`: the constant-product quote, never above
    /// the floor-implied rate
    pub fn get_mint_amount(&self, eth_in: Amount) -> Result<Amount> {
        let state = self.state.read();
        if !state.active {
            return Ok(0);
        }
        let token_reserve = self.token_reserve();
        let new_eth_reserve = state.eth_reserve + eth_in;
        let kept = mul_div(state.eth_reserve, token_reserve, new_eth_reserve)
            .ok_or(MinterError::Overflow)?;
        let curve_amount = token_reserve - kept;
        let floor_cap = self.floor.get_max_mint_amount(eth_in)?;
        Ok(curve_amount.min(floor_cap))
    }

    /// Issue tokens to `receiver` for the attached capital
    pub fn mint(&self, caller: &Address, receiver: &Address, value: Amount, now: u64) -> Result<Amount> {
        if !self.is_active() {
            return Err(MinterError::NotActive);
        }
        if value == 0 {
            return Err(MinterError::InsufficientValue);
        }
        let mint_amount = self.get_mint_amount(value)?;
        if mint_amount == 0 {
            return Err(MinterError::ZeroMintAmount);
        }

        self.coin.transfer(caller, &self.address, value)?;
        self.ledger.mint(&self.address, receiver, mint_amount, now)?;
        self.state.write().eth_reserve += value;
        self.floor.fund(&self.address, value)?;
        info!(%receiver, value, mint_amount, "minted");
        Ok(mint_amount)
    }
}
