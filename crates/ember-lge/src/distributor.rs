//! The LGE distributor
//!
//! Coordinates the one-time capital raise: an open contribution window, a
//! single bootstrap instant that converts everything raised into paired
//! pool liquidity and activates the minter, then open-ended proportional
//! redemption of that liquidity against receipt tokens.
//!
//! ```text
//!   join:     value ─┬─ floor share ──────────► floor.fund
//!                    ├─ swap share ──► wcoin ─► secondary asset (market rate)
//!                    └─ retained native
//!   end_lge:  retained + secondary ─► two pools, minted tokens at the
//!             floor's supply-to-capital rate; leftover native ─► minter
//!   redeem:   receipts ─► liquidity share ─► both pool legs to receiver
//! ```

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use ember_amm::{Pair, WrappedCoin};
use ember_core::{apply_basis_points, mul_div, Address, Amount, BaseToken, CoinLedger};
use ember_floor::Floor;
use ember_ledger::ElasticToken;
use ember_minter::Minter;

use crate::error::{LgeError, Result};
use crate::receipt::ReceiptToken;

/// Contribution split and bootstrap sizing, all basis points
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DistributorParams {
    /// Share of each contribution sent to the floor immediately
    pub floor_basis_points: u64,
    /// Share of each contribution converted to the secondary asset
    pub swap_basis_points: u64,
    /// Share of the retained native balance paired at bootstrap; the
    /// remainder activates the minter
    pub lp_basis_points: u64,
}

impl Default for DistributorParams {
    fn default() -> Self {
        Self {
            floor_basis_points: 5_000,
            swap_basis_points: 2_500,
            lp_basis_points: 9_000,
        }
    }
}

/// Component references wired in at initialization
#[derive(Clone)]
pub struct LgeWiring {
    pub ledger: Arc<ElasticToken>,
    pub floor: Arc<Floor>,
    pub minter: Arc<Minter>,
    pub coin: Arc<CoinLedger>,
    pub wcoin: Arc<WrappedCoin>,
    pub secondary: Arc<BaseToken>,
    /// Elastic token / wrapped coin pool seeded at bootstrap
    pub coin_pair: Arc<Pair>,
    /// Elastic token / secondary asset pool seeded at bootstrap
    pub secondary_pair: Arc<Pair>,
    /// Existing secondary / wrapped-coin market used for join-time swaps
    pub reference_pair: Arc<Pair>,
    pub coin_receipt: Arc<ReceiptToken>,
    pub secondary_receipt: Arc<ReceiptToken>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LgePhase {
    Uninitialized,
    Open,
    Ended,
}

struct LgeState {
    phase: LgePhase,
    wiring: Option<LgeWiring>,
    params: DistributorParams,
    lge_end_time: u64,
    lp_unlock_time: u64,
}

pub struct Distributor {
    address: Address,
    gov: Address,
    state: RwLock<LgeState>,
}

impl Distributor {
    pub fn new(address: Address, gov: Address) -> Self {
        Self {
            address,
            gov,
            state: RwLock::new(LgeState {
                phase: LgePhase::Uninitialized,
                wiring: None,
                params: DistributorParams::default(),
                lge_end_time: 0,
                lp_unlock_time: 0,
            }),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn phase(&self) -> LgePhase {
        self.state.read().phase
    }

    pub fn lge_end_time(&self) -> u64 {
        self.state.read().lge_end_time
    }

    pub fn lp_unlock_time(&self) -> u64 {
        self.state.read().lp_unlock_time
    }

    /// Wire collaborators and open the contribution window; once only
    pub fn initialize(
        &self,
        caller: &Address,
        wiring: LgeWiring,
        params: DistributorParams,
        lge_end_time: u64,
        lp_unlock_time: u64,
    ) -> Result<()> {
        if *caller != self.gov {
            return Err(LgeError::Forbidden);
        }
        let mut state = self.state.write();
        if state.phase != LgePhase::Uninitialized {
            return Err(LgeError::AlreadyInitialized);
        }
        state.wiring = Some(wiring);
        state.params = params;
        state.lge_end_time = lge_end_time;
        state.lp_unlock_time = lp_unlock_time;
        state.phase = LgePhase::Open;
        info!(lge_end_time, lp_unlock_time, "LGE opened");
        Ok(())
    }

    fn open_state(&self) -> Result<(LgeWiring, DistributorParams, u64)> {
        let state = self.state.read();
        match state.phase {
            LgePhase::Uninitialized => Err(LgeError::NotInitialized),
            LgePhase::Ended => Err(LgeError::LgeEnded),
            LgePhase::Open => Ok((
                state.wiring.clone().expect("wiring set with phase"),
                state.params,
                state.lge_end_time,
            )),
        }
    }

    fn ended_state(&self) -> Result<(LgeWiring, u64)> {
        let state = self.state.read();
        match state.phase {
            LgePhase::Uninitialized => Err(LgeError::NotInitialized),
            LgePhase::Open => Err(LgeError::NotEnded),
            LgePhase::Ended => Ok((
                state.wiring.clone().expect("wiring set with phase"),
                state.lp_unlock_time,
            )),
        }
    }

    /// Contribute native value, receiving both receipt tokens 1:1
    pub fn join(
        &self,
        caller: &Address,
        receiver: &Address,
        min_receipt_out: Amount,
        deadline: u64,
        value: Amount,
        now: u64,
    ) -> Result<Amount> {
        let (wiring, params, lge_end_time) = self.open_state()?;
        if now >= lge_end_time {
            return Err(LgeError::LgeEnded);
        }
        if now > deadline {
            return Err(LgeError::Expired);
        }
        if value == 0 {
            return Err(LgeError::InsufficientValue);
        }
        if value < min_receipt_out {
            return Err(LgeError::InsufficientReceiptOut);
        }

        wiring.coin.transfer(caller, &self.address, value)?;

        let floor_share = apply_basis_points(value, params.floor_basis_points);
        if floor_share > 0 {
            wiring.floor.fund(&self.address, floor_share)?;
        }

        let swap_share = apply_basis_points(value, params.swap_basis_points);
        if swap_share > 0 {
            wiring.wcoin.deposit(&self.address, swap_share)?;
            wiring
                .wcoin
                .approve(&self.address, &wiring.reference_pair.address(), swap_share);
            // wrapped coin is leg 1 of the reference market
            wiring.reference_pair.swap_exact_in(
                &self.address,
                false,
                swap_share,
                0,
                &self.address,
                deadline,
                now,
            )?;
        }

        wiring.coin_receipt.mint(&self.address, receiver, value)?;
        wiring.secondary_receipt.mint(&self.address, receiver, value)?;
        info!(%caller, %receiver, value, "joined LGE");
        Ok(value)
    }

    /// Close the window: bootstrap both pools, fix redemption rates and
    /// activate the minter. Permissionless once past the end time.
    pub fn end_lge(&self, caller: &Address, deadline: u64, now: u64) -> Result<()> {
        let (wiring, params, lge_end_time) = {
            let state = self.state.read();
            match state.phase {
                LgePhase::Uninitialized => return Err(LgeError::NotInitialized),
                LgePhase::Ended => return Err(LgeError::AlreadyEnded),
                LgePhase::Open => (
                    state.wiring.clone().expect("wiring set with phase"),
                    state.params,
                    state.lge_end_time,
                ),
            }
        };
        if now < lge_end_time {
            return Err(LgeError::NotEnded);
        }
        if now > deadline {
            return Err(LgeError::Expired);
        }

        // settle decay before quoting the bootstrap ratios
        wiring.ledger.rebase(now);

        let eth_balance = wiring.coin.balance_of(&self.address);
        let secondary_balance = wiring.secondary.balance_of(&self.address);

        // size both token legs at the floor's supply-to-capital rate; the
        // secondary leg is valued through the reference market first
        let lp_eth = apply_basis_points(eth_balance, params.lp_basis_points);
        let tokens_for_coin = wiring.floor.get_max_mint_amount(lp_eth)?;
        let eth_equivalent = if secondary_balance == 0 {
            0
        } else {
            let (secondary_reserve, wcoin_reserve) = wiring.reference_pair.reserves();
            mul_div(secondary_balance, wcoin_reserve, secondary_reserve)
                .ok_or(LgeError::Overflow)?
        };
        let tokens_for_secondary = wiring.floor.get_max_mint_amount(eth_equivalent)?;

        wiring.ledger.mint(
            &self.address,
            &self.address,
            tokens_for_coin + tokens_for_secondary,
            now,
        )?;

        wiring.wcoin.deposit(&self.address, lp_eth)?;
        wiring
            .ledger
            .approve(&self.address, &wiring.coin_pair.address(), tokens_for_coin);
        wiring
            .wcoin
            .approve(&self.address, &wiring.coin_pair.address(), lp_eth);
        let coin_liquidity = wiring.coin_pair.add_liquidity(
            &self.address,
            tokens_for_coin,
            lp_eth,
            &self.address,
            deadline,
            now,
        )?;

        wiring.ledger.approve(
            &self.address,
            &wiring.secondary_pair.address(),
            tokens_for_secondary,
        );
        wiring.secondary.approve(
            &self.address,
            &wiring.secondary_pair.address(),
            secondary_balance,
        );
        let secondary_liquidity = wiring.secondary_pair.add_liquidity(
            &self.address,
            tokens_for_secondary,
            secondary_balance,
            &self.address,
            deadline,
            now,
        )?;

        wiring.coin_receipt.set_snapshot(
            &self.address,
            coin_liquidity,
            wiring.coin_receipt.total_supply(),
        )?;
        wiring.secondary_receipt.set_snapshot(
            &self.address,
            secondary_liquidity,
            wiring.secondary_receipt.total_supply(),
        )?;

        // whatever native value remains both anchors the issuance curve
        // and deepens the backing
        let leftover = wiring.coin.balance_of(&self.address);
        wiring.minter.enable_mint(&self.address, leftover)?;
        wiring.floor.fund(&self.address, leftover)?;

        self.state.write().phase = LgePhase::Ended;
        info!(
            %caller,
            coin_liquidity,
            secondary_liquidity,
            leftover,
            "LGE ended"
        );
        Ok(())
    }

    /// Redeem coin-leg receipts for the proportional share of the
    /// native/token pool; both legs are delivered to `receiver`, the
    /// native one unwrapped
    pub fn remove_liquidity_native(
        &self,
        caller: &Address,
        amount: Amount,
        min_token_out: Amount,
        min_coin_out: Amount,
        receiver: &Address,
        deadline: u64,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        let (wiring, lp_unlock_time) = self.ended_state()?;
        if now < lp_unlock_time {
            return Err(LgeError::Locked);
        }
        if now > deadline {
            return Err(LgeError::Expired);
        }
        if amount == 0 {
            return Err(LgeError::InsufficientAmount);
        }
        if wiring.coin_receipt.balance_of(caller) < amount {
            return Err(LgeError::BurnExceedsBalance);
        }
        let snapshot = wiring.coin_receipt.snapshot().ok_or(LgeError::NotEnded)?;
        let liquidity =
            mul_div(amount, snapshot.ref_balance, snapshot.ref_supply).ok_or(LgeError::Overflow)?;

        let (token_out, wrapped_out) = wiring.coin_pair.remove_liquidity(
            &self.address,
            liquidity,
            min_token_out,
            min_coin_out,
            &self.address,
            deadline,
            now,
        )?;
        wiring.coin_receipt.burn(&self.address, caller, amount)?;

        wiring.wcoin.withdraw(&self.address, wrapped_out)?;
        wiring.coin.transfer(&self.address, receiver, wrapped_out)?;
        wiring
            .ledger
            .transfer(&self.address, receiver, token_out, now)?;
        info!(%caller, %receiver, amount, token_out, wrapped_out, "native leg redeemed");
        Ok((token_out, wrapped_out))
    }

    /// Redeem secondary-leg receipts for the proportional share of the
    /// secondary/token pool, both legs to `receiver`
    pub fn remove_liquidity_secondary(
        &self,
        caller: &Address,
        amount: Amount,
        min_token_out: Amount,
        min_secondary_out: Amount,
        receiver: &Address,
        deadline: u64,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        let (wiring, lp_unlock_time) = self.ended_state()?;
        if now < lp_unlock_time {
            return Err(LgeError::Locked);
        }
        if now > deadline {
            return Err(LgeError::Expired);
        }
        if amount == 0 {
            return Err(LgeError::InsufficientAmount);
        }
        if wiring.secondary_receipt.balance_of(caller) < amount {
            return Err(LgeError::BurnExceedsBalance);
        }
        let snapshot = wiring
            .secondary_receipt
            .snapshot()
            .ok_or(LgeError::NotEnded)?;
        let liquidity =
            mul_div(amount, snapshot.ref_balance, snapshot.ref_supply).ok_or(LgeError::Overflow)?;

        let (token_out, secondary_out) = wiring.secondary_pair.remove_liquidity(
            &self.address,
            liquidity,
            min_token_out,
            min_secondary_out,
            receiver,
            deadline,
            now,
        )?;
        wiring.secondary_receipt.burn(&self.address, caller, amount)?;
        info!(%caller, %receiver, amount, token_out, secondary_out, "secondary leg redeemed");
        Ok((token_out, secondary_out))
    }
}
