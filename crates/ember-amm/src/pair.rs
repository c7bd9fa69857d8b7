//! Constant-product liquidity pair
//!
//! Reserves are read live from the legs' balances at the pair address, so
//! an elastic leg that decays between operations simply reprices instead of
//! desynchronizing. Swap pricing charges the standard 0.30% fee. Callers
//! approve the pair on token legs; payouts are pair-initiated transfers,
//! which the elastic ledger exempts from fee routing by deployment wiring.

use integer_sqrt::IntegerSquareRoot;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use ember_core::{mul_div, Address, Amount, Fungible};

use crate::error::{AmmError, Result};

/// Liquidity units permanently locked on first mint
pub const MINIMUM_LIQUIDITY: Amount = 1_000;

/// Swap fee in parts per thousand retained by the pool
const FEE_PER_MILLE: Amount = 3;

struct LiquidityBook {
    total: Amount,
    shares: HashMap<Address, Amount>,
}

/// Two-legged constant-product pool with its own liquidity-unit ledger
pub struct Pair {
    address: Address,
    asset0: Arc<dyn Fungible>,
    asset1: Arc<dyn Fungible>,
    book: RwLock<LiquidityBook>,
}

impl std::fmt::Debug for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl Pair {
    pub fn new(address: Address, asset0: Arc<dyn Fungible>, asset1: Arc<dyn Fungible>) -> Self {
        Self {
            address,
            asset0,
            asset1,
            book: RwLock::new(LiquidityBook {
                total: 0,
                shares: HashMap::new(),
            }),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn asset0(&self) -> &Arc<dyn Fungible> {
        &self.asset0
    }

    pub fn asset1(&self) -> &Arc<dyn Fungible> {
        &self.asset1
    }

    /// Live reserves: the legs' balances held at the pair address
    pub fn reserves(&self) -> (Amount, Amount) {
        (
            self.asset0.balance_of(&self.address),
            self.asset1.balance_of(&self.address),
        )
    }

    pub fn total_liquidity(&self) -> Amount {
        self.book.read().total
    }

    pub fn liquidity_of(&self, account: &Address) -> Amount {
        self.book.read().shares.get(account).copied().unwrap_or(0)
    }

    fn ensure_deadline(deadline: u64, now: u64) -> Result<()> {
        if now > deadline {
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    /// Deposit both legs, minting liquidity units to `to`
    pub fn add_liquidity(
        &self,
        caller: &Address,
        amount0: Amount,
        amount1: Amount,
        to: &Address,
        deadline: u64,
        now: u64,
    ) -> Result<Amount> {
        Self::ensure_deadline(deadline, now)?;
        if amount0 == 0 || amount1 == 0 {
            return Err(AmmError::InsufficientInputAmount);
        }
        let (reserve0, reserve1) = self.reserves();

        // size the share before moving anything so a rejected deposit
        // leaves both legs untouched
        let total = self.book.read().total;
        let (liquidity, first_mint) = if total == 0 {
            // geometric mean via per-leg roots; locks the minimum forever
            let seeded = amount0.integer_sqrt() * amount1.integer_sqrt();
            if seeded <= MINIMUM_LIQUIDITY {
                return Err(AmmError::InsufficientLiquidityMinted);
            }
            (seeded - MINIMUM_LIQUIDITY, true)
        } else {
            let by0 = mul_div(amount0, total, reserve0).ok_or(AmmError::Overflow)?;
            let by1 = mul_div(amount1, total, reserve1).ok_or(AmmError::Overflow)?;
            (by0.min(by1), false)
        };
        if liquidity == 0 {
            return Err(AmmError::InsufficientLiquidityMinted);
        }

        self.asset0
            .transfer_as(&self.address, caller, &self.address, amount0, now)?;
        if let Err(err) = self
            .asset1
            .transfer_as(&self.address, caller, &self.address, amount1, now)
        {
            // unwind the first leg
            let _ = self.asset0.transfer(&self.address, caller, amount0, now);
            return Err(err.into());
        }

        let mut book = self.book.write();
        if first_mint {
            book.total = MINIMUM_LIQUIDITY;
            book.shares.insert(Address::ZERO, MINIMUM_LIQUIDITY);
        }
        book.total += liquidity;
        *book.shares.entry(*to).or_insert(0) += liquidity;
        debug!(pair = %self.address, liquidity, "liquidity added");
        Ok(liquidity)
    }

    /// Burn the caller's liquidity units, paying both legs to `to`
    pub fn remove_liquidity(
        &self,
        caller: &Address,
        liquidity: Amount,
        min_amount0: Amount,
        min_amount1: Amount,
        to: &Address,
        deadline: u64,
        now: u64,
    ) -> Result<(Amount, Amount)> {
        Self::ensure_deadline(deadline, now)?;
        let (reserve0, reserve1) = self.reserves();

        let mut book = self.book.write();
        let held = book.shares.get(caller).copied().unwrap_or(0);
        if liquidity == 0 || held < liquidity {
            return Err(AmmError::InsufficientLiquidity);
        }
        let amount0 = mul_div(liquidity, reserve0, book.total).ok_or(AmmError::Overflow)?;
        let amount1 = mul_div(liquidity, reserve1, book.total).ok_or(AmmError::Overflow)?;
        if amount0 < min_amount0 || amount1 < min_amount1 {
            return Err(AmmError::InsufficientOutputAmount);
        }
        book.shares.insert(*caller, held - liquidity);
        book.total -= liquidity;
        drop(book);

        self.asset0.transfer(&self.address, to, amount0, now)?;
        self.asset1.transfer(&self.address, to, amount1, now)?;
        debug!(pair = %self.address, liquidity, amount0, amount1, "liquidity removed");
        Ok((amount0, amount1))
    }

    /// Constant-product quote with the 0.30% fee applied to the input
    pub fn get_amount_out(&self, amount_in: Amount, zero_for_one: bool) -> Result<Amount> {
        let (reserve0, reserve1) = self.reserves();
        let (reserve_in, reserve_out) = if zero_for_one {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };
        if reserve_in == 0 || reserve_out == 0 {
            return Ok(0);
        }
        let amount_in_with_fee = amount_in * (1_000 - FEE_PER_MILLE);
        mul_div(
            amount_in_with_fee,
            reserve_out,
            reserve_in * 1_000 + amount_in_with_fee,
        )
        .ok_or(AmmError::Overflow)
    }

    /// Swap an exact input of one leg for the other
    pub fn swap_exact_in(
        &self,
        caller: &Address,
        zero_for_one: bool,
        amount_in: Amount,
        min_amount_out: Amount,
        to: &Address,
        deadline: u64,
        now: u64,
    ) -> Result<Amount> {
        Self::ensure_deadline(deadline, now)?;
        if amount_in == 0 {
            return Err(AmmError::InsufficientInputAmount);
        }
        let amount_out = self.get_amount_out(amount_in, zero_for_one)?;
        if amount_out == 0 || amount_out < min_amount_out {
            return Err(AmmError::InsufficientOutputAmount);
        }

        let (asset_in, asset_out) = if zero_for_one {
            (&self.asset0, &self.asset1)
        } else {
            (&self.asset1, &self.asset0)
        };
        asset_in.transfer_as(&self.address, caller, &self.address, amount_in, now)?;
        asset_out.transfer(&self.address, to, amount_out, now)?;
        debug!(pair = %self.address, amount_in, amount_out, zero_for_one, "swap");
        Ok(amount_out)
    }
}
