//! Error types for the liquidity pairs

use ember_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Result type alias for AMM operations
pub type Result<T> = std::result::Result<T, AmmError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Deadline passed before the operation executed
    #[error("Pair: expired")]
    Expired,

    #[error("Pair: insufficient input amount")]
    InsufficientInputAmount,

    /// Output below the caller's minimum (or zero)
    #[error("Pair: insufficient output amount")]
    InsufficientOutputAmount,

    #[error("Pair: insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// Caller holds fewer liquidity units than requested
    #[error("Pair: insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Factory: pair exists")]
    PairExists,

    #[error("Pair: arithmetic overflow")]
    Overflow,

    /// Asset-leg failure, reason string passed through untouched
    #[error(transparent)]
    Asset(#[from] CoreError),
}

impl AmmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Expired | Self::PairExists => ErrorKind::State,
            Self::InsufficientInputAmount | Self::InsufficientLiquidityMinted | Self::Overflow => {
                ErrorKind::Value
            }
            Self::InsufficientOutputAmount | Self::InsufficientLiquidity => ErrorKind::Balance,
            Self::Asset(err) => err.kind(),
        }
    }
}
