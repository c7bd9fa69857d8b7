//! Error types for the LGE distributor

use ember_amm::AmmError;
use ember_core::{CoreError, ErrorKind};
use ember_floor::FloorError;
use ember_ledger::LedgerError;
use ember_minter::MinterError;
use thiserror::Error;

/// Result type alias for distributor operations
pub type Result<T> = std::result::Result<T, LgeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LgeError {
    // === Phase ===
    #[error("Distributor: not initialized")]
    NotInitialized,

    #[error("Distributor: already initialized")]
    AlreadyInitialized,

    #[error("Distributor: LGE has ended")]
    LgeEnded,

    #[error("Distributor: LGE has not ended")]
    NotEnded,

    #[error("Distributor: already ended")]
    AlreadyEnded,

    /// Liquidity withdrawal before the unlock time
    #[error("Distributor: liquidity is locked")]
    Locked,

    /// Deadline passed before the operation executed
    #[error("Distributor: expired")]
    Expired,

    // === Authorization ===
    #[error("Distributor: forbidden")]
    Forbidden,

    // === Values ===
    #[error("Distributor: insufficient value")]
    InsufficientValue,

    #[error("Distributor: insufficient amount")]
    InsufficientAmount,

    /// Receipt units below the caller's stated minimum
    #[error("Distributor: insufficient receipt amount")]
    InsufficientReceiptOut,

    #[error("Distributor: arithmetic overflow")]
    Overflow,

    // === Balances ===
    #[error("Distributor: burn amount exceeds balance")]
    BurnExceedsBalance,

    // === Wrapped collaborator failures, reasons pass through untouched ===
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Floor(#[from] FloorError),

    #[error(transparent)]
    Minter(#[from] MinterError),

    #[error(transparent)]
    Amm(#[from] AmmError),

    #[error(transparent)]
    Asset(#[from] CoreError),
}

impl LgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::LgeEnded
            | Self::NotEnded
            | Self::AlreadyEnded
            | Self::Locked
            | Self::Expired => ErrorKind::State,
            Self::Forbidden => ErrorKind::Authorization,
            Self::InsufficientValue
            | Self::InsufficientAmount
            | Self::InsufficientReceiptOut
            | Self::Overflow => ErrorKind::Value,
            Self::BurnExceedsBalance => ErrorKind::Balance,
            Self::Ledger(err) => err.kind(),
            Self::Floor(err) => err.kind(),
            Self::Minter(err) => err.kind(),
            Self::Amm(err) => err.kind(),
            Self::Asset(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(LgeError::LgeEnded.to_string(), "Distributor: LGE has ended");
        assert_eq!(
            LgeError::AlreadyInitialized.to_string(),
            "Distributor: already initialized"
        );
        assert_eq!(
            LgeError::BurnExceedsBalance.to_string(),
            "Distributor: burn amount exceeds balance"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(LgeError::LgeEnded.kind(), ErrorKind::State);
        assert_eq!(LgeError::Forbidden.kind(), ErrorKind::Authorization);
        assert_eq!(LgeError::InsufficientValue.kind(), ErrorKind::Value);
        assert_eq!(LgeError::BurnExceedsBalance.kind(), ErrorKind::Balance);
    }
}
