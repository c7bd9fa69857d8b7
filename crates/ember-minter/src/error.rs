//! Error types for the minter

use ember_core::{CoreError, ErrorKind};
use ember_floor::FloorError;
use ember_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for minter operations
pub type Result<T> = std::result::Result<T, MinterError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinterError {
    #[error("Minter: forbidden")]
    Forbidden,

    #[error("Minter: not active")]
    NotActive,

    #[error("Minter: already active")]
    AlreadyActive,

    /// Activation with a zero virtual reserve
    #[error("Minter: insufficient reserve")]
    InsufficientReserve,

    /// Mint with no capital attached
    #[error("Minter: insufficient value")]
    InsufficientValue,

    /// The curve quote rounds to nothing
    #[error("Minter: mint amount is zero")]
    ZeroMintAmount,

    #[error("Minter: arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Floor(#[from] FloorError),

    #[error(transparent)]
    Coin(#[from] CoreError),
}

impl MinterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden => ErrorKind::Authorization,
            Self::NotActive | Self::AlreadyActive => ErrorKind::State,
            Self::InsufficientReserve | Self::InsufficientValue | Self::ZeroMintAmount
            | Self::Overflow => ErrorKind::Value,
            Self::Ledger(err) => err.kind(),
            Self::Floor(err) => err.kind(),
            Self::Coin(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(MinterError::NotActive.to_string(), "Minter: not active");
        assert_eq!(
            MinterError::InsufficientValue.to_string(),
            "Minter: insufficient value"
        );
        assert_eq!(
            MinterError::ZeroMintAmount.to_string(),
            "Minter: mint amount is zero"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(MinterError::Forbidden.kind(), ErrorKind::Authorization);
        assert_eq!(MinterError::NotActive.kind(), ErrorKind::State);
        assert_eq!(MinterError::InsufficientValue.kind(), ErrorKind::Value);
    }
}
