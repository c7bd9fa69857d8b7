//! Error types for the floor treasury

use ember_core::{CoreError, ErrorKind};
use ember_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for floor operations
pub type Result<T> = std::result::Result<T, FloorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FloorError {
    /// The computed refund rounds to nothing
    #[error("Floor: refund amount is zero")]
    ZeroRefund,

    #[error("Floor: insufficient value")]
    InsufficientValue,

    #[error("Floor: arithmetic overflow")]
    Overflow,

    /// Ledger-side failure, reason string passed through untouched
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Native coin failure, reason string passed through untouched
    #[error(transparent)]
    Coin(#[from] CoreError),
}

impl FloorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroRefund | Self::InsufficientValue | Self::Overflow => ErrorKind::Value,
            Self::Ledger(err) => err.kind(),
            Self::Coin(err) => err.kind(),
        }
    }
}
