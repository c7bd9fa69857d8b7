//! Error types for core asset operations

use crate::types::ErrorKind;
use thiserror::Error;

/// Result type alias for core asset operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the native coin ledger and base tokens
///
/// The leading string is the component label ("Coin", a token symbol, ...)
/// so reason strings keep the `"<Component>: <reason>"` contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Caller is not the owner of a capability-restricted entry point
    #[error("{0}: forbidden")]
    Forbidden(String),

    /// Sender balance is below the requested amount
    #[error("{0}: subtraction amount exceeds balance")]
    SubtractionExceedsBalance(String),

    /// Delegated transfer exceeds the approved amount
    #[error("{0}: transfer amount exceeds allowance")]
    TransferExceedsAllowance(String),

    /// Burn larger than the held balance
    #[error("{0}: burn amount exceeds balance")]
    BurnExceedsBalance(String),

    /// Intermediate computation exceeded 256-bit bounds
    #[error("{0}: arithmetic overflow")]
    Overflow(String),
}

impl CoreError {
    /// Classify the error into the shared taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden(_) => ErrorKind::Authorization,
            Self::SubtractionExceedsBalance(_)
            | Self::TransferExceedsAllowance(_)
            | Self::BurnExceedsBalance(_) => ErrorKind::Balance,
            Self::Overflow(_) => ErrorKind::Value,
        }
    }
}
