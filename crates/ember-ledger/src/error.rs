//! Error types for the elastic ledger

use ember_core::ErrorKind;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors raised by the elastic ledger
///
/// Reason strings are part of the behavior contract; integrations match on
/// them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Authorization ===
    /// Capability-restricted call from an unauthorized caller
    #[error("Ember: forbidden")]
    Forbidden,

    // === Wiring (one-shot component registration) ===
    #[error("Ember: minter already set")]
    MinterAlreadySet,

    #[error("Ember: floor already set")]
    FloorAlreadySet,

    #[error("Ember: distributor already set")]
    DistributorAlreadySet,

    /// Governance-sensitive setter called before the handover delay passed
    #[error("Ember: handover time has not passed")]
    HandoverPending,

    // === Balances ===
    #[error("Ember: subtraction amount exceeds balance")]
    SubtractionExceedsBalance,

    #[error("Ember: transfer amount exceeds allowance")]
    TransferExceedsAllowance,

    #[error("Ember: burn amount exceeds entitlement")]
    BurnExceedsEntitlement,

    // === Values ===
    #[error("Ember: insufficient amount")]
    InsufficientAmount,

    #[error("Ember: entitlement is zero")]
    ZeroEntitlement,

    #[error("Ember: arithmetic overflow")]
    Overflow,

    // === Limits & state ===
    #[error("Ember: max supply exceeded")]
    MaxSupplyExceeded,

    #[error("Ember: fee exceeds allowed limit")]
    FeeExceedsLimit,

    #[error("Ember: account already shielded")]
    AlreadyShielded,

    #[error("Ember: account not shielded")]
    NotShielded,
}

impl LedgerError {
    /// Classify the error into the shared taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden => ErrorKind::Authorization,
            Self::MinterAlreadySet
            | Self::FloorAlreadySet
            | Self::DistributorAlreadySet
            | Self::HandoverPending
            | Self::AlreadyShielded
            | Self::NotShielded => ErrorKind::State,
            Self::SubtractionExceedsBalance
            | Self::TransferExceedsAllowance
            | Self::BurnExceedsEntitlement => ErrorKind::Balance,
            Self::InsufficientAmount | Self::ZeroEntitlement | Self::Overflow => ErrorKind::Value,
            Self::MaxSupplyExceeded | Self::FeeExceedsLimit => ErrorKind::Limit,
        }
    }
}
