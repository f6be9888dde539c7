use router_bridge::{BridgeError, ErrorKind};
use router_scanner::ScannerError;

/// A [`Result`] that uses [`RedeemerError`] as the error type.
pub(crate) type RedeemerResult<T> = Result<T, RedeemerError>;

/// An error that occurred during a redemption pass.
#[derive(Debug, thiserror::Error)]
pub enum RedeemerError {
    /// An error while scanning for routing events.
    #[error(transparent)]
    Scanner(#[from] ScannerError),
    /// An error while extracting or advancing a message.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// The pass was cancelled while waiting for a message.
    #[error("redemption pass cancelled")]
    Cancelled,
}

impl RedeemerError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Scanner(ScannerError::Logs(_)) => ErrorKind::InvariantViolation,
            Self::Scanner(_) | Self::Cancelled => ErrorKind::Transient,
            Self::Bridge(err) => err.kind(),
        }
    }
}
