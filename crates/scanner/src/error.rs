use alloy_json_rpc::RpcError;
use alloy_primitives::B256;
use alloy_transport::TransportErrorKind;
use router_db::DatabaseError;

/// A [`Result`] that uses [`ScannerError`] as the error type.
pub(crate) type ScannerResult<T> = Result<T, ScannerError>;

/// An error that occurred with the log cache.
#[derive(Debug, thiserror::Error)]
pub enum LogCacheError {
    /// A Provider error at the RPC level.
    #[error("provider rpc error: {0:?}")]
    ProviderRpc(#[from] RpcError<TransportErrorKind>),
    /// An error with the cache database.
    #[error("log cache database error: {0}")]
    Database(#[from] DatabaseError),
}

/// An error that occurred while scanning for routing events.
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// A Provider error at the RPC level.
    #[error("provider rpc error: {0:?}")]
    ProviderRpc(#[from] RpcError<TransportErrorKind>),
    /// An error with the log cache.
    #[error(transparent)]
    LogCache(#[from] LogCacheError),
    /// An error related to the scanned logs.
    #[error(transparent)]
    Logs(#[from] FilterLogError),
}

/// An error that occurred when filtering logs.
#[derive(Debug, thiserror::Error)]
pub enum FilterLogError {
    /// The log is missing a block number.
    #[error("missing block number for log")]
    MissingBlockNumber,
    /// The log is missing a log index.
    #[error("missing log index for log")]
    MissingLogIndex,
    /// The log is missing a transaction hash.
    #[error("unknown transaction hash for log")]
    MissingTransactionHash,
    /// The log could not be decoded.
    #[error("failed to decode log of type {log_type} in transaction {tx_hash:?}: {error}")]
    DecodeLogFailed {
        /// The name of the expected event.
        log_type: &'static str,
        /// The transaction which emitted the log.
        tx_hash: Option<B256>,
        /// The decoding error.
        error: alloy_sol_types::Error,
    },
}
