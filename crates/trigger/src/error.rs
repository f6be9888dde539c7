use crate::RetryableStatus;

use alloy_json_rpc::RpcError;
use alloy_primitives::{TxHash, B256, U256};
use alloy_transport::TransportErrorKind;
use router_bridge::BridgeError;

/// A [`Result`] that uses [`TriggerError`] as the error type.
pub(crate) type TriggerResult<T> = Result<T, TriggerError>;

/// An error that occurred while routing funds to the child chain.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// A Provider error at the RPC level.
    #[error("provider rpc error: {0:?}")]
    ProviderRpc(#[from] RpcError<TransportErrorKind>),
    /// An error while calling a contract.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// The routing transaction created an unexpected number of retryable tickets.
    #[error("transaction {tx_hash} created {found} retryable tickets, expected exactly one")]
    RetryableCardinality {
        /// The routing transaction.
        tx_hash: TxHash,
        /// The number of retryable tickets found.
        found: usize,
    },
    /// The inbox data of the retryable ticket could not be parsed.
    #[error("malformed retryable ticket data for message {0}")]
    MalformedRetryable(U256),
    /// The retryable ticket was not created on the child chain before the deadline.
    #[error("retryable ticket {0} not created before the deadline")]
    RetryableTimeout(B256),
    /// The retryable ticket ended in a state that can not be redeemed.
    #[error("retryable ticket {ticket_id} in unexpected state {status}")]
    UnexpectedRetryableStatus {
        /// The ticket id.
        ticket_id: B256,
        /// The observed status.
        status: RetryableStatus,
    },
    /// The wait for the retryable ticket was cancelled.
    #[error("retryable ticket wait cancelled")]
    Cancelled,
}
