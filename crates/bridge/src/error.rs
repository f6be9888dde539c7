use crate::op_stack::PortalRevert;

use alloy_json_rpc::RpcError;
use alloy_primitives::{TxHash, B256, U256};
use alloy_provider::PendingTransactionError;
use alloy_transport::TransportErrorKind;
use router_primitives::ProtocolFamily;

/// The classification of a failure, used to tell failures which will resolve on their own from
/// failures which require an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    /// The failure is expected to resolve on a later attempt.
    #[display("transient")]
    Transient,
    /// The on-chain data contradicts an assumption of the redeemer.
    #[display("invariant violation")]
    InvariantViolation,
    /// The protocol reported a state the redeemer has no mapping for.
    #[display("unrecognized state")]
    UnrecognizedState,
}

/// An error that occurred while interacting with a bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A Provider error at the RPC level.
    #[error("provider rpc error: {0:?}")]
    ProviderRpc(#[from] RpcError<TransportErrorKind>),
    /// A submitted transaction could not be confirmed.
    #[error("pending transaction error: {0}")]
    PendingTransaction(#[from] PendingTransactionError),
    /// A submitted transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    TransactionReverted(TxHash),
    /// The receipt of the transaction is not available.
    #[error("missing receipt for transaction {0}")]
    MissingReceipt(TxHash),
    /// The requested block is not available.
    #[error("missing block {0}")]
    MissingBlock(String),
    /// Failed to decode the return data of a contract call.
    #[error("abi decoding error: {0}")]
    AbiDecode(#[from] alloy_sol_types::Error),
    /// A transaction emitted an unexpected number of outbound messages.
    #[error("transaction {tx_hash} emitted {found} outbound messages, expected exactly one")]
    MessageCardinality {
        /// The transaction emitting the messages.
        tx_hash: TxHash,
        /// The number of messages found.
        found: usize,
    },
    /// A transaction did not initiate any withdrawal.
    #[error("transaction {0} initiated no withdrawal")]
    MissingWithdrawal(TxHash),
    /// The hash of a withdrawal does not match its content.
    #[error("withdrawal hash mismatch: emitted {emitted}, computed {computed}")]
    WithdrawalHashMismatch {
        /// The hash emitted by the message passer.
        emitted: B256,
        /// The hash computed from the withdrawal content.
        computed: B256,
    },
    /// The message belongs to another protocol family.
    #[error("expected a {expected} message, got a {found} message")]
    ProtocolMismatch {
        /// The family of the adapter.
        expected: ProtocolFamily,
        /// The family of the message.
        found: ProtocolFamily,
    },
    /// The position of an outbox message does not fit the outbox tree.
    #[error("outbox position {0} out of range")]
    InvalidPosition(U256),
    /// The output root rebuilt from the child chain does not match the dispute game claim.
    #[error("output root mismatch for dispute game {game_index}: claimed {claimed}, built {built}")]
    OutputRootMismatch {
        /// The index of the dispute game.
        game_index: U256,
        /// The root claimed by the game.
        claimed: B256,
        /// The root built from the child chain state.
        built: B256,
    },
    /// The OP-stack portal rejected the withdrawal.
    #[error("portal reverted: {0}")]
    PortalReverted(PortalRevert),
    /// The protocol reported a state the redeemer has no mapping for.
    #[error("unrecognized message state: {0}")]
    UnrecognizedState(String),
}

impl BridgeError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProviderRpc(_) |
            Self::PendingTransaction(_) |
            Self::TransactionReverted(_) |
            Self::MissingReceipt(_) |
            Self::MissingBlock(_) => ErrorKind::Transient,
            Self::AbiDecode(_) |
            Self::MessageCardinality { .. } |
            Self::MissingWithdrawal(_) |
            Self::WithdrawalHashMismatch { .. } |
            Self::ProtocolMismatch { .. } |
            Self::InvalidPosition(_) |
            Self::OutputRootMismatch { .. } => ErrorKind::InvariantViolation,
            Self::PortalReverted(PortalRevert::Unrecognized(_)) | Self::UnrecognizedState(_) => {
                ErrorKind::UnrecognizedState
            }
            Self::PortalReverted(_) => ErrorKind::Transient,
        }
    }
}
