use crate::{
    poll::{Poll, Polled},
    BridgeError,
};

use alloy_primitives::TxHash;
use router_primitives::{MessageState, OutboundMessage, ProtocolFamily};
use tokio_util::sync::CancellationToken;

/// The outcome of [`ProtocolAdapter::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// The state of the message after the step.
    pub state: MessageState,
    /// The transaction submitted for the step, if any.
    pub tx_hash: Option<TxHash>,
}

impl Advance {
    /// Returns an [`Advance`] for which no action was taken.
    pub const fn idle(state: MessageState) -> Self {
        Self { state, tx_hash: None }
    }

    /// Returns an [`Advance`] for which the provided transaction was submitted.
    pub const fn submitted(state: MessageState, tx_hash: TxHash) -> Self {
        Self { state, tx_hash: Some(tx_hash) }
    }
}

/// Drives an [`OutboundMessage`] through the life cycle of its protocol family.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait ProtocolAdapter: Send + Sync {
    /// Returns the protocol family handled by the adapter.
    fn family(&self) -> ProtocolFamily;

    /// Returns the current state of the message.
    async fn status(&self, message: &OutboundMessage) -> Result<MessageState, BridgeError>;

    /// Performs the minimal next on-chain action for the current state of the message and returns
    /// the resulting state along with the hash of the submitted transaction, if any.
    ///
    /// Messages found already executed are reported as such and never cause an error.
    async fn advance(&self, message: &OutboundMessage) -> Result<Advance, BridgeError>;

    /// Polls the state of the message until it is actionable or terminal, the poll times out or
    /// the poll is cancelled. Returns the last observed state.
    async fn wait_until_actionable(
        &self,
        message: &OutboundMessage,
        poll: &Poll,
        cancel: &CancellationToken,
    ) -> Result<MessageState, BridgeError> {
        let polled = poll
            .poll(
                "wait_until_actionable",
                cancel,
                || self.status(message),
                |state| state.is_actionable() || state.is_terminal(),
            )
            .await?;

        if let Polled::TimedOut(state) = polled {
            tracing::info!(target: "router::bridge", id = ?message.id, %state, "message not actionable before the deadline");
        }
        Ok(polled.into_inner())
    }
}
