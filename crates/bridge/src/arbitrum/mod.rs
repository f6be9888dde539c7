//! The Arbitrum outbox protocol: `unconfirmed -> confirmed -> (execute) -> executed`.

use crate::{
    adapter::Advance,
    BridgeError, ProtocolAdapter,
};

use alloy_primitives::TxHash;
use router_primitives::{
    ArbitrumMessage, MessagePayload, MessageState, OutboundMessage, ProtocolFamily,
};

mod client;
pub use client::{AlloyArbitrumBridge, DEFAULT_SEND_ROOT_SEARCH_DEPTH};

/// The client side of an Arbitrum outbox.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait ArbitrumBridge: Send + Sync {
    /// Returns true if the message at the provided outbox position was executed.
    async fn is_spent(&self, position: u64) -> Result<bool, BridgeError>;

    /// Returns the number of messages covered by the latest confirmed send root, or [`None`] if
    /// no send root was found.
    async fn confirmed_send_count(&self) -> Result<Option<u64>, BridgeError>;

    /// Proves the message against the send root covering `send_count` messages and executes it
    /// on the parent chain. Returns the hash of the execution transaction.
    async fn execute(
        &self,
        message: &ArbitrumMessage,
        send_count: u64,
    ) -> Result<TxHash, BridgeError>;
}

/// The [`ProtocolAdapter`] for Arbitrum messages.
#[derive(Debug)]
pub struct ArbitrumAdapter<B> {
    bridge: B,
}

impl<B: ArbitrumBridge> ArbitrumAdapter<B> {
    /// Returns a new [`ArbitrumAdapter`] using the provided bridge client.
    pub const fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// Returns the state of the message along with the confirmed send count when the message is
    /// confirmed.
    async fn observe(
        &self,
        message: &ArbitrumMessage,
    ) -> Result<(MessageState, Option<u64>), BridgeError> {
        let position = outbox_position(message)?;
        if self.bridge.is_spent(position).await? {
            return Ok((MessageState::Executed, None));
        }

        match self.bridge.confirmed_send_count().await? {
            Some(send_count) if send_count > position => {
                Ok((MessageState::Confirmed, Some(send_count)))
            }
            _ => Ok((MessageState::Unconfirmed, None)),
        }
    }
}

#[async_trait::async_trait]
impl<B: ArbitrumBridge> ProtocolAdapter for ArbitrumAdapter<B> {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::Arbitrum
    }

    async fn status(&self, message: &OutboundMessage) -> Result<MessageState, BridgeError> {
        let (state, _) = self.observe(arbitrum_payload(message)?).await?;
        Ok(state)
    }

    async fn advance(&self, message: &OutboundMessage) -> Result<Advance, BridgeError> {
        let payload = arbitrum_payload(message)?;
        let (state, send_count) = self.observe(payload).await?;
        let Some(send_count) = send_count else {
            return Ok(Advance::idle(state));
        };

        tracing::info!(target: "router::bridge", id = ?message.id, send_count, "executing outbox message");
        match self.bridge.execute(payload, send_count).await {
            Ok(tx_hash) => Ok(Advance::submitted(MessageState::Executed, tx_hash)),
            Err(err) => {
                // the message might have been executed by another party in the meantime.
                match self.bridge.is_spent(outbox_position(payload)?).await {
                    Ok(true) => {
                        tracing::info!(target: "router::bridge", id = ?message.id, ?err, "outbox message already executed");
                        Ok(Advance::idle(MessageState::Executed))
                    }
                    Ok(false) => Err(err),
                    Err(spent_err) => {
                        tracing::warn!(
                            target: "router::bridge",
                            id = ?message.id,
                            ?spent_err,
                            "failed to check outbox message after execution failure"
                        );
                        Err(err)
                    }
                }
            }
        }
    }
}

/// Returns the Arbitrum payload of the message.
fn arbitrum_payload(message: &OutboundMessage) -> Result<&ArbitrumMessage, BridgeError> {
    match &message.payload {
        MessagePayload::Arbitrum(payload) => Ok(payload),
        MessagePayload::OpStack(_) => Err(BridgeError::ProtocolMismatch {
            expected: ProtocolFamily::Arbitrum,
            found: ProtocolFamily::OpStack,
        }),
    }
}

/// Returns the leaf index of the message in the outbox tree.
fn outbox_position(message: &ArbitrumMessage) -> Result<u64, BridgeError> {
    u64::try_from(message.position).map_err(|_| BridgeError::InvalidPosition(message.position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        poll::Poll,
        test_utils::{
            arbitrum::{ExecuteBehavior, MockArbitrumBridge},
            arbitrum_message, op_stack_message,
        },
        ErrorKind,
    };

    use alloy_primitives::U256;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_should_report_unconfirmed_without_send_root() -> eyre::Result<()> {
        // Given
        let bridge = MockArbitrumBridge::new(vec![None]);
        let adapter = ArbitrumAdapter::new(&bridge);
        let message = arbitrum_message(5);

        // When
        let state = adapter.status(&message).await?;
        let advance = adapter.advance(&message).await?;

        // Then
        assert_eq!(state, MessageState::Unconfirmed);
        assert_eq!(advance, Advance::idle(MessageState::Unconfirmed));
        assert_eq!(bridge.executions(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_report_unconfirmed_below_send_count() -> eyre::Result<()> {
        let bridge = MockArbitrumBridge::new(vec![Some(5)]);
        let adapter = ArbitrumAdapter::new(&bridge);

        assert_eq!(adapter.status(&arbitrum_message(5)).await?, MessageState::Unconfirmed);
        assert_eq!(adapter.status(&arbitrum_message(4)).await?, MessageState::Confirmed);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_execute_confirmed_message() -> eyre::Result<()> {
        // Given
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let adapter = ArbitrumAdapter::new(&bridge);
        let message = arbitrum_message(5);

        // When
        let advance = adapter.advance(&message).await?;

        // Then
        assert_eq!(advance.state, MessageState::Executed);
        assert!(advance.tx_hash.is_some());
        assert_eq!(bridge.executions(), 1);
        assert_eq!(bridge.executed_with(), Some(10));

        // a second pass is an idempotent no-op.
        let advance = adapter.advance(&message).await?;
        assert_eq!(advance, Advance::idle(MessageState::Executed));
        assert_eq!(bridge.executions(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_treat_already_executed_as_success() -> eyre::Result<()> {
        // Given
        let bridge = MockArbitrumBridge::new(vec![Some(10)])
            .with_execute_behavior(ExecuteBehavior::AlreadySpent);
        let adapter = ArbitrumAdapter::new(&bridge);

        // When
        let advance = adapter.advance(&arbitrum_message(5)).await?;

        // Then
        assert_eq!(advance, Advance::idle(MessageState::Executed));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_propagate_execution_failure() {
        let bridge =
            MockArbitrumBridge::new(vec![Some(10)]).with_execute_behavior(ExecuteBehavior::Revert);
        let adapter = ArbitrumAdapter::new(&bridge);

        let err = adapter.advance(&arbitrum_message(5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient);
    }

    #[tokio::test]
    async fn test_should_keep_execution_error_when_spent_check_fails() {
        // Given
        let bridge = MockArbitrumBridge::new(vec![Some(10)])
            .with_execute_behavior(ExecuteBehavior::RevertThenUnreachable);
        let adapter = ArbitrumAdapter::new(&bridge);

        // When
        let err = adapter.advance(&arbitrum_message(5)).await.unwrap_err();

        // Then
        assert!(matches!(err, BridgeError::TransactionReverted(_)));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_position() {
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let adapter = ArbitrumAdapter::new(&bridge);

        let mut message = arbitrum_message(0);
        if let MessagePayload::Arbitrum(payload) = &mut message.payload {
            payload.position = U256::MAX;
        }

        let err = adapter.status(&message).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidPosition(_)));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[tokio::test]
    async fn test_should_reject_op_stack_message() {
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let adapter = ArbitrumAdapter::new(&bridge);

        let err = adapter.status(&op_stack_message(1)).await.unwrap_err();
        assert!(matches!(err, BridgeError::ProtocolMismatch { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_wait_until_confirmed() -> eyre::Result<()> {
        // Given
        let bridge = MockArbitrumBridge::new(vec![None, Some(3), Some(8)]);
        let adapter = ArbitrumAdapter::new(&bridge);
        let poll = Poll::new(Duration::from_secs(60), Duration::from_secs(600));

        // When
        let state =
            adapter.wait_until_actionable(&arbitrum_message(5), &poll, &CancellationToken::new()).await?;

        // Then
        assert_eq!(state, MessageState::Confirmed);
        assert_eq!(bridge.send_count_queries(), 3);

        Ok(())
    }
}
