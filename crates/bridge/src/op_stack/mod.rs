//! The OP-stack fault proof withdrawal protocol:
//! `waiting-to-prove -> ready-to-prove -> (prove) -> waiting-to-finalize -> ready-to-finalize ->
//! (finalize) -> finalized`.

use crate::{adapter::Advance, BridgeError, ProtocolAdapter};

use alloy_primitives::{TxHash, B256, U256};
use router_primitives::{MessagePayload, MessageState, OutboundMessage, ProtocolFamily, Withdrawal};

mod client;
pub use client::AlloyOpStackBridge;

mod revert;
pub use revert::PortalRevert;

/// A dispute game of the respected game type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisputeGame {
    /// The index of the game in the factory.
    pub index: U256,
    /// The child chain block the game claims an output root for.
    pub l2_block: u64,
    /// The output root claimed by the game.
    pub root_claim: B256,
}

/// The client side of an OP-stack portal.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait OpStackBridge: Send + Sync {
    /// Returns true if the withdrawal was finalized.
    async fn is_finalized(&self, withdrawal_hash: B256) -> Result<bool, BridgeError>;

    /// Checks that the withdrawal can be finalized. A rejection is reported as
    /// [`BridgeError::PortalReverted`].
    async fn check_withdrawal(&self, withdrawal_hash: B256) -> Result<(), BridgeError>;

    /// Returns the most recent dispute game of the respected game type, if any.
    async fn latest_game(&self) -> Result<Option<DisputeGame>, BridgeError>;

    /// Proves the withdrawal against the dispute game. Returns the hash of the proof transaction.
    async fn prove(&self, withdrawal: &Withdrawal, game: &DisputeGame)
        -> Result<TxHash, BridgeError>;

    /// Finalizes the withdrawal. Returns the hash of the finalization transaction.
    async fn finalize(&self, withdrawal: &Withdrawal) -> Result<TxHash, BridgeError>;
}

/// The [`ProtocolAdapter`] for OP-stack withdrawals.
///
/// The adapter acts on the first withdrawal of the receipt.
#[derive(Debug)]
pub struct OpStackAdapter<B> {
    bridge: B,
}

impl<B: OpStackBridge> OpStackAdapter<B> {
    /// Returns a new [`OpStackAdapter`] using the provided bridge client.
    pub const fn new(bridge: B) -> Self {
        Self { bridge }
    }

    /// Returns the state of the withdrawal along with the dispute game to prove it against when
    /// the withdrawal is ready to be proven.
    async fn observe(
        &self,
        withdrawal: &Withdrawal,
        origin_block: u64,
    ) -> Result<(MessageState, Option<DisputeGame>), BridgeError> {
        if self.bridge.is_finalized(withdrawal.hash).await? {
            return Ok((MessageState::Executed, None));
        }

        let state = match self.bridge.check_withdrawal(withdrawal.hash).await {
            Ok(()) => MessageState::Confirmed,
            Err(BridgeError::PortalReverted(revert)) => match revert.state() {
                Some(state) => {
                    tracing::trace!(target: "router::bridge", hash = ?withdrawal.hash, %revert, %state, "withdrawal check reverted");
                    state
                }
                None => return Err(BridgeError::UnrecognizedState(revert.to_string())),
            },
            Err(err) => return Err(err),
        };

        if state != MessageState::ReadyToProve {
            return Ok((state, None));
        }

        // the withdrawal can only be proven once a game covers its block.
        match self.bridge.latest_game().await? {
            Some(game) if game.l2_block >= origin_block => Ok((state, Some(game))),
            _ => Ok((MessageState::Unconfirmed, None)),
        }
    }
}

#[async_trait::async_trait]
impl<B: OpStackBridge> ProtocolAdapter for OpStackAdapter<B> {
    fn family(&self) -> ProtocolFamily {
        ProtocolFamily::OpStack
    }

    async fn status(&self, message: &OutboundMessage) -> Result<MessageState, BridgeError> {
        let withdrawal = first_withdrawal(message)?;
        let (state, _) = self.observe(withdrawal, message.origin_block).await?;
        Ok(state)
    }

    async fn advance(&self, message: &OutboundMessage) -> Result<Advance, BridgeError> {
        let withdrawal = first_withdrawal(message)?;
        let (state, game) = self.observe(withdrawal, message.origin_block).await?;

        match (state, game) {
            (MessageState::ReadyToProve, Some(game)) => {
                tracing::info!(target: "router::bridge", hash = ?withdrawal.hash, game_index = %game.index, "proving withdrawal");
                let tx_hash = self.bridge.prove(withdrawal, &game).await?;
                Ok(Advance::submitted(MessageState::ChallengePeriod, tx_hash))
            }
            (MessageState::Confirmed, _) => {
                tracing::info!(target: "router::bridge", hash = ?withdrawal.hash, "finalizing withdrawal");
                match self.bridge.finalize(withdrawal).await {
                    Ok(tx_hash) => Ok(Advance::submitted(MessageState::Executed, tx_hash)),
                    Err(err) => {
                        // the withdrawal might have been finalized by another party.
                        match self.bridge.is_finalized(withdrawal.hash).await {
                            Ok(true) => {
                                tracing::info!(target: "router::bridge", hash = ?withdrawal.hash, ?err, "withdrawal already finalized");
                                Ok(Advance::idle(MessageState::Executed))
                            }
                            Ok(false) => Err(err),
                            Err(finalized_err) => {
                                tracing::warn!(
                                    target: "router::bridge",
                                    hash = ?withdrawal.hash,
                                    ?finalized_err,
                                    "failed to check withdrawal after finalization failure"
                                );
                                Err(err)
                            }
                        }
                    }
                }
            }
            (state, _) => Ok(Advance::idle(state)),
        }
    }
}

/// Returns the withdrawal acted upon for the message.
fn first_withdrawal(message: &OutboundMessage) -> Result<&Withdrawal, BridgeError> {
    match &message.payload {
        MessagePayload::OpStack(receipt) => {
            receipt.withdrawal().ok_or(BridgeError::MissingWithdrawal(message.origin_tx))
        }
        MessagePayload::Arbitrum(_) => Err(BridgeError::ProtocolMismatch {
            expected: ProtocolFamily::OpStack,
            found: ProtocolFamily::Arbitrum,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{
            arbitrum_message,
            op_stack::{game_at, MockOpStackBridge},
            op_stack_message,
        },
        ErrorKind,
    };

    use router_primitives::OpStackReceipt;

    #[tokio::test]
    async fn test_should_remap_unproven_to_ready_to_prove() -> eyre::Result<()> {
        // Given
        let bridge = MockOpStackBridge::new(vec![Err(PortalRevert::Unproven)])
            .with_latest_game(game_at(150));
        let adapter = OpStackAdapter::new(&bridge);

        // When
        let state = adapter.status(&op_stack_message(100)).await?;

        // Then
        assert_eq!(state, MessageState::ReadyToProve);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_wait_for_game_covering_withdrawal() -> eyre::Result<()> {
        // Given
        let bridge = MockOpStackBridge::new(vec![Err(PortalRevert::Unproven)])
            .with_latest_game(game_at(99));
        let adapter = OpStackAdapter::new(&bridge);

        // When
        let advance = adapter.advance(&op_stack_message(100)).await?;

        // Then
        assert_eq!(advance, Advance::idle(MessageState::Unconfirmed));
        assert_eq!(bridge.proofs(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_prove_then_finalize() -> eyre::Result<()> {
        // Given
        let bridge = MockOpStackBridge::new(vec![
            Err(PortalRevert::Unproven),
            Err(PortalRevert::ProofNotOldEnough),
            Ok(()),
        ])
        .with_latest_game(game_at(120));
        let adapter = OpStackAdapter::new(&bridge);
        let message = op_stack_message(100);

        // When
        let proven = adapter.advance(&message).await?;
        let waiting = adapter.advance(&message).await?;
        let finalized = adapter.advance(&message).await?;
        let again = adapter.advance(&message).await?;

        // Then
        assert_eq!(proven.state, MessageState::ChallengePeriod);
        assert!(proven.tx_hash.is_some());
        assert_eq!(waiting, Advance::idle(MessageState::ChallengePeriod));
        assert_eq!(finalized.state, MessageState::Executed);
        assert!(finalized.tx_hash.is_some());
        assert_eq!(again, Advance::idle(MessageState::Executed));
        assert_eq!(bridge.proofs(), 1);
        assert_eq!(bridge.finalizations(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_take_no_action_in_challenge_period() -> eyre::Result<()> {
        let bridge = MockOpStackBridge::new(vec![Err(PortalRevert::GameNotResolved)]);
        let adapter = OpStackAdapter::new(&bridge);

        let advance = adapter.advance(&op_stack_message(100)).await?;

        assert_eq!(advance, Advance::idle(MessageState::ChallengePeriod));
        assert_eq!(bridge.proofs() + bridge.finalizations(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_treat_already_finalized_as_success() -> eyre::Result<()> {
        let bridge = MockOpStackBridge::new(vec![Ok(())]).with_finalize_already_done();
        let adapter = OpStackAdapter::new(&bridge);

        let advance = adapter.advance(&op_stack_message(100)).await?;

        assert_eq!(advance, Advance::idle(MessageState::Executed));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_fail_on_unrecognized_revert() {
        let bridge =
            MockOpStackBridge::new(vec![Err(PortalRevert::Unrecognized("paused".to_owned()))]);
        let adapter = OpStackAdapter::new(&bridge);

        let err = adapter.status(&op_stack_message(100)).await.unwrap_err();

        assert!(matches!(err, BridgeError::UnrecognizedState(_)));
        assert_eq!(err.kind(), ErrorKind::UnrecognizedState);
    }

    #[tokio::test]
    async fn test_should_reject_receipt_without_withdrawal() {
        let bridge = MockOpStackBridge::new(vec![Ok(())]);
        let adapter = OpStackAdapter::new(&bridge);

        let mut message = op_stack_message(100);
        message.payload = OpStackReceipt { withdrawals: vec![] }.into();

        let err = adapter.status(&message).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    }

    #[tokio::test]
    async fn test_should_reject_arbitrum_message() {
        let adapter = OpStackAdapter::new(MockOpStackBridge::new(vec![Ok(())]));
        let err = adapter.status(&arbitrum_message(1)).await.unwrap_err();
        assert!(matches!(err, BridgeError::ProtocolMismatch { .. }));
    }
}
