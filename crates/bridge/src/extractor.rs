use crate::BridgeError;

use std::{num::NonZeroUsize, sync::Arc};

use alloy_primitives::TxHash;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Log, TransactionReceipt};
use lru::LruCache;
use router_bindings::{
    logs::{try_decode_log, L2ToL1Tx, MessagePassed},
    withdrawal_hash, ARB_SYS_ADDRESS, L2_TO_L1_MESSAGE_PASSER_ADDRESS,
};
use router_primitives::{
    ArbitrumMessage, OpStackReceipt, OutboundMessage, ProtocolFamily, Withdrawal,
};
use tokio::sync::Mutex;

/// The default capacity of the receipt cache.
pub const DEFAULT_RECEIPT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Extracts the [`OutboundMessage`]s produced by a transaction.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait MessageExtractor: Send + Sync {
    /// Returns the outbound messages produced by the transaction.
    async fn extract(&self, tx_hash: TxHash) -> Result<Vec<OutboundMessage>, BridgeError>;
}

/// A [`MessageExtractor`] decoding the messages from the transaction receipt.
///
/// Receipts are cached: transactions are only extracted once they are buried under the block lag.
#[derive(Debug)]
pub struct ReceiptExtractor<P> {
    /// The provider of the chain the messages are sent from.
    provider: P,
    /// The protocol family of the messages.
    family: ProtocolFamily,
    /// The receipt cache.
    receipts: Mutex<LruCache<TxHash, Arc<TransactionReceipt>>>,
}

impl<P: Provider> ReceiptExtractor<P> {
    /// Returns a new [`ReceiptExtractor`] for the protocol family.
    pub fn new(provider: P, family: ProtocolFamily, capacity: NonZeroUsize) -> Self {
        Self { provider, family, receipts: Mutex::new(LruCache::new(capacity)) }
    }

    /// Returns the receipt of the transaction, fetching it from the provider if not cached.
    async fn receipt(&self, tx_hash: TxHash) -> Result<Arc<TransactionReceipt>, BridgeError> {
        if let Some(receipt) = self.receipts.lock().await.get(&tx_hash) {
            return Ok(receipt.clone());
        }

        let receipt = Arc::new(
            self.provider
                .get_transaction_receipt(tx_hash)
                .await?
                .ok_or(BridgeError::MissingReceipt(tx_hash))?,
        );
        self.receipts.lock().await.put(tx_hash, receipt.clone());
        Ok(receipt)
    }
}

#[async_trait::async_trait]
impl<P: Provider> MessageExtractor for ReceiptExtractor<P> {
    async fn extract(&self, tx_hash: TxHash) -> Result<Vec<OutboundMessage>, BridgeError> {
        let receipt = self.receipt(tx_hash).await?;
        let block_number = receipt.block_number.ok_or(BridgeError::MissingReceipt(tx_hash))?;
        let logs = receipt.inner.logs();

        let message = match self.family {
            ProtocolFamily::Arbitrum => extract_arbitrum_message(tx_hash, block_number, logs)?,
            ProtocolFamily::OpStack => extract_op_stack_receipt(tx_hash, block_number, logs)?,
        };
        tracing::trace!(target: "router::bridge", %message, "extracted outbound message");

        Ok(vec![message])
    }
}

/// Extracts the single `L2ToL1Tx` message sent through `ArbSys` in the logs.
///
/// Errors if the logs hold zero or more than one message.
pub fn extract_arbitrum_message(
    tx_hash: TxHash,
    block_number: u64,
    logs: &[Log],
) -> Result<OutboundMessage, BridgeError> {
    let mut messages: Vec<ArbitrumMessage> = logs
        .iter()
        .filter(|log| log.address() == ARB_SYS_ADDRESS)
        .filter_map(|log| try_decode_log::<L2ToL1Tx>(&log.inner))
        .map(|log| log.data.into())
        .collect();

    if messages.len() != 1 {
        return Err(BridgeError::MessageCardinality { tx_hash, found: messages.len() });
    }
    let message = messages.remove(0);

    Ok(OutboundMessage {
        id: message.hash.into(),
        origin_tx: tx_hash,
        origin_block: block_number,
        payload: message.into(),
    })
}

/// Extracts the withdrawals initiated through the `L2ToL1MessagePasser` in the logs.
///
/// Errors if the logs hold no withdrawal or if a withdrawal hash does not match its content.
pub fn extract_op_stack_receipt(
    tx_hash: TxHash,
    block_number: u64,
    logs: &[Log],
) -> Result<OutboundMessage, BridgeError> {
    let withdrawals: Vec<Withdrawal> = logs
        .iter()
        .filter(|log| log.address() == L2_TO_L1_MESSAGE_PASSER_ADDRESS)
        .filter_map(|log| try_decode_log::<MessagePassed>(&log.inner))
        .map(|log| log.data.into())
        .collect();

    for withdrawal in &withdrawals {
        let computed = withdrawal_hash(withdrawal);
        if computed != withdrawal.hash {
            return Err(BridgeError::WithdrawalHashMismatch { emitted: withdrawal.hash, computed });
        }
    }

    let receipt = OpStackReceipt { withdrawals };
    let id = receipt.withdrawal().ok_or(BridgeError::MissingWithdrawal(tx_hash))?.hash;

    Ok(OutboundMessage {
        id,
        origin_tx: tx_hash,
        origin_block: block_number,
        payload: receipt.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        arbitrum_log, l2_to_l1_tx, message_passed, message_passed_log,
        provider::{receipt, MockReceiptProvider},
    };

    use alloy_primitives::{Address, B256, U256};

    const TX_HASH: TxHash = B256::repeat_byte(0x42);

    #[test]
    fn test_should_extract_single_arbitrum_message() -> eyre::Result<()> {
        // Given
        let event = l2_to_l1_tx(7);
        let logs = vec![arbitrum_log(&event)];

        // When
        let message = extract_arbitrum_message(TX_HASH, 100, &logs)?;

        // Then
        assert_eq!(message.protocol(), ProtocolFamily::Arbitrum);
        assert_eq!(message.id, B256::from(event.hash));
        assert_eq!(message.origin_tx, TX_HASH);
        assert_eq!(message.origin_block, 100);

        Ok(())
    }

    #[test]
    fn test_should_reject_zero_arbitrum_messages() {
        let res = extract_arbitrum_message(TX_HASH, 100, &[]);
        assert!(matches!(res, Err(BridgeError::MessageCardinality { found: 0, .. })));
    }

    #[test]
    fn test_should_reject_multiple_arbitrum_messages() {
        let logs = vec![arbitrum_log(&l2_to_l1_tx(1)), arbitrum_log(&l2_to_l1_tx(2))];
        let res = extract_arbitrum_message(TX_HASH, 100, &logs);
        assert!(matches!(res, Err(BridgeError::MessageCardinality { found: 2, .. })));
    }

    #[test]
    fn test_should_ignore_messages_from_other_emitters() -> eyre::Result<()> {
        let mut spoofed = arbitrum_log(&l2_to_l1_tx(1));
        spoofed.inner.address = Address::repeat_byte(0x01);
        let logs = vec![spoofed, arbitrum_log(&l2_to_l1_tx(2))];

        let message = extract_arbitrum_message(TX_HASH, 100, &logs)?;
        assert_eq!(message.id, B256::from(l2_to_l1_tx(2).hash));

        Ok(())
    }

    #[test]
    fn test_should_extract_op_stack_receipt() -> eyre::Result<()> {
        // Given
        let first = message_passed(U256::from(1));
        let second = message_passed(U256::from(2));
        let logs = vec![message_passed_log(&first), message_passed_log(&second)];

        // When
        let message = extract_op_stack_receipt(TX_HASH, 55, &logs)?;

        // Then
        assert_eq!(message.protocol(), ProtocolFamily::OpStack);
        assert_eq!(message.id, first.withdrawalHash);
        let router_primitives::MessagePayload::OpStack(receipt) = message.payload else {
            eyre::bail!("expected an OP-stack payload");
        };
        assert_eq!(receipt.withdrawals.len(), 2);

        Ok(())
    }

    #[test]
    fn test_should_reject_receipt_without_withdrawal() {
        let res = extract_op_stack_receipt(TX_HASH, 55, &[]);
        assert!(matches!(res, Err(BridgeError::MissingWithdrawal(_))));
    }

    #[test]
    fn test_should_reject_withdrawal_hash_mismatch() {
        let mut event = message_passed(U256::from(1));
        event.withdrawalHash = B256::repeat_byte(0xff);
        let res = extract_op_stack_receipt(TX_HASH, 55, &[message_passed_log(&event)]);
        assert!(matches!(res, Err(BridgeError::WithdrawalHashMismatch { .. })));
    }

    #[tokio::test]
    async fn test_should_cache_receipts() -> eyre::Result<()> {
        // Given
        let event = l2_to_l1_tx(3);
        let provider = MockReceiptProvider::new(vec![receipt(TX_HASH, 12, vec![arbitrum_log(&event)])]);
        let extractor = ReceiptExtractor::new(
            &provider,
            ProtocolFamily::Arbitrum,
            DEFAULT_RECEIPT_CACHE_CAPACITY,
        );

        // When
        let first = extractor.extract(TX_HASH).await?;
        let second = extractor.extract(TX_HASH).await?;

        // Then
        assert_eq!(first, second);
        assert_eq!(first[0].origin_block, 12);
        assert_eq!(provider.receipt_requests(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_fail_on_missing_receipt() {
        let extractor = ReceiptExtractor::new(
            MockReceiptProvider::new(vec![]),
            ProtocolFamily::OpStack,
            DEFAULT_RECEIPT_CACHE_CAPACITY,
        );
        let res = extractor.extract(TX_HASH).await;
        assert!(matches!(res, Err(BridgeError::MissingReceipt(_))));
    }
}
