use alloy_consensus::{Eip658Value, Receipt, ReceiptEnvelope, ReceiptWithBloom};
use alloy_network::Ethereum;
use alloy_primitives::{Address, Bloom, TxHash, B256};
use alloy_provider::{Provider, ProviderCall, RootProvider};
use alloy_rpc_types_eth::{Log, TransactionReceipt};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Returns a successful receipt for the transaction mined at the provided block.
pub fn receipt(tx_hash: TxHash, block_number: u64, logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        inner: ReceiptEnvelope::Eip1559(ReceiptWithBloom {
            receipt: Receipt { status: Eip658Value::Eip658(true), cumulative_gas_used: 0, logs },
            logs_bloom: Bloom::default(),
        }),
        transaction_hash: tx_hash,
        transaction_index: Some(0),
        block_hash: Some(B256::with_last_byte(block_number as u8)),
        block_number: Some(block_number),
        gas_used: 0,
        effective_gas_price: 0,
        blob_gas_used: None,
        blob_gas_price: None,
        from: Address::ZERO,
        to: None,
        contract_address: None,
    }
}

/// A mock implementation of the [`Provider`] trait serving receipts from memory.
#[derive(Debug)]
pub struct MockReceiptProvider {
    receipts: HashMap<TxHash, TransactionReceipt>,
    receipt_requests: AtomicUsize,
}

impl MockReceiptProvider {
    /// Returns a new [`MockReceiptProvider`] serving the provided receipts.
    pub fn new(receipts: Vec<TransactionReceipt>) -> Self {
        Self {
            receipts: receipts.into_iter().map(|r| (r.transaction_hash, r)).collect(),
            receipt_requests: AtomicUsize::new(0),
        }
    }

    /// Returns the number of receipt requests served.
    pub fn receipt_requests(&self) -> usize {
        self.receipt_requests.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Provider for MockReceiptProvider {
    fn root(&self) -> &RootProvider<Ethereum> {
        unreachable!("unused calls")
    }

    fn get_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> ProviderCall<(TxHash,), Option<TransactionReceipt>> {
        self.receipt_requests.fetch_add(1, Ordering::Relaxed);
        ProviderCall::Ready(Some(Ok(self.receipts.get(&hash).cloned())))
    }
}
