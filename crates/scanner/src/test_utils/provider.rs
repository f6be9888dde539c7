use alloy_network::Ethereum;
use alloy_primitives::{BlockNumber, U64};
use alloy_provider::{Provider, ProviderCall, RootProvider};
use alloy_rpc_client::NoParams;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_transport::{TransportErrorKind, TransportResult};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

/// A mock implementation of the [`Provider`] trait serving logs from memory.
#[derive(Debug)]
pub struct MockProvider {
    logs: Vec<Log>,
    head: Mutex<BlockNumber>,
    failing_blocks: Mutex<Vec<BlockNumber>>,
    log_requests: AtomicUsize,
}

impl MockProvider {
    /// Returns a new [`MockProvider`] from the logs and the head of the chain.
    pub fn new(logs: Vec<Log>, head: BlockNumber) -> Self {
        Self {
            logs,
            head: Mutex::new(head),
            failing_blocks: Mutex::new(vec![]),
            log_requests: AtomicUsize::new(0),
        }
    }

    /// Any log request including the provided block fails.
    pub fn with_failing_block(self, block: BlockNumber) -> Self {
        if let Ok(mut blocks) = self.failing_blocks.lock() {
            blocks.push(block);
        }
        self
    }

    /// Clears the failing blocks.
    pub fn clear_failures(&self) {
        if let Ok(mut blocks) = self.failing_blocks.lock() {
            blocks.clear();
        }
    }

    /// Sets the head of the chain.
    pub fn set_head(&self, head: BlockNumber) {
        if let Ok(mut current) = self.head.lock() {
            *current = head;
        }
    }

    /// Returns the number of `eth_getLogs` requests served.
    pub fn log_requests(&self) -> usize {
        self.log_requests.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Provider for MockProvider {
    fn root(&self) -> &RootProvider<Ethereum> {
        unreachable!("unused calls")
    }

    fn get_block_number(&self) -> ProviderCall<NoParams, U64, BlockNumber> {
        let head = self.head.lock().map(|head| *head).unwrap_or_default();
        ProviderCall::Ready(Some(Ok(head)))
    }

    async fn get_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        let from = filter.get_from_block().unwrap_or_default();
        let to = filter.get_to_block().unwrap_or(u64::MAX);

        let failing = self
            .failing_blocks
            .lock()
            .map(|blocks| blocks.iter().any(|block| (from..=to).contains(block)))
            .unwrap_or_default();
        if failing {
            return Err(TransportErrorKind::custom_str("log request failed"));
        }
        self.log_requests.fetch_add(1, Ordering::Relaxed);

        Ok(self
            .logs
            .iter()
            .filter(|log| log.block_number.is_some_and(|n| (from..=to).contains(&n)))
            .filter(|log| filter.address.matches(&log.address()))
            .filter(|log| log.topic0().is_some_and(|topic| filter.topics[0].matches(topic)))
            .cloned()
            .collect())
    }
}
