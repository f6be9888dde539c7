use router_bridge::{BridgeError, MessageExtractor};
use router_primitives::{BlockRange, OutboundMessage, RoutingEvent};
use router_scanner::{EventSource, Scan, ScannerError};

use alloy_primitives::{Address, TxHash, U256};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};
use tokio::time::Instant;

/// Returns the routing event which produced the message.
pub fn routing_event(message: &OutboundMessage) -> RoutingEvent {
    RoutingEvent {
        tx_hash: message.origin_tx,
        block_number: message.origin_block,
        log_index: 0,
        token: Address::ZERO,
        amount: U256::from(1_000),
        range: BlockRange::default(),
    }
}

/// An in-memory [`EventSource`] serving the events up to a fixed head.
#[derive(Debug)]
pub struct MockEventSource {
    events: Vec<RoutingEvent>,
    head: u64,
    scans: Mutex<Vec<(u64, Instant)>>,
}

impl MockEventSource {
    /// Returns a new [`MockEventSource`] serving the events up to the head.
    pub const fn new(events: Vec<RoutingEvent>, head: u64) -> Self {
        Self { events, head, scans: Mutex::new(Vec::new()) }
    }

    /// Returns the first block of each scan.
    pub fn scan_requests(&self) -> Vec<u64> {
        self.scans.lock().expect("lock poisoned").iter().map(|(from, _)| *from).collect()
    }

    /// Returns the instant of each scan.
    pub fn scan_times(&self) -> Vec<Instant> {
        self.scans.lock().expect("lock poisoned").iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait::async_trait]
impl EventSource for MockEventSource {
    async fn scan(&self, from_block: u64) -> Result<Scan, ScannerError> {
        self.scans.lock().expect("lock poisoned").push((from_block, Instant::now()));

        let Some(range) = BlockRange::new(from_block, self.head) else {
            return Ok(Scan::default());
        };
        let events = self
            .events
            .iter()
            .filter(|event| range.contains(event.block_number))
            .map(|event| RoutingEvent { range, ..*event })
            .collect();

        Ok(Scan { range: Some(range), events })
    }
}

/// A [`MessageExtractor`] serving the messages by origin transaction.
#[derive(Debug, Default)]
pub struct MockExtractor {
    messages: HashMap<TxHash, Vec<OutboundMessage>>,
    failing: HashSet<TxHash>,
    extractions: AtomicUsize,
}

impl MockExtractor {
    /// Returns a new [`MockExtractor`] serving the messages.
    pub fn new(messages: Vec<OutboundMessage>) -> Self {
        let mut by_tx: HashMap<TxHash, Vec<OutboundMessage>> = HashMap::new();
        for message in messages {
            by_tx.entry(message.origin_tx).or_default().push(message);
        }
        Self { messages: by_tx, ..Default::default() }
    }

    /// Makes the extraction of the transaction fail with a cardinality error.
    pub fn with_failing_tx(mut self, tx_hash: TxHash) -> Self {
        self.failing.insert(tx_hash);
        self
    }

    /// Returns the number of extractions.
    pub fn extractions(&self) -> usize {
        self.extractions.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl MessageExtractor for MockExtractor {
    async fn extract(&self, tx_hash: TxHash) -> Result<Vec<OutboundMessage>, BridgeError> {
        self.extractions.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(&tx_hash) {
            return Err(BridgeError::MessageCardinality { tx_hash, found: 2 });
        }
        Ok(self.messages.get(&tx_hash).cloned().unwrap_or_default())
    }
}
