use crate::{
    error::{FilterLogError, ScannerResult},
    LogCache, LogFilter, ScannerError,
};

use std::sync::Arc;

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use router_bindings::logs::FundsRouted;
use router_primitives::{BlockRange, RoutingEvent};

/// The result of a scan.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Scan {
    /// The scanned range. [`None`] if the chain did not advance past the block lag.
    pub range: Option<BlockRange>,
    /// The routing events found in the range, ordered by block number and log index.
    pub events: Vec<RoutingEvent>,
}

/// A source of [`RoutingEvent`]s.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait EventSource: Send + Sync {
    /// Returns the routing events emitted from `from_block` up to the safe head of the chain.
    async fn scan(&self, from_block: u64) -> Result<Scan, ScannerError>;
}

/// Scans the router's `FundsRouted` events up to the head of the chain minus a block lag.
#[derive(Debug)]
pub struct EventScanner<P> {
    /// The source chain provider.
    provider: P,
    /// The log cache.
    cache: Arc<LogCache>,
    /// The address of the router emitting the events.
    router: Address,
    /// The number of blocks kept between the head of the chain and the scanned range.
    block_lag: u64,
}

impl<P: Provider> EventScanner<P> {
    /// Returns a new [`EventScanner`] for the router.
    pub const fn new(provider: P, cache: Arc<LogCache>, router: Address, block_lag: u64) -> Self {
        Self { provider, cache, router, block_lag }
    }

    /// Returns the routing events in the provided range.
    pub async fn scan_range(&self, range: BlockRange) -> ScannerResult<Vec<RoutingEvent>> {
        let filter = LogFilter::new(self.router, vec![FundsRouted::SIGNATURE_HASH], range.from)
            .with_to_block(range.to);
        let logs = self.cache.get_logs(&self.provider, &filter).await?;

        logs.iter().map(|log| decode_routing_event(log, range)).collect()
    }

    /// Returns the head of the chain minus the block lag.
    async fn safe_head(&self) -> ScannerResult<u64> {
        Ok(self.provider.get_block_number().await?.saturating_sub(self.block_lag))
    }
}

#[async_trait::async_trait]
impl<P: Provider> EventSource for EventScanner<P> {
    async fn scan(&self, from_block: u64) -> Result<Scan, ScannerError> {
        let to_block = self.safe_head().await?;
        let Some(range) = BlockRange::new(from_block, to_block) else {
            tracing::debug!(target: "router::scanner", from_block, to_block, "chain has not advanced past the block lag");
            return Ok(Scan::default());
        };

        let events = self.scan_range(range).await?;
        tracing::debug!(target: "router::scanner", %range, events = events.len(), "scanned routing events");

        Ok(Scan { range: Some(range), events })
    }
}

/// Decodes the `FundsRouted` log into a [`RoutingEvent`].
fn decode_routing_event(log: &Log, range: BlockRange) -> ScannerResult<RoutingEvent> {
    let decoded = FundsRouted::decode_log(&log.inner).map_err(|error| {
        FilterLogError::DecodeLogFailed {
            log_type: FundsRouted::SIGNATURE,
            tx_hash: log.transaction_hash,
            error,
        }
    })?;

    Ok(RoutingEvent {
        tx_hash: log.transaction_hash.ok_or(FilterLogError::MissingTransactionHash)?,
        block_number: log.block_number.ok_or(FilterLogError::MissingBlockNumber)?,
        log_index: log.log_index.ok_or(FilterLogError::MissingLogIndex)?,
        token: decoded.token,
        amount: decoded.amount,
        range,
    })
}
