use crate::{error::LogCacheError, LogCacheMetrics};

use std::{sync::Arc, time::Instant};

use alloy_primitives::{hex, keccak256, Address, B256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use router_db::{Database, DatabaseOperations};
use router_primitives::BlockRange;

/// The default number of blocks queried in a single `eth_getLogs` request.
pub const DEFAULT_PAGE_SIZE: u64 = 10_000;

/// A log filter over a single emitting address and a set of event signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// The address emitting the logs.
    pub address: Address,
    /// The accepted event signatures (topic 0).
    pub topics: Vec<B256>,
    /// The first block of the query.
    pub from_block: u64,
    /// The last block of the query. Defaults to the head of the chain.
    pub to_block: Option<u64>,
}

impl LogFilter {
    /// Returns a new [`LogFilter`] for the address and event signatures, starting at the provided
    /// block.
    pub fn new(address: Address, topics: Vec<B256>, from_block: u64) -> Self {
        Self { address, topics, from_block, to_block: None }
    }

    /// Sets the last block of the query.
    pub const fn with_to_block(mut self, to_block: u64) -> Self {
        self.to_block = Some(to_block);
        self
    }

    /// Returns the key under which the logs for the filter are cached.
    ///
    /// The key only depends on the address and the event signatures, so that the same key is
    /// resolved across restarts and block ranges.
    pub fn cache_key(&self) -> String {
        let mut topics = self.topics.clone();
        topics.sort_unstable();
        topics.dedup();

        let mut preimage = self.address.to_vec();
        topics.iter().for_each(|topic| preimage.extend_from_slice(topic.as_slice()));
        hex::encode_prefixed(keccak256(preimage))
    }

    /// Returns the RPC [`Filter`] for the provided range.
    fn rpc_filter(&self, range: BlockRange) -> Filter {
        Filter::new()
            .address(self.address)
            .event_signature(self.topics.clone())
            .from_block(range.from)
            .to_block(range.to)
    }
}

/// A durable cache of the logs returned for [`LogFilter`]s.
///
/// Logs are fetched in windows of `page_size` blocks. Each window is written atomically along
/// with the record of its range, which means a failed fetch never leaves a partially cached
/// window behind. Entries are never invalidated.
#[derive(Debug)]
pub struct LogCache {
    /// The cache database.
    database: Arc<Database>,
    /// The number of blocks queried in a single request.
    page_size: u64,
    /// The log cache metrics.
    metrics: LogCacheMetrics,
}

impl LogCache {
    /// Returns a new [`LogCache`] backed by the provided database.
    pub fn new(database: Arc<Database>, page_size: u64) -> Self {
        Self { database, page_size: page_size.max(1), metrics: LogCacheMetrics::default() }
    }

    /// Returns the logs matching the filter, ordered by block number and log index.
    ///
    /// Only the windows of the range which are not cached yet are fetched from the provider.
    pub async fn get_logs<P: Provider>(
        &self,
        provider: &P,
        filter: &LogFilter,
    ) -> Result<Vec<Log>, LogCacheError> {
        let to_block = match filter.to_block {
            Some(to_block) => to_block,
            None => provider.get_block_number().await?,
        };
        let Some(range) = BlockRange::new(filter.from_block, to_block) else {
            return Ok(vec![]);
        };

        let key = filter.cache_key();
        let cached = self.database.get_cached_ranges(&key).await?;
        let missing = range.subtract(&cached);

        if missing.is_empty() {
            self.metrics.cache_hits.increment(1);
        } else {
            self.metrics.cache_misses.increment(1);
        }

        for window in missing.iter().flat_map(|gap| gap.windows(self.page_size)) {
            self.fetch_window(provider, filter, &key, window).await?;
        }

        Ok(self.database.get_cached_logs(&key, range).await?)
    }

    /// Fetches the logs for the window and writes them to the cache in a single transaction.
    async fn fetch_window<P: Provider>(
        &self,
        provider: &P,
        filter: &LogFilter,
        key: &str,
        window: BlockRange,
    ) -> Result<(), LogCacheError> {
        tracing::trace!(target: "router::scanner", address = ?filter.address, %window, "fetching logs");

        let now = Instant::now();
        let logs = match provider.get_logs(&filter.rpc_filter(window)).await {
            Ok(logs) => logs,
            Err(err) => {
                tracing::debug!(target: "router::scanner", %window, ?err, "failed to fetch logs");
                self.metrics.failed_fetches.increment(1);
                return Err(err.into());
            }
        };
        self.metrics.fetch_duration.record(now.elapsed().as_secs_f64());

        let logs: Vec<_> = logs.into_iter().filter(|log| !log.removed).collect();
        self.metrics.fetched_windows.increment(1);
        self.metrics.fetched_logs.increment(logs.len() as u64);

        let tx = self.database.tx().await?;
        tx.insert_log_range(key, window, &logs).await?;
        tx.commit().await?;

        Ok(())
    }
}
