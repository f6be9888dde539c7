use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::LogCache`].
#[derive(Metrics, Clone)]
#[metrics(scope = "log_cache")]
pub struct LogCacheMetrics {
    /// A counter on the requests fully served from the cache.
    pub cache_hits: Counter,
    /// A counter on the requests which required at least one fetch.
    pub cache_misses: Counter,
    /// A counter on the windows fetched from the provider.
    pub fetched_windows: Counter,
    /// A counter on the logs fetched from the provider.
    pub fetched_logs: Counter,
    /// A counter on the failed window fetches.
    pub failed_fetches: Counter,
    /// The duration of a window fetch, in seconds.
    pub fetch_duration: Histogram,
}
