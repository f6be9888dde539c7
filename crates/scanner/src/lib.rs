//! Discovery of the `FundsRouted` events emitted by a reward router, backed by a durable log cache.

mod cache;
pub use cache::{LogCache, LogFilter, DEFAULT_PAGE_SIZE};

mod error;
pub use error::{FilterLogError, LogCacheError, ScannerError};

mod metrics;
pub use metrics::LogCacheMetrics;

mod scanner;
pub use scanner::{EventScanner, EventSource, Scan};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
