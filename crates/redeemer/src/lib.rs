//! The redemption driver: scans the routing events, extracts their outbound messages and drives
//! them through their protocol adapter, either once or in a continuous loop.

mod config;
pub use config::{RedeemerConfig, DEFAULT_LOOP_INTERVAL};

mod error;
pub use error::RedeemerError;

mod metrics;
pub use metrics::RedeemerMetrics;

mod redeemer;
pub use redeemer::Redeemer;

mod report;
pub use report::{MessageReport, PassReport};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
