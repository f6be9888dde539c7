use std::time::Duration;

use router_bridge::poll::Poll;

/// The default interval between two passes of the continuous mode.
pub const DEFAULT_LOOP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Configuration for the [`crate::Redeemer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemerConfig {
    /// The first block to scan.
    start_block: u64,
    /// The interval between two passes of the continuous mode.
    loop_interval: Duration,
    /// The poll used to wait for a message to become actionable in continuous mode.
    poll: Poll,
}

impl Default for RedeemerConfig {
    fn default() -> Self {
        Self { start_block: 0, loop_interval: DEFAULT_LOOP_INTERVAL, poll: Poll::default() }
    }
}

impl RedeemerConfig {
    /// Creates a new redeemer configuration.
    pub const fn new(start_block: u64, loop_interval: Duration, poll: Poll) -> Self {
        Self { start_block, loop_interval, poll }
    }

    /// Returns the first block to scan.
    pub const fn start_block(&self) -> u64 {
        self.start_block
    }

    /// Returns the interval between two passes of the continuous mode.
    pub const fn loop_interval(&self) -> Duration {
        self.loop_interval
    }

    /// Returns the poll used to wait for a message to become actionable.
    pub const fn poll(&self) -> &Poll {
        &self.poll
    }
}
