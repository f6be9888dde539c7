use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::Redeemer`].
#[derive(Metrics, Clone)]
#[metrics(scope = "redeemer")]
pub struct RedeemerMetrics {
    /// A counter on the completed passes.
    pub passes: Counter,
    /// A counter on the failed passes.
    pub failed_passes: Counter,
    /// A counter on the transactions submitted to advance messages.
    pub submitted_transactions: Counter,
    /// A counter on the messages observed executed.
    pub executed_messages: Counter,
    /// The number of messages left pending by the last pass.
    pub pending_messages: Gauge,
    /// The duration of a pass, in seconds.
    pub pass_duration: Histogram,
}
