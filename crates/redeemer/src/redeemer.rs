use crate::{
    error::RedeemerResult, MessageReport, PassReport, RedeemerConfig, RedeemerError,
    RedeemerMetrics,
};

use std::collections::HashSet;

use router_bridge::{MessageExtractor, ProtocolAdapter};
use router_primitives::{OutboundMessage, RoutingEvent, Watermark};
use router_scanner::EventSource;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Drives the outbound messages of a reward router to execution on the destination chain.
///
/// A pass scans the routing events from the watermark, extracts the outbound messages of each
/// routing transaction and advances them as far as they currently go. After a successful pass the
/// watermark moves to the lowest block still holding a message that is not terminal, or past the
/// scanned range if every message is terminal. A failed pass leaves it untouched so the next pass
/// re-scans the same range.
#[derive(Debug)]
pub struct Redeemer<S, E, A> {
    /// The source of routing events.
    source: S,
    /// The extractor of the outbound messages.
    extractor: E,
    /// The adapter of the protocol family the messages belong to.
    adapter: A,
    /// The redeemer configuration.
    config: RedeemerConfig,
    /// The next block to scan.
    watermark: Watermark,
    /// The redeemer metrics.
    metrics: RedeemerMetrics,
}

impl<S, E, A> Redeemer<S, E, A>
where
    S: EventSource,
    E: MessageExtractor,
    A: ProtocolAdapter,
{
    /// Returns a new [`Redeemer`] scanning from the configured start block.
    pub fn new(source: S, extractor: E, adapter: A, config: RedeemerConfig) -> Self {
        Self {
            source,
            extractor,
            adapter,
            watermark: Watermark::new(config.start_block()),
            config,
            metrics: RedeemerMetrics::default(),
        }
    }

    /// Returns the current watermark.
    pub const fn watermark(&self) -> Watermark {
        self.watermark
    }

    /// Runs a single pass without waiting on any message. Messages which are not actionable yet
    /// are reported and left for a later pass.
    pub async fn redeem_once(&mut self) -> RedeemerResult<PassReport> {
        self.metered_pass(None).await
    }

    /// Runs the redeemer. In one-off mode a single [`Self::redeem_once`] pass is run and its
    /// failure is returned. Otherwise passes are run every loop interval until cancelled, waiting
    /// on each message until it is actionable. Failed passes are logged and retried on the next
    /// pass. Returns the watermark to resume from.
    pub async fn run(mut self, one_off: bool, cancel: CancellationToken) -> RedeemerResult<Watermark> {
        if one_off {
            let report = self.redeem_once().await?;
            return Ok(report.watermark);
        }

        tracing::info!(target: "router::redeemer", family = %self.adapter.family(), from_block = %self.watermark, interval = ?self.config.loop_interval(), "starting continuous redeemer");
        loop {
            match self.metered_pass(Some(&cancel)).await {
                Ok(_) => {}
                Err(RedeemerError::Cancelled) => break,
                Err(err) => {
                    tracing::error!(target: "router::redeemer", ?err, kind = %err.kind(), watermark = %self.watermark, "redemption pass failed")
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.loop_interval()) => {}
            }
        }

        tracing::info!(target: "router::redeemer", watermark = %self.watermark, "stopping continuous redeemer");
        Ok(self.watermark)
    }

    /// Runs a pass and records its metrics.
    async fn metered_pass(
        &mut self,
        cancel: Option<&CancellationToken>,
    ) -> RedeemerResult<PassReport> {
        let start = Instant::now();
        let res = self.pass(cancel).await;
        self.metrics.pass_duration.record(start.elapsed().as_secs_f64());

        match &res {
            Ok(report) => {
                self.metrics.passes.increment(1);
                self.metrics.pending_messages.set(report.pending().count() as f64);
                tracing::info!(
                    target: "router::redeemer",
                    range = ?report.range,
                    messages = report.messages.len(),
                    pending = report.pending().count(),
                    submitted = report.submitted().count(),
                    watermark = %report.watermark,
                    "redemption pass completed"
                );
            }
            Err(_) => self.metrics.failed_passes.increment(1),
        }

        res
    }

    /// Scans from the watermark and advances every message found. When a cancellation token is
    /// provided, waits on each message until it is actionable before advancing it.
    async fn pass(&mut self, cancel: Option<&CancellationToken>) -> RedeemerResult<PassReport> {
        let scan = self.source.scan(self.watermark.next_block()).await?;
        let Some(range) = scan.range else {
            return Ok(PassReport::empty(self.watermark));
        };

        // a transaction emitting several routing events is handled once.
        let mut seen = HashSet::new();
        let mut messages = Vec::new();
        for event in scan.events.iter().filter(|event| seen.insert(event.tx_hash)) {
            for message in self.extractor.extract(event.tx_hash).await? {
                messages.push(self.handle(event, &message, cancel).await?);
            }
        }

        let lowest_pending = messages
            .iter()
            .filter(|message| !message.state.is_terminal())
            .map(|message| message.block_number)
            .min();
        self.watermark = self.watermark.advance(range.to, lowest_pending);

        Ok(PassReport { range: Some(range), messages, watermark: self.watermark })
    }

    /// Advances the message, waiting until it is actionable first if a cancellation token is
    /// provided.
    async fn handle(
        &self,
        event: &RoutingEvent,
        message: &OutboundMessage,
        cancel: Option<&CancellationToken>,
    ) -> RedeemerResult<MessageReport> {
        if let Some(cancel) = cancel {
            let state =
                self.adapter.wait_until_actionable(message, self.config.poll(), cancel).await?;
            if cancel.is_cancelled() {
                return Err(RedeemerError::Cancelled);
            }
            tracing::debug!(target: "router::redeemer", id = ?message.id, %state, "done waiting on message");
        }

        let advance = self.adapter.advance(message).await?;
        if advance.tx_hash.is_some() {
            self.metrics.submitted_transactions.increment(1);
        }
        if advance.state.is_terminal() {
            self.metrics.executed_messages.increment(1);
        }

        match advance.tx_hash {
            Some(tx_hash) => {
                tracing::info!(target: "router::redeemer", id = ?message.id, ?tx_hash, state = %advance.state, "advanced message")
            }
            None if !advance.state.is_terminal() => {
                tracing::info!(target: "router::redeemer", id = ?message.id, origin_tx = ?message.origin_tx, state = %advance.state, "message not yet actionable")
            }
            None => {
                tracing::debug!(target: "router::redeemer", id = ?message.id, "message already executed")
            }
        }

        Ok(MessageReport {
            id: message.id,
            origin_tx: message.origin_tx,
            block_number: event.block_number,
            state: advance.state,
            tx_hash: advance.tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{routing_event, MockEventSource, MockExtractor},
        DEFAULT_LOOP_INTERVAL,
    };

    use router_bridge::{
        op_stack::PortalRevert,
        test_utils::{
            arbitrum::MockArbitrumBridge, arbitrum_message, op_stack::MockOpStackBridge,
            op_stack_message,
        },
        ArbitrumAdapter, ErrorKind, OpStackAdapter,
    };
    use router_primitives::MessageState;

    #[tokio::test]
    async fn test_one_shot_should_not_block_on_unconfirmed_message() -> eyre::Result<()> {
        // Given
        let message = arbitrum_message(5);
        let source = MockEventSource::new(vec![routing_event(&message)], 20);
        let bridge = MockArbitrumBridge::new(vec![None]);
        let mut redeemer = Redeemer::new(
            &source,
            MockExtractor::new(vec![message.clone()]),
            ArbitrumAdapter::new(&bridge),
            RedeemerConfig::default(),
        );

        // When
        let report = redeemer.redeem_once().await?;

        // Then
        assert_eq!(report.messages.len(), 1);
        assert_eq!(report.messages[0].state, MessageState::Unconfirmed);
        assert_eq!(report.messages[0].tx_hash, None);
        assert_eq!(bridge.send_count_queries(), 1);
        assert_eq!(bridge.executions(), 0);
        // the watermark stops at the pending message.
        assert_eq!(report.watermark.next_block(), 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_one_shot_should_execute_and_move_past_range() -> eyre::Result<()> {
        // Given
        let message = arbitrum_message(5);
        let source = MockEventSource::new(vec![routing_event(&message)], 20);
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let mut redeemer = Redeemer::new(
            &source,
            MockExtractor::new(vec![message]),
            ArbitrumAdapter::new(&bridge),
            RedeemerConfig::default(),
        );

        // When
        let report = redeemer.redeem_once().await?;

        // Then
        assert_eq!(report.messages[0].state, MessageState::Executed);
        assert_eq!(report.submitted().count(), 1);
        assert_eq!(report.pending().count(), 0);
        assert_eq!(report.watermark.next_block(), 21);
        assert_eq!(redeemer.watermark().next_block(), 21);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_advance_watermark_on_cardinality_error() -> eyre::Result<()> {
        // Given
        let healthy = arbitrum_message(3);
        let broken = arbitrum_message(7);
        let source =
            MockEventSource::new(vec![routing_event(&healthy), routing_event(&broken)], 20);
        let extractor =
            MockExtractor::new(vec![healthy, broken.clone()]).with_failing_tx(broken.origin_tx);
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let mut redeemer = Redeemer::new(
            &source,
            extractor,
            ArbitrumAdapter::new(&bridge),
            RedeemerConfig::new(2, DEFAULT_LOOP_INTERVAL, Default::default()),
        );

        // When
        let err = redeemer.redeem_once().await.unwrap_err();

        // Then
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(redeemer.watermark().next_block(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_report_challenge_period_without_error() -> eyre::Result<()> {
        // Given
        let message = op_stack_message(8);
        let source = MockEventSource::new(vec![routing_event(&message)], 20);
        let bridge = MockOpStackBridge::new(vec![Err(PortalRevert::ProofNotOldEnough)]);
        let mut redeemer = Redeemer::new(
            &source,
            MockExtractor::new(vec![message]),
            OpStackAdapter::new(&bridge),
            RedeemerConfig::default(),
        );

        // When
        let report = redeemer.redeem_once().await?;

        // Then
        assert_eq!(report.messages[0].state, MessageState::ChallengePeriod);
        assert_eq!(report.submitted().count(), 0);
        assert_eq!(bridge.proofs() + bridge.finalizations(), 0);
        assert_eq!(report.watermark.next_block(), 8);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_extract_transaction_once() -> eyre::Result<()> {
        // Given
        let message = arbitrum_message(4);
        let event = routing_event(&message);
        let source = MockEventSource::new(vec![event, RoutingEvent { log_index: 1, ..event }], 20);
        let extractor = MockExtractor::new(vec![message]);
        let bridge = MockArbitrumBridge::new(vec![Some(10)]);
        let mut redeemer = Redeemer::new(
            &source,
            &extractor,
            ArbitrumAdapter::new(&bridge),
            RedeemerConfig::default(),
        );

        // When
        let report = redeemer.redeem_once().await?;

        // Then
        assert_eq!(extractor.extractions(), 1);
        assert_eq!(report.messages.len(), 1);
        assert_eq!(bridge.executions(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_keep_watermark_when_chain_did_not_advance() -> eyre::Result<()> {
        let source = MockEventSource::new(vec![], 20);
        let bridge = MockArbitrumBridge::new(vec![None]);
        let mut redeemer = Redeemer::new(
            &source,
            MockExtractor::default(),
            ArbitrumAdapter::new(&bridge),
            RedeemerConfig::new(30, DEFAULT_LOOP_INTERVAL, Default::default()),
        );

        let report = redeemer.redeem_once().await?;

        assert_eq!(report.range, None);
        assert_eq!(report.watermark.next_block(), 30);
        assert_eq!(source.scan_requests(), vec![30]);

        Ok(())
    }
}
