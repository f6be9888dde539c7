//! Integration tests of the redemption driver.
#![cfg(feature = "test-utils")]

use std::{sync::Arc, time::Duration};

use router_bridge::{
    op_stack::PortalRevert,
    poll::Poll,
    test_utils::{
        arbitrum::MockArbitrumBridge,
        arbitrum_message,
        op_stack::{game_at, MockOpStackBridge},
        op_stack_message,
    },
    ArbitrumAdapter, OpStackAdapter,
};
use router_primitives::MessageState;
use router_redeemer::{
    test_utils::{routing_event, MockEventSource, MockExtractor},
    Redeemer, RedeemerConfig,
};
use tokio_util::sync::CancellationToken;

const LOOP_INTERVAL: Duration = Duration::from_secs(60 * 60);

fn config(start_block: u64) -> RedeemerConfig {
    RedeemerConfig::new(
        start_block,
        LOOP_INTERVAL,
        Poll::new(Duration::from_secs(60), Duration::from_secs(30 * 60)),
    )
}

#[tokio::test]
async fn test_redeem_once_is_idempotent() -> eyre::Result<()> {
    // Given
    let message = arbitrum_message(5);
    let source = MockEventSource::new(vec![routing_event(&message)], 20);
    let extractor = MockExtractor::new(vec![message]);
    let bridge = MockArbitrumBridge::new(vec![Some(10)]);

    // When: two independent invocations from the same start block.
    let first = Redeemer::new(&source, &extractor, ArbitrumAdapter::new(&bridge), config(0))
        .redeem_once()
        .await?;
    let second = Redeemer::new(&source, &extractor, ArbitrumAdapter::new(&bridge), config(0))
        .redeem_once()
        .await?;

    // Then
    assert_eq!(first.messages[0].state, MessageState::Executed);
    assert!(first.messages[0].tx_hash.is_some());
    assert_eq!(second.messages[0].state, MessageState::Executed);
    assert_eq!(second.messages[0].tx_hash, None);
    assert_eq!(bridge.executions(), 1);
    assert_eq!(first.watermark, second.watermark);

    Ok(())
}

#[tokio::test]
async fn test_redeem_once_walks_op_stack_withdrawal_over_passes() -> eyre::Result<()> {
    // Given
    let message = op_stack_message(100);
    let source = MockEventSource::new(vec![routing_event(&message)], 200);
    let bridge = MockOpStackBridge::new(vec![
        Err(PortalRevert::Unproven),
        Err(PortalRevert::ProofNotOldEnough),
        Ok(()),
    ])
    .with_latest_game(game_at(150));
    let mut redeemer = Redeemer::new(
        &source,
        MockExtractor::new(vec![message]),
        OpStackAdapter::new(&bridge),
        config(0),
    );

    // When
    let proven = redeemer.redeem_once().await?;
    let waiting = redeemer.redeem_once().await?;
    let finalized = redeemer.redeem_once().await?;

    // Then
    assert_eq!(proven.messages[0].state, MessageState::ChallengePeriod);
    assert_eq!(proven.watermark.next_block(), 100);
    assert_eq!(waiting.messages[0].state, MessageState::ChallengePeriod);
    assert_eq!(waiting.submitted().count(), 0);
    assert_eq!(finalized.messages[0].state, MessageState::Executed);
    assert_eq!(finalized.watermark.next_block(), 201);
    assert_eq!(source.scan_requests(), vec![0, 100, 100]);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_continuous_executes_after_confirmation_then_sleeps() -> eyre::Result<()> {
    // Given: the message is confirmed after two polls.
    let message = arbitrum_message(5);
    let source = Arc::new(MockEventSource::new(vec![routing_event(&message)], 20));
    let bridge = Arc::new(MockArbitrumBridge::new(vec![None, None, Some(10)]));
    let redeemer = Redeemer::new(
        source.clone(),
        Arc::new(MockExtractor::new(vec![message])),
        ArbitrumAdapter::new(bridge.clone()),
        config(0),
    );
    let cancel = CancellationToken::new();

    // When
    let handle = tokio::spawn(redeemer.run(false, cancel.clone()));
    tokio::time::sleep(LOOP_INTERVAL + Duration::from_secs(10 * 60)).await;
    cancel.cancel();
    let watermark = handle.await??;

    // Then
    assert_eq!(bridge.executions(), 1);
    assert!(bridge.send_count_queries() >= 3);
    assert_eq!(source.scan_requests(), vec![0, 21]);
    let times = source.scan_times();
    assert!(times[1] - times[0] >= LOOP_INTERVAL);
    assert_eq!(watermark.next_block(), 21);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_continuous_survives_failed_passes() -> eyre::Result<()> {
    // Given
    let message = arbitrum_message(5);
    let source = Arc::new(MockEventSource::new(vec![routing_event(&message)], 20));
    let extractor =
        Arc::new(MockExtractor::new(vec![message.clone()]).with_failing_tx(message.origin_tx));
    let bridge = Arc::new(MockArbitrumBridge::new(vec![Some(10)]));
    let redeemer = Redeemer::new(
        source.clone(),
        extractor.clone(),
        ArbitrumAdapter::new(bridge.clone()),
        config(3),
    );
    let cancel = CancellationToken::new();

    // When
    let handle = tokio::spawn(redeemer.run(false, cancel.clone()));
    tokio::time::sleep(LOOP_INTERVAL * 2 + Duration::from_secs(60)).await;
    cancel.cancel();
    let watermark = handle.await??;

    // Then: every pass re-scans the same range.
    assert_eq!(source.scan_requests(), vec![3, 3, 3]);
    assert_eq!(extractor.extractions(), 3);
    assert_eq!(bridge.executions(), 0);
    assert_eq!(watermark.next_block(), 3);

    Ok(())
}

#[tokio::test]
async fn test_one_off_run_surfaces_failure() {
    let message = arbitrum_message(5);
    let source = MockEventSource::new(vec![routing_event(&message)], 20);
    let extractor = MockExtractor::new(vec![message.clone()]).with_failing_tx(message.origin_tx);
    let bridge = MockArbitrumBridge::new(vec![Some(10)]);
    let redeemer = Redeemer::new(&source, &extractor, ArbitrumAdapter::new(&bridge), config(0));

    let res = redeemer.run(true, CancellationToken::new()).await;

    assert!(res.is_err());
}
