//! End to end tests of the redeemer over the log cache, the event scanner and the receipt
//! extractor.
#![cfg(feature = "test-utils")]

use std::sync::Arc;

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use router_bindings::logs::FundsRouted;
use router_bridge::{
    test_utils::{
        arbitrum::MockArbitrumBridge,
        arbitrum_log, l2_to_l1_tx,
        provider::{receipt, MockReceiptProvider},
        ROUTER,
    },
    ArbitrumAdapter, ReceiptExtractor, DEFAULT_RECEIPT_CACHE_CAPACITY,
};
use router_db::test_utils::setup_test_db;
use router_primitives::{BlockRange, MessageState, ProtocolFamily};
use router_redeemer::{Redeemer, RedeemerConfig};
use router_scanner::{
    test_utils::{log_with_data, provider::MockProvider},
    EventScanner, LogCache,
};

const BLOCK_LAG: u64 = 5;

/// Returns a `FundsRouted` log emitted by the router at the provided block, with its tx hash.
fn routing_tx(block_number: u64) -> (TxHash, Log) {
    let event = FundsRouted { token: Address::repeat_byte(0xee), amount: U256::from(1_000) };
    let data = event.encode_log_data();
    let log = log_with_data(ROUTER, data.topics().to_vec(), data.data, block_number, 0);
    (log.transaction_hash.unwrap_or_default(), log)
}

#[tokio::test]
async fn test_redeem_once_from_chain_logs() -> eyre::Result<()> {
    // Given: two routing transactions, each sending one outbox message.
    let (confirmed_tx, confirmed_log) = routing_tx(12);
    let (pending_tx, pending_log) = routing_tx(30);

    let logs = MockProvider::new(vec![confirmed_log, pending_log], 40);
    let receipts = MockReceiptProvider::new(vec![
        receipt(confirmed_tx, 12, vec![arbitrum_log(&l2_to_l1_tx(3))]),
        receipt(pending_tx, 30, vec![arbitrum_log(&l2_to_l1_tx(8))]),
    ]);
    // the send root covers the message at position 3 only.
    let bridge = MockArbitrumBridge::new(vec![Some(5)]);

    let cache = Arc::new(LogCache::new(Arc::new(setup_test_db().await), 10));
    let mut redeemer = Redeemer::new(
        EventScanner::new(&logs, cache, ROUTER, BLOCK_LAG),
        ReceiptExtractor::new(&receipts, ProtocolFamily::Arbitrum, DEFAULT_RECEIPT_CACHE_CAPACITY),
        ArbitrumAdapter::new(&bridge),
        RedeemerConfig::default(),
    );

    // When
    let first = redeemer.redeem_once().await?;

    // Then
    assert_eq!(first.range, BlockRange::new(0, 35));
    assert_eq!(first.messages.len(), 2);

    assert_eq!(first.messages[0].origin_tx, confirmed_tx);
    assert_eq!(first.messages[0].state, MessageState::Executed);
    assert!(first.messages[0].tx_hash.is_some());

    assert_eq!(first.messages[1].origin_tx, pending_tx);
    assert_eq!(first.messages[1].state, MessageState::Unconfirmed);
    assert_eq!(first.messages[1].tx_hash, None);

    // the watermark stops at the block of the pending message.
    assert_eq!(first.watermark.next_block(), 30);
    assert_eq!(bridge.executions(), 1);

    // When: the chain advances and the redeemer runs again.
    logs.set_head(50);
    let second = redeemer.redeem_once().await?;

    // Then: only the pending message is found again, from the cached receipt.
    assert_eq!(second.range, BlockRange::new(30, 45));
    assert_eq!(second.messages.len(), 1);
    assert_eq!(second.messages[0].origin_tx, pending_tx);
    assert_eq!(second.messages[0].state, MessageState::Unconfirmed);
    assert_eq!(second.watermark.next_block(), 30);
    assert_eq!(receipts.receipt_requests(), 2);
    assert_eq!(bridge.executions(), 1);

    Ok(())
}
