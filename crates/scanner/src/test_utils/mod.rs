use alloy_primitives::{Address, Bytes, LogData, B256};
use alloy_rpc_types_eth::Log;

/// Test utils for provider.
pub mod provider;

/// Returns a mined log emitted by the address at the provided block, with the provided topic and
/// empty data. The transaction hash is derived from the block number and log index.
pub fn log_at(address: Address, topic: B256, block_number: u64, log_index: u64) -> Log {
    log_with_data(address, vec![topic], Bytes::new(), block_number, log_index)
}

/// Returns a mined log emitted by the address at the provided block.
pub fn log_with_data(
    address: Address,
    topics: Vec<B256>,
    data: Bytes,
    block_number: u64,
    log_index: u64,
) -> Log {
    let mut tx_hash = [0u8; 32];
    tx_hash[16..24].copy_from_slice(&block_number.to_be_bytes());
    tx_hash[24..].copy_from_slice(&log_index.to_be_bytes());

    Log {
        inner: alloy_primitives::Log { address, data: LogData::new_unchecked(topics, data) },
        block_hash: Some(B256::left_padding_from(&block_number.to_be_bytes())),
        block_number: Some(block_number),
        block_timestamp: None,
        transaction_hash: Some(B256::from(tx_hash)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        removed: false,
    }
}
