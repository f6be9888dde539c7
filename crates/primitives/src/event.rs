use crate::BlockRange;
use alloy_primitives::{Address, TxHash, U256};

/// One emission of the router's `FundsRouted` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutingEvent {
    /// The hash of the transaction which emitted the event.
    pub tx_hash: TxHash,
    /// The block the event was emitted at.
    pub block_number: u64,
    /// The index of the log in the block.
    pub log_index: u64,
    /// The token that was routed. The native asset is represented by the sentinel address.
    pub token: Address,
    /// The routed amount.
    pub amount: U256,
    /// The range of blocks in which the event was discovered.
    pub range: BlockRange,
}

impl core::fmt::Display for RoutingEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "RoutingEvent {{ tx_hash: {}, block_number: {}, log_index: {} }}",
            self.tx_hash, self.block_number, self.log_index
        )
    }
}
