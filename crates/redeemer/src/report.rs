use alloy_primitives::{TxHash, B256};
use router_primitives::{BlockRange, MessageState, Watermark};

/// The outcome of a redemption pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// The scanned range, [`None`] if the chain did not advance past the block lag.
    pub range: Option<BlockRange>,
    /// The messages handled during the pass, in scan order.
    pub messages: Vec<MessageReport>,
    /// The watermark after the pass.
    pub watermark: Watermark,
}

impl PassReport {
    /// Returns a report for a pass which scanned nothing.
    pub(crate) const fn empty(watermark: Watermark) -> Self {
        Self { range: None, messages: Vec::new(), watermark }
    }

    /// Returns an iterator over the messages which are not terminal yet.
    pub fn pending(&self) -> impl Iterator<Item = &MessageReport> {
        self.messages.iter().filter(|message| !message.state.is_terminal())
    }

    /// Returns an iterator over the transactions submitted during the pass.
    pub fn submitted(&self) -> impl Iterator<Item = TxHash> + '_ {
        self.messages.iter().filter_map(|message| message.tx_hash)
    }
}

/// The outcome of a pass for a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageReport {
    /// The identifier of the message.
    pub id: B256,
    /// The transaction which produced the message.
    pub origin_tx: TxHash,
    /// The block of the routing event which produced the message.
    pub block_number: u64,
    /// The state of the message at the end of the pass.
    pub state: MessageState,
    /// The transaction submitted during the pass, if any.
    pub tx_hash: Option<TxHash>,
}
