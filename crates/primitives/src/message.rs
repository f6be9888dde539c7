use crate::ProtocolFamily;
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};

/// A protocol level descriptor of one unit of value moving from the source chain to the
/// destination chain.
///
/// Messages are re-derived from the logs on every pass and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The origin identifier of the message: the outbox leaf hash for Arbitrum, the hash of the
    /// first withdrawal for OP-stack.
    pub id: B256,
    /// The transaction which produced the message.
    pub origin_tx: TxHash,
    /// The block of the transaction which produced the message.
    pub origin_block: u64,
    /// The protocol specific payload.
    pub payload: MessagePayload,
}

impl OutboundMessage {
    /// Returns the [`ProtocolFamily`] owning the message.
    pub const fn protocol(&self) -> ProtocolFamily {
        match self.payload {
            MessagePayload::Arbitrum(_) => ProtocolFamily::Arbitrum,
            MessagePayload::OpStack(_) => ProtocolFamily::OpStack,
        }
    }
}

impl core::fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "OutboundMessage {{ id: {}, protocol: {}, origin_tx: {} }}",
            self.id,
            self.protocol(),
            self.origin_tx
        )
    }
}

/// The protocol specific content of an [`OutboundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum MessagePayload {
    /// A child to parent message sent through `ArbSys`.
    Arbitrum(ArbitrumMessage),
    /// The withdrawals initiated by an OP-stack transaction receipt.
    OpStack(OpStackReceipt),
}

/// The fields of an Arbitrum `L2ToL1Tx` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitrumMessage {
    /// The account which initiated the message on the child chain.
    pub caller: Address,
    /// The target of the message on the parent chain.
    pub destination: Address,
    /// The unique hash of the message.
    pub hash: U256,
    /// The position of the message in the outbox merkle tree.
    pub position: U256,
    /// The child chain block number the message was sent at.
    pub arb_block_num: U256,
    /// The parent chain block number observed when the message was sent.
    pub eth_block_num: U256,
    /// The child chain timestamp the message was sent at.
    pub timestamp: U256,
    /// The value carried by the message.
    pub callvalue: U256,
    /// The calldata of the message.
    pub data: Bytes,
}

/// The withdrawals found in an OP-stack receipt. The receipt is the unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpStackReceipt {
    /// The withdrawals initiated in the receipt, in log order.
    pub withdrawals: Vec<Withdrawal>,
}

impl OpStackReceipt {
    /// Returns the withdrawal acted upon for the receipt.
    pub fn withdrawal(&self) -> Option<&Withdrawal> {
        self.withdrawals.first()
    }
}

/// An OP-stack withdrawal transaction, as emitted by the `L2ToL1MessagePasser`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    /// The withdrawal nonce.
    pub nonce: U256,
    /// The sender of the withdrawal on the child chain.
    pub sender: Address,
    /// The target of the withdrawal on the parent chain.
    pub target: Address,
    /// The value carried by the withdrawal.
    pub value: U256,
    /// The minimum gas limit to execute the withdrawal with.
    pub gas_limit: U256,
    /// The calldata of the withdrawal.
    pub data: Bytes,
    /// The withdrawal hash.
    pub hash: B256,
}
