/// The family of the destination chain's bridge protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProtocolFamily {
    /// Arbitrum Nitro style outbox messages.
    #[display("arbitrum")]
    Arbitrum,
    /// OP-stack style withdrawals, proven and finalized on the portal.
    #[display("op-stack")]
    OpStack,
}
