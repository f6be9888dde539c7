/// The lifecycle state of an [`crate::OutboundMessage`], unified across protocol families.
///
/// Transitions are driven by the chains: `Unconfirmed -> ReadyToProve -> ChallengePeriod ->
/// Confirmed -> Executed`. Arbitrum messages skip the proving states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MessageState {
    /// The origin chain effect is not final enough to act on.
    #[display("unconfirmed")]
    Unconfirmed,
    /// A proof must be submitted before the message can be finalized.
    #[display("ready-to-prove")]
    ReadyToProve,
    /// The message is proven or confirmed but delayed by a dispute window.
    #[display("challenge-period")]
    ChallengePeriod,
    /// The message can be executed or finalized now.
    #[display("confirmed")]
    Confirmed,
    /// The message was executed or finalized.
    #[display("executed")]
    Executed,
}

impl MessageState {
    /// Returns true if no further action will ever be required.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed)
    }

    /// Returns true if an on-chain action can be submitted in this state.
    pub const fn is_actionable(&self) -> bool {
        matches!(self, Self::ReadyToProve | Self::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::MessageState;

    #[test]
    fn test_state_classification() {
        assert!(MessageState::Confirmed.is_actionable());
        assert!(MessageState::ReadyToProve.is_actionable());
        assert!(!MessageState::ChallengePeriod.is_actionable());
        assert!(!MessageState::Unconfirmed.is_actionable());
        assert!(MessageState::Executed.is_terminal());
        assert!(!MessageState::Executed.is_actionable());
    }
}
