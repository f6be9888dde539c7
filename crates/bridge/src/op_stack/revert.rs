use alloy_sol_types::{Revert, SolError};
use router_bindings::calls::IOptimismPortal;
use router_primitives::MessageState;

/// The reasons for which the portal rejects a withdrawal check.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum PortalRevert {
    /// The withdrawal was not proven by the submitter.
    #[display("unproven")]
    Unproven,
    /// The withdrawal was proven against a game which is not of the respected type.
    #[display("invalid game type")]
    InvalidGameType,
    /// The withdrawal was proven against a game created before the respected game type update.
    #[display("legacy game")]
    LegacyGame,
    /// The withdrawal was proven against a game which can no longer be used to finalize it, e.g. a
    /// blacklisted or retired game.
    #[display("improper dispute game")]
    ImproperDisputeGame,
    /// The withdrawal was proven before the creation of the game it was proven against.
    #[display("invalid proof timestamp")]
    InvalidProofTimestamp,
    /// The proof has not cleared the proof maturity delay.
    #[display("proof not old enough")]
    ProofNotOldEnough,
    /// The game the withdrawal was proven against is not resolved, not validated or still in its
    /// air gap.
    #[display("game not resolved")]
    GameNotResolved,
    /// The withdrawal was already finalized.
    #[display("already finalized")]
    AlreadyFinalized,
    /// A revert without a known mapping.
    #[display("unrecognized revert: {_0}")]
    Unrecognized(String),
}

impl PortalRevert {
    /// Classifies the revert data returned by the portal. Returns [`None`] if the data is neither a
    /// known portal error nor a revert string.
    pub fn from_revert_data(data: &[u8]) -> Option<Self> {
        let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;
        let is_any = |selectors: &[[u8; 4]]| selectors.contains(&selector);

        let revert = if selector == Revert::SELECTOR {
            // legacy portals revert with `Error(string)`.
            let reason = Revert::abi_decode(data).ok()?.reason;
            Self::from_message(&reason)
        } else if is_any(&[
            IOptimismPortal::Unproven::SELECTOR,
            IOptimismPortal::OptimismPortal_Unproven::SELECTOR,
        ]) {
            Self::Unproven
        } else if is_any(&[IOptimismPortal::InvalidGameType::SELECTOR]) {
            Self::InvalidGameType
        } else if is_any(&[IOptimismPortal::LegacyGame::SELECTOR]) {
            Self::LegacyGame
        } else if is_any(&[
            IOptimismPortal::Blacklisted::SELECTOR,
            IOptimismPortal::OptimismPortal_ImproperDisputeGame::SELECTOR,
        ]) {
            Self::ImproperDisputeGame
        } else if is_any(&[IOptimismPortal::OptimismPortal_InvalidProofTimestamp::SELECTOR]) {
            Self::InvalidProofTimestamp
        } else if is_any(&[
            IOptimismPortal::ProofNotOldEnough::SELECTOR,
            IOptimismPortal::OptimismPortal_ProofNotOldEnough::SELECTOR,
        ]) {
            Self::ProofNotOldEnough
        } else if is_any(&[
            IOptimismPortal::ProposalNotValidated::SELECTOR,
            IOptimismPortal::OptimismPortal_InvalidRootClaim::SELECTOR,
        ]) {
            Self::GameNotResolved
        } else if is_any(&[
            IOptimismPortal::AlreadyFinalized::SELECTOR,
            IOptimismPortal::OptimismPortal_AlreadyFinalized::SELECTOR,
        ]) {
            Self::AlreadyFinalized
        } else {
            return None;
        };
        Some(revert)
    }

    /// Classifies the revert message returned by the portal.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("not been proven") || lower.contains("unproven") {
            Self::Unproven
        } else if lower.contains("not matured") || lower.contains("proofnotoldenough") {
            Self::ProofNotOldEnough
        } else if lower.contains("not been finalized") ||
            lower.contains("not been validated") ||
            lower.contains("not resolved") ||
            lower.contains("air-gap") ||
            lower.contains("air gap")
        {
            Self::GameNotResolved
        } else if lower.contains("already been finalized") || lower.contains("already finalized") {
            Self::AlreadyFinalized
        } else if lower.contains("invalid game type") {
            Self::InvalidGameType
        } else if lower.contains("before respected game type") {
            Self::LegacyGame
        } else if lower.contains("blacklisted") {
            Self::ImproperDisputeGame
        } else if lower.contains("timestamp less than dispute game creation") {
            Self::InvalidProofTimestamp
        } else {
            Self::Unrecognized(message.to_owned())
        }
    }

    /// Returns the [`MessageState`] implied by the revert, or [`None`] if the revert has no
    /// mapping.
    pub const fn state(&self) -> Option<MessageState> {
        match self {
            Self::Unproven |
            Self::InvalidGameType |
            Self::LegacyGame |
            Self::ImproperDisputeGame |
            Self::InvalidProofTimestamp => Some(MessageState::ReadyToProve),
            Self::ProofNotOldEnough | Self::GameNotResolved => Some(MessageState::ChallengePeriod),
            Self::AlreadyFinalized => Some(MessageState::Executed),
            Self::Unrecognized(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_revert_data() {
        let cases = [
            (IOptimismPortal::Unproven {}.abi_encode(), PortalRevert::Unproven),
            (IOptimismPortal::OptimismPortal_Unproven {}.abi_encode(), PortalRevert::Unproven),
            (IOptimismPortal::InvalidGameType {}.abi_encode(), PortalRevert::InvalidGameType),
            (IOptimismPortal::LegacyGame {}.abi_encode(), PortalRevert::LegacyGame),
            (IOptimismPortal::Blacklisted {}.abi_encode(), PortalRevert::ImproperDisputeGame),
            (
                IOptimismPortal::OptimismPortal_ImproperDisputeGame {}.abi_encode(),
                PortalRevert::ImproperDisputeGame,
            ),
            (
                IOptimismPortal::OptimismPortal_InvalidProofTimestamp {}.abi_encode(),
                PortalRevert::InvalidProofTimestamp,
            ),
            (IOptimismPortal::ProofNotOldEnough {}.abi_encode(), PortalRevert::ProofNotOldEnough),
            (
                IOptimismPortal::OptimismPortal_ProofNotOldEnough {}.abi_encode(),
                PortalRevert::ProofNotOldEnough,
            ),
            (IOptimismPortal::ProposalNotValidated {}.abi_encode(), PortalRevert::GameNotResolved),
            (
                IOptimismPortal::OptimismPortal_InvalidRootClaim {}.abi_encode(),
                PortalRevert::GameNotResolved,
            ),
            (IOptimismPortal::AlreadyFinalized {}.abi_encode(), PortalRevert::AlreadyFinalized),
            (
                IOptimismPortal::OptimismPortal_AlreadyFinalized {}.abi_encode(),
                PortalRevert::AlreadyFinalized,
            ),
        ];
        for (data, expected) in cases {
            assert_eq!(PortalRevert::from_revert_data(&data), Some(expected));
        }

        assert_eq!(PortalRevert::from_revert_data(&[0xde, 0xad, 0xbe, 0xef]), None);
        assert_eq!(PortalRevert::from_revert_data(&[0xde]), None);
    }

    #[test]
    fn test_should_classify_revert_strings() {
        let encode = |reason: &str| Revert { reason: reason.to_owned() }.abi_encode();

        assert_eq!(
            PortalRevert::from_revert_data(&encode(
                "OptimismPortal: withdrawal has not been proven yet"
            )),
            Some(PortalRevert::Unproven)
        );
        assert_eq!(
            PortalRevert::from_revert_data(&encode(
                "OptimismPortal: proven withdrawal has not matured yet"
            )),
            Some(PortalRevert::ProofNotOldEnough)
        );
        assert_eq!(
            PortalRevert::from_revert_data(&encode(
                "OptimismPortal: output proposal has not been validated"
            )),
            Some(PortalRevert::GameNotResolved)
        );
        assert_eq!(
            PortalRevert::from_revert_data(&encode("paused")),
            Some(PortalRevert::Unrecognized("paused".to_owned()))
        );
        // a truncated revert string is not decodable.
        assert_eq!(PortalRevert::from_revert_data(&Revert::SELECTOR), None);
    }

    #[test]
    fn test_should_classify_legacy_messages() {
        assert_eq!(
            PortalRevert::from_message(
                "execution reverted: OptimismPortal: withdrawal has not been proven yet"
            ),
            PortalRevert::Unproven
        );
        assert_eq!(
            PortalRevert::from_message(
                "execution reverted: OptimismPortal: proven withdrawal has not matured yet"
            ),
            PortalRevert::ProofNotOldEnough
        );
        assert_eq!(
            PortalRevert::from_message(
                "execution reverted: OptimismPortal: output proposal has not been finalized yet"
            ),
            PortalRevert::GameNotResolved
        );
        assert!(matches!(
            PortalRevert::from_message("execution reverted: paused"),
            PortalRevert::Unrecognized(_)
        ));
    }

    #[test]
    fn test_should_map_reverts_to_states() {
        assert_eq!(PortalRevert::Unproven.state(), Some(MessageState::ReadyToProve));
        assert_eq!(PortalRevert::InvalidProofTimestamp.state(), Some(MessageState::ReadyToProve));
        assert_eq!(PortalRevert::ImproperDisputeGame.state(), Some(MessageState::ReadyToProve));
        assert_eq!(PortalRevert::GameNotResolved.state(), Some(MessageState::ChallengePeriod));
        assert_eq!(PortalRevert::ProofNotOldEnough.state(), Some(MessageState::ChallengePeriod));
        assert_eq!(PortalRevert::AlreadyFinalized.state(), Some(MessageState::Executed));
        assert_eq!(PortalRevert::Unrecognized("paused".into()).state(), None);
    }
}
