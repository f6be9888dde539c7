use super::{DisputeGame, OpStackBridge, PortalRevert};
use crate::{contract::ContractProvider, BridgeError};

use alloy_json_rpc::RpcError;
use alloy_primitives::{keccak256, Address, TxHash, B256, U256};
use alloy_provider::Provider;
use router_bindings::{
    calls::{IDisputeGameFactory, IOptimismPortal, OutputRootProof},
    withdrawal_storage_slot, L2_TO_L1_MESSAGE_PASSER_ADDRESS,
};
use router_primitives::Withdrawal;

/// The number of confirmations waited for after proving or finalizing a withdrawal.
const WITHDRAWAL_CONFIRMATIONS: u64 = 1;

/// The version of the output root proofs.
const OUTPUT_ROOT_VERSION: B256 = B256::ZERO;

/// An [`OpStackBridge`] talking to the `OptimismPortal2` and its dispute game factory on the parent
/// chain, and to the message passer on the child chain.
#[derive(Debug)]
pub struct AlloyOpStackBridge<P, C> {
    /// The parent chain provider, able to sign transactions.
    parent: P,
    /// The child chain provider.
    child: C,
    /// The address of the portal on the parent chain.
    portal: Address,
    /// The account submitting the proofs.
    submitter: Address,
}

impl<P: Provider, C: Provider> AlloyOpStackBridge<P, C> {
    /// Returns a new [`AlloyOpStackBridge`] for the portal. Proofs are checked for the provided
    /// submitter, which should be the signer of the parent provider.
    pub const fn new(parent: P, child: C, portal: Address, submitter: Address) -> Self {
        Self { parent, child, portal, submitter }
    }

    /// Builds the output root proof of the child chain block the game claims a root for.
    async fn output_root_proof(
        &self,
        withdrawal: &Withdrawal,
        game: &DisputeGame,
    ) -> Result<(OutputRootProof, Vec<alloy_primitives::Bytes>), BridgeError> {
        let slot = withdrawal_storage_slot(withdrawal.hash);
        let proof = self
            .child
            .get_proof(L2_TO_L1_MESSAGE_PASSER_ADDRESS, vec![slot])
            .block_id(game.l2_block.into())
            .await?;
        let block = self
            .child
            .get_block_by_number(game.l2_block.into())
            .await?
            .ok_or_else(|| BridgeError::MissingBlock(game.l2_block.to_string()))?;

        let output = OutputRootProof {
            version: OUTPUT_ROOT_VERSION,
            stateRoot: block.header.state_root,
            messagePasserStorageRoot: proof.storage_hash,
            latestBlockhash: block.header.hash,
        };
        let built = keccak256(
            [
                output.version.as_slice(),
                output.stateRoot.as_slice(),
                output.messagePasserStorageRoot.as_slice(),
                output.latestBlockhash.as_slice(),
            ]
            .concat(),
        );
        if built != game.root_claim {
            return Err(BridgeError::OutputRootMismatch {
                game_index: game.index,
                claimed: game.root_claim,
                built,
            });
        }

        let withdrawal_proof =
            proof.storage_proof.into_iter().next().map(|p| p.proof).unwrap_or_default();
        Ok((output, withdrawal_proof))
    }
}

#[async_trait::async_trait]
impl<P: Provider, C: Provider> OpStackBridge for AlloyOpStackBridge<P, C> {
    async fn is_finalized(&self, withdrawal_hash: B256) -> Result<bool, BridgeError> {
        self.parent
            .call_contract(
                self.portal,
                IOptimismPortal::finalizedWithdrawalsCall { withdrawalHash: withdrawal_hash },
            )
            .await
    }

    async fn check_withdrawal(&self, withdrawal_hash: B256) -> Result<(), BridgeError> {
        self.parent
            .call_contract(
                self.portal,
                IOptimismPortal::checkWithdrawalCall {
                    withdrawalHash: withdrawal_hash,
                    proofSubmitter: self.submitter,
                },
            )
            .await
            .map(|_| ())
            .map_err(classify_portal_error)
    }

    async fn latest_game(&self) -> Result<Option<DisputeGame>, BridgeError> {
        let game_type = self
            .parent
            .call_contract(self.portal, IOptimismPortal::respectedGameTypeCall {})
            .await?;
        let factory = self
            .parent
            .call_contract(self.portal, IOptimismPortal::disputeGameFactoryCall {})
            .await?;

        let count = self.parent.call_contract(factory, IDisputeGameFactory::gameCountCall {}).await?;
        if count.is_zero() {
            return Ok(None);
        }

        let games = self
            .parent
            .call_contract(
                factory,
                IDisputeGameFactory::findLatestGamesCall {
                    gameType: game_type,
                    start: count - U256::from(1),
                    n: U256::from(1),
                },
            )
            .await?;
        let Some(game) = games.into_iter().next() else {
            return Ok(None);
        };

        // the extra data of a fault dispute game starts with the claimed child block number.
        let l2_block = game
            .extraData
            .get(..32)
            .map(U256::from_be_slice)
            .and_then(|block| u64::try_from(block).ok())
            .ok_or_else(|| {
                BridgeError::UnrecognizedState(format!(
                    "dispute game {} has malformed extra data {}",
                    game.index, game.extraData
                ))
            })?;

        Ok(Some(DisputeGame { index: game.index, l2_block, root_claim: game.rootClaim }))
    }

    async fn prove(&self, withdrawal: &Withdrawal, game: &DisputeGame) -> Result<TxHash, BridgeError> {
        let (output, withdrawal_proof) = self.output_root_proof(withdrawal, game).await?;
        let call = IOptimismPortal::proveWithdrawalTransactionCall {
            _tx: withdrawal.into(),
            disputeGameIndex: game.index,
            outputRootProof: output,
            withdrawalProof: withdrawal_proof,
        };

        let receipt = self
            .parent
            .submit_call(self.portal, call, U256::ZERO, WITHDRAWAL_CONFIRMATIONS)
            .await?;
        Ok(receipt.transaction_hash)
    }

    async fn finalize(&self, withdrawal: &Withdrawal) -> Result<TxHash, BridgeError> {
        let call = IOptimismPortal::finalizeWithdrawalTransactionCall { _tx: withdrawal.into() };
        let receipt = self
            .parent
            .submit_call(self.portal, call, U256::ZERO, WITHDRAWAL_CONFIRMATIONS)
            .await?;
        Ok(receipt.transaction_hash)
    }
}

/// Converts a reverted portal call into a [`BridgeError::PortalReverted`]. Other errors are
/// returned untouched.
fn classify_portal_error(err: BridgeError) -> BridgeError {
    let revert = match &err {
        BridgeError::ProviderRpc(RpcError::ErrorResp(payload)) => {
            match payload.as_revert_data() {
                Some(data) => Some(
                    PortalRevert::from_revert_data(&data)
                        .unwrap_or_else(|| PortalRevert::Unrecognized(data.to_string())),
                ),
                None if payload.message.contains("revert") => {
                    Some(PortalRevert::from_message(&payload.message))
                }
                None => None,
            }
        }
        _ => None,
    };

    revert.map_or(err, BridgeError::PortalReverted)
}
