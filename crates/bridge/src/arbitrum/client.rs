use super::ArbitrumBridge;
use crate::{contract::ContractProvider, BridgeError};

use alloy_primitives::{Address, TxHash, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::Filter;
use alloy_sol_types::SolEvent;
use router_bindings::{
    calls::{INodeInterface, IOutbox},
    logs::{try_decode_log, SendRootUpdated},
    NODE_INTERFACE_ADDRESS,
};
use router_primitives::{ArbitrumMessage, BlockRange};

/// The number of parent chain blocks queried at once when looking for the latest send root.
const SEND_ROOT_SEARCH_WINDOW: u64 = 5_000;

/// The default number of parent chain blocks searched backwards for the latest send root.
pub const DEFAULT_SEND_ROOT_SEARCH_DEPTH: u64 = 100_000;

/// The number of confirmations waited for after executing a message.
const EXECUTION_CONFIRMATIONS: u64 = 2;

/// An [`ArbitrumBridge`] talking to the outbox on the parent chain and to the node interface on
/// the child chain.
#[derive(Debug)]
pub struct AlloyArbitrumBridge<P, C> {
    /// The parent chain provider, able to sign transactions.
    parent: P,
    /// The child chain provider.
    child: C,
    /// The address of the outbox on the parent chain.
    outbox: Address,
    /// The number of parent chain blocks searched backwards for the latest send root.
    search_depth: u64,
}

impl<P: Provider, C: Provider> AlloyArbitrumBridge<P, C> {
    /// Returns a new [`AlloyArbitrumBridge`] for the outbox.
    pub const fn new(parent: P, child: C, outbox: Address) -> Self {
        Self { parent, child, outbox, search_depth: DEFAULT_SEND_ROOT_SEARCH_DEPTH }
    }

    /// Sets the number of parent chain blocks searched backwards for the latest send root.
    pub const fn with_send_root_search_depth(mut self, search_depth: u64) -> Self {
        self.search_depth = search_depth;
        self
    }

    /// Returns the child chain block hash of the most recent send root, searching backwards from
    /// the head of the parent chain.
    async fn latest_send_root_block(&self) -> Result<Option<B256>, BridgeError> {
        let head = self.parent.get_block_number().await?;
        let windows = send_root_search_windows(head, self.search_depth);

        for window in &windows {
            let filter = Filter::new()
                .address(self.outbox)
                .event_signature(SendRootUpdated::SIGNATURE_HASH)
                .from_block(window.from)
                .to_block(window.to);
            tracing::trace!(target: "router::bridge", %window, "searching send root updates");

            let logs = self.parent.get_logs(&filter).await?;
            if let Some(update) =
                logs.iter().rev().find_map(|log| try_decode_log::<SendRootUpdated>(&log.inner))
            {
                return Ok(Some(update.data.l2BlockHash));
            }
        }

        if let Some(oldest) = windows.last().filter(|window| window.from > 0) {
            tracing::warn!(
                target: "router::bridge",
                outbox = %self.outbox,
                head,
                searched_from = oldest.from,
                search_depth = self.search_depth,
                "no send root found within the search depth, messages stay unconfirmed"
            );
        }

        Ok(None)
    }
}

/// Returns the windows of the `depth` parent chain blocks preceding `head` (included), newest
/// first.
fn send_root_search_windows(head: u64, depth: u64) -> Vec<BlockRange> {
    let from = head.saturating_sub(depth.max(1) - 1);
    let Some(range) = BlockRange::new(from, head) else { return Vec::new() };

    let mut windows = range.windows(SEND_ROOT_SEARCH_WINDOW);
    windows.reverse();
    windows
}

#[async_trait::async_trait]
impl<P: Provider, C: Provider> ArbitrumBridge for AlloyArbitrumBridge<P, C> {
    async fn is_spent(&self, position: u64) -> Result<bool, BridgeError> {
        self.parent.call_contract(self.outbox, IOutbox::isSpentCall { index: U256::from(position) }).await
    }

    async fn confirmed_send_count(&self) -> Result<Option<u64>, BridgeError> {
        let Some(block_hash) = self.latest_send_root_block().await? else {
            return Ok(None);
        };

        let block = self
            .child
            .get_block_by_hash(block_hash)
            .await?
            .ok_or_else(|| BridgeError::MissingBlock(block_hash.to_string()))?;

        // the send count is stored in the first 8 bytes of the mix hash.
        let mut send_count = [0u8; 8];
        send_count.copy_from_slice(&block.header.mix_hash[..8]);
        Ok(Some(u64::from_be_bytes(send_count)))
    }

    async fn execute(
        &self,
        message: &ArbitrumMessage,
        send_count: u64,
    ) -> Result<TxHash, BridgeError> {
        let leaf = u64::try_from(message.position)
            .map_err(|_| BridgeError::InvalidPosition(message.position))?;
        let proof = self
            .child
            .call_contract(
                NODE_INTERFACE_ADDRESS,
                INodeInterface::constructOutboxProofCall { size: send_count, leaf },
            )
            .await?;

        let call = IOutbox::executeTransactionCall {
            proof: proof.proof,
            index: message.position,
            l2Sender: message.caller,
            to: message.destination,
            l2Block: message.arb_block_num,
            l1Block: message.eth_block_num,
            l2Timestamp: message.timestamp,
            value: message.callvalue,
            data: message.data.clone(),
        };
        let receipt = self
            .parent
            .submit_call(self.outbox, call, U256::ZERO, EXECUTION_CONFIRMATIONS)
            .await?;

        Ok(receipt.transaction_hash)
    }
}
