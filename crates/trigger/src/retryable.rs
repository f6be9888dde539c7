//! Retryable tickets created on the child chain by the parent to child routing transactions.

use crate::{error::TriggerResult, TriggerError};

use alloy_json_rpc::RpcError;
use alloy_network::ReceiptResponse;
use alloy_primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use alloy_provider::Provider;
use alloy_rlp::{Encodable, Header};
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::{SolError, SolEvent};
use router_bindings::{
    calls::IArbRetryableTx,
    logs::{try_decode_log, InboxMessageDelivered, MessageDelivered, RedeemScheduled},
    ARBITRUM_SUBMIT_RETRYABLE_TX_TYPE, ARB_RETRYABLE_TX_ADDRESS,
    L1_MESSAGE_TYPE_SUBMIT_RETRYABLE_TX,
};
use router_bridge::{
    poll::{Poll, Polled},
    BridgeError, ContractProvider,
};
use tokio_util::sync::CancellationToken;

/// The size of the fixed part of the retryable ticket inbox data.
const RETRYABLE_HEADER_LEN: usize = 9 * 32;

/// A retryable ticket submitted to the inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableMessage {
    /// The index of the message in the inbox.
    pub message_number: U256,
    /// The aliased sender of the ticket.
    pub sender: Address,
    /// The parent chain base fee at submission.
    pub parent_base_fee: U256,
    /// The destination of the ticket on the child chain.
    pub destination: Address,
    /// The value passed to the destination.
    pub child_call_value: U256,
    /// The value deposited along the ticket.
    pub deposit_value: U256,
    /// The maximum submission fee.
    pub max_submission_fee: U256,
    /// The refund address of the excess fees.
    pub excess_fee_refund_address: Address,
    /// The refund address of the call value.
    pub call_value_refund_address: Address,
    /// The gas limit of the auto-redeem.
    pub gas_limit: U256,
    /// The gas price of the auto-redeem.
    pub max_fee_per_gas: U256,
    /// The calldata passed to the destination.
    pub data: Bytes,
}

impl RetryableMessage {
    /// Parses the inbox data of a retryable ticket submission. Returns [`None`] if the data is
    /// truncated.
    pub fn from_inbox_data(
        message_number: U256,
        sender: Address,
        parent_base_fee: U256,
        data: &[u8],
    ) -> Option<Self> {
        let word = |index: usize| data.get(index * 32..(index + 1) * 32);
        let uint = |index: usize| word(index).map(U256::from_be_slice);
        let address = |index: usize| word(index).map(|w| Address::from_word(B256::from_slice(w)));

        let data_len = usize::try_from(uint(8)?).ok()?;
        let calldata = data.get(RETRYABLE_HEADER_LEN..RETRYABLE_HEADER_LEN.checked_add(data_len)?)?;

        Some(Self {
            message_number,
            sender,
            parent_base_fee,
            destination: address(0)?,
            child_call_value: uint(1)?,
            deposit_value: uint(2)?,
            max_submission_fee: uint(3)?,
            excess_fee_refund_address: address(4)?,
            call_value_refund_address: address(5)?,
            gas_limit: uint(6)?,
            max_fee_per_gas: uint(7)?,
            data: Bytes::copy_from_slice(calldata),
        })
    }

    /// Returns the id of the ticket on the child chain: the hash of the submit retryable
    /// transaction the child chain derives from the message.
    pub fn ticket_id(&self, child_chain_id: u64) -> B256 {
        let mut payload = Vec::new();
        child_chain_id.encode(&mut payload);
        B256::from(self.message_number).encode(&mut payload);
        self.sender.encode(&mut payload);
        self.parent_base_fee.encode(&mut payload);
        self.deposit_value.encode(&mut payload);
        self.max_fee_per_gas.encode(&mut payload);
        self.gas_limit.encode(&mut payload);
        // a zero destination is encoded as nil.
        if self.destination.is_zero() {
            Bytes::new().encode(&mut payload);
        } else {
            self.destination.encode(&mut payload);
        }
        self.child_call_value.encode(&mut payload);
        self.call_value_refund_address.encode(&mut payload);
        self.max_submission_fee.encode(&mut payload);
        self.excess_fee_refund_address.encode(&mut payload);
        self.data.encode(&mut payload);

        let mut encoded = vec![ARBITRUM_SUBMIT_RETRYABLE_TX_TYPE];
        Header { list: true, payload_length: payload.len() }.encode(&mut encoded);
        encoded.extend_from_slice(&payload);

        keccak256(encoded)
    }
}

/// Extracts the single retryable ticket submitted in the logs of the transaction.
pub fn extract_retryable(tx_hash: TxHash, logs: &[Log]) -> TriggerResult<RetryableMessage> {
    let delivered: Vec<MessageDelivered> = logs
        .iter()
        .filter_map(|log| try_decode_log::<MessageDelivered>(&log.inner))
        .map(|log| log.data)
        .filter(|event| event.kind == L1_MESSAGE_TYPE_SUBMIT_RETRYABLE_TX)
        .collect();

    if delivered.len() != 1 {
        return Err(TriggerError::RetryableCardinality { tx_hash, found: delivered.len() });
    }
    let delivered = &delivered[0];

    let inbox_data = logs
        .iter()
        .filter_map(|log| try_decode_log::<InboxMessageDelivered>(&log.inner))
        .find(|log| log.messageNum == delivered.messageIndex)
        .map(|log| log.data.data)
        .ok_or(TriggerError::MalformedRetryable(delivered.messageIndex))?;

    RetryableMessage::from_inbox_data(
        delivered.messageIndex,
        delivered.sender,
        delivered.baseFeeL1,
        &inbox_data,
    )
    .ok_or(TriggerError::MalformedRetryable(delivered.messageIndex))
}

/// The status of a retryable ticket on the child chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RetryableStatus {
    /// The ticket, or its auto-redeem, is not on the child chain yet.
    #[display("not yet created")]
    NotYetCreated,
    /// The ticket creation failed.
    #[display("creation failed")]
    CreationFailed,
    /// The ticket was created but not redeemed.
    #[display("funds deposited")]
    FundsDeposited,
    /// The ticket was redeemed.
    #[display("redeemed")]
    Redeemed,
    /// The ticket expired before being redeemed.
    #[display("expired")]
    Expired,
}

/// Tracks retryable tickets on the child chain.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait RetryableTracker: Send + Sync {
    /// Returns the status of the ticket.
    async fn status(&self, ticket_id: B256) -> TriggerResult<RetryableStatus>;

    /// Redeems the ticket. Returns the hash of the redeem transaction.
    async fn redeem(&self, ticket_id: B256) -> TriggerResult<TxHash>;
}

/// A [`RetryableTracker`] reading the child chain through a provider.
#[derive(Debug)]
pub struct AlloyRetryableTracker<P> {
    /// The child chain provider. Must hold a wallet to redeem tickets.
    provider: P,
}

impl<P: Provider> AlloyRetryableTracker<P> {
    /// Returns a new [`AlloyRetryableTracker`].
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the status of a ticket the retryable precompile no longer knows about. The ticket
    /// is gone once redeemed as well as once expired, so the redeem attempts scheduled since its
    /// creation are checked first.
    async fn removed_ticket_status(
        &self,
        ticket_id: B256,
        from_block: u64,
    ) -> TriggerResult<RetryableStatus> {
        let filter = Filter::new()
            .address(ARB_RETRYABLE_TX_ADDRESS)
            .event_signature(RedeemScheduled::SIGNATURE_HASH)
            .topic1(ticket_id)
            .from_block(from_block);
        let logs = self.provider.get_logs(&filter).await?;

        for redeem in logs.iter().filter_map(|log| try_decode_log::<RedeemScheduled>(&log.inner)) {
            if redeem.ticketId != ticket_id {
                continue
            }
            let retry = self.provider.get_transaction_receipt(redeem.retryTxHash).await?;
            if retry.is_some_and(|retry| retry.status()) {
                tracing::debug!(
                    target: "router::trigger",
                    ?ticket_id,
                    retry_tx = ?redeem.retryTxHash,
                    "ticket redeemed by another transaction"
                );
                return Ok(RetryableStatus::Redeemed)
            }
        }

        Ok(RetryableStatus::Expired)
    }
}

#[async_trait::async_trait]
impl<P: Provider> RetryableTracker for AlloyRetryableTracker<P> {
    async fn status(&self, ticket_id: B256) -> TriggerResult<RetryableStatus> {
        let Some(creation) = self.provider.get_transaction_receipt(ticket_id).await? else {
            return Ok(RetryableStatus::NotYetCreated);
        };
        if !creation.status() {
            return Ok(RetryableStatus::CreationFailed);
        }

        let auto_redeem = creation
            .inner
            .logs()
            .iter()
            .filter(|log| log.address() == ARB_RETRYABLE_TX_ADDRESS)
            .filter_map(|log| try_decode_log::<RedeemScheduled>(&log.inner))
            .find(|log| log.ticketId == ticket_id);
        if let Some(auto_redeem) = auto_redeem {
            match self.provider.get_transaction_receipt(auto_redeem.retryTxHash).await? {
                Some(retry) if retry.status() => return Ok(RetryableStatus::Redeemed),
                Some(_) => {}
                None => return Ok(RetryableStatus::NotYetCreated),
            }
        }

        let call = IArbRetryableTx::getTimeoutCall { ticketId: ticket_id };
        match self.provider.call_contract(ARB_RETRYABLE_TX_ADDRESS, call).await {
            Ok(_) => Ok(RetryableStatus::FundsDeposited),
            Err(err) if is_missing_ticket(&err) => {
                self.removed_ticket_status(ticket_id, creation.block_number.unwrap_or_default())
                    .await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn redeem(&self, ticket_id: B256) -> TriggerResult<TxHash> {
        let call = IArbRetryableTx::redeemCall { ticketId: ticket_id };
        let receipt =
            self.provider.submit_call(ARB_RETRYABLE_TX_ADDRESS, call, U256::ZERO, 1).await?;
        Ok(receipt.transaction_hash)
    }
}

/// Returns true if the error is the `NoTicketWithID` revert of `ArbRetryableTx`.
fn is_missing_ticket(err: &BridgeError) -> bool {
    let BridgeError::ProviderRpc(RpcError::ErrorResp(payload)) = err else { return false };
    payload
        .as_revert_data()
        .is_some_and(|data| data.starts_with(&IArbRetryableTx::NoTicketWithID::SELECTOR))
}

/// How a retryable ticket was redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The auto-redeem succeeded.
    AutoRedeemed,
    /// The auto-redeem failed and the ticket was redeemed by the provided transaction.
    ManuallyRedeemed(TxHash),
}

/// Waits for the ticket to be created on the child chain, then redeems it once if its auto-redeem
/// failed.
pub async fn settle_retryable<T: RetryableTracker>(
    tracker: &T,
    ticket_id: B256,
    poll: &Poll,
    cancel: &CancellationToken,
) -> TriggerResult<Settlement> {
    let polled = poll
        .poll(
            "settle_retryable",
            cancel,
            || tracker.status(ticket_id),
            |status| *status != RetryableStatus::NotYetCreated,
        )
        .await?;

    let status = match polled {
        Polled::Ready(status) => status,
        Polled::TimedOut(_) => return Err(TriggerError::RetryableTimeout(ticket_id)),
        Polled::Cancelled(_) => return Err(TriggerError::Cancelled),
    };

    match status {
        RetryableStatus::Redeemed => {
            tracing::info!(target: "router::trigger", ?ticket_id, "retryable ticket redeemed");
            Ok(Settlement::AutoRedeemed)
        }
        RetryableStatus::FundsDeposited => {
            tracing::warn!(target: "router::trigger", ?ticket_id, "retryable auto-redeem failed, redeeming");
            let tx_hash = tracker.redeem(ticket_id).await?;
            tracing::info!(target: "router::trigger", ?ticket_id, ?tx_hash, "retryable ticket redeemed");
            Ok(Settlement::ManuallyRedeemed(tx_hash))
        }
        status => Err(TriggerError::UnexpectedRetryableStatus { ticket_id, status }),
    }
}
