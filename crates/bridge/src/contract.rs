use crate::BridgeError;

use std::time::Duration;

use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{TransactionInput, TransactionReceipt, TransactionRequest};
use alloy_sol_types::SolCall;

/// The maximum time waited for a submitted transaction to be confirmed.
pub const TRANSACTION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Provides typed calls and transaction submissions to contracts.
#[async_trait::async_trait]
pub trait ContractProvider {
    /// Performs the `eth_call` and decodes the returned data.
    async fn call_contract<C>(&self, to: Address, call: C) -> Result<C::Return, BridgeError>
    where
        C: SolCall + Send + Sync + 'static;

    /// Submits the call in a transaction, waits for the provided number of confirmations and
    /// returns the receipt. Errors if the transaction reverted.
    async fn submit_call<C>(
        &self,
        to: Address,
        call: C,
        value: U256,
        confirmations: u64,
    ) -> Result<TransactionReceipt, BridgeError>
    where
        C: SolCall + Send + Sync + 'static;
}

#[async_trait::async_trait]
impl<P: Provider> ContractProvider for P {
    async fn call_contract<C>(&self, to: Address, call: C) -> Result<C::Return, BridgeError>
    where
        C: SolCall + Send + Sync + 'static,
    {
        let request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(call.abi_encode().into()));
        let output = self.call(request).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    async fn submit_call<C>(
        &self,
        to: Address,
        call: C,
        value: U256,
        confirmations: u64,
    ) -> Result<TransactionReceipt, BridgeError>
    where
        C: SolCall + Send + Sync + 'static,
    {
        let request = TransactionRequest::default()
            .to(to)
            .value(value)
            .input(TransactionInput::new(call.abi_encode().into()));

        let pending = self.send_transaction(request).await?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(target: "router::bridge", ?tx_hash, ?to, function = C::SIGNATURE, "submitted transaction");

        let receipt = pending
            .with_required_confirmations(confirmations)
            .with_timeout(Some(TRANSACTION_TIMEOUT))
            .get_receipt()
            .await?;
        if !receipt.status() {
            return Err(BridgeError::TransactionReverted(tx_hash));
        }

        tracing::debug!(target: "router::bridge", ?tx_hash, block_number = ?receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }
}
