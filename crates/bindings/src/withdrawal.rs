use crate::calls::WithdrawalTransaction;

use alloy_primitives::{keccak256, B256, U256};
use alloy_sol_types::SolValue;
use router_primitives::Withdrawal;

impl From<&Withdrawal> for WithdrawalTransaction {
    fn from(value: &Withdrawal) -> Self {
        Self {
            nonce: value.nonce,
            sender: value.sender,
            target: value.target,
            value: value.value,
            gasLimit: value.gas_limit,
            data: value.data.clone(),
        }
    }
}

/// Computes the hash of a withdrawal as done by the `L2ToL1MessagePasser`.
pub fn withdrawal_hash(withdrawal: &Withdrawal) -> B256 {
    keccak256(
        (
            withdrawal.nonce,
            withdrawal.sender,
            withdrawal.target,
            withdrawal.value,
            withdrawal.gas_limit,
            withdrawal.data.clone(),
        )
            .abi_encode_params(),
    )
}

/// Returns the storage slot of the `sentMessages` mapping entry for the provided withdrawal hash.
pub fn withdrawal_storage_slot(withdrawal_hash: B256) -> B256 {
    keccak256((withdrawal_hash, U256::ZERO).abi_encode())
}
