use alloy_primitives::{address, Address, Bytes, LogData, B256, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use router_bindings::{
    logs::{L2ToL1Tx, MessagePassed},
    withdrawal_hash, ARB_SYS_ADDRESS, L2_TO_L1_MESSAGE_PASSER_ADDRESS,
};
use router_primitives::{OpStackReceipt, OutboundMessage, Withdrawal};

/// Test utils for the Arbitrum bridge.
pub mod arbitrum;

/// Test utils for the OP-stack bridge.
pub mod op_stack;

/// Test utils for provider.
pub mod provider;

/// The address of the router sending the messages in tests.
pub const ROUTER: Address = address!("0x00000000000000000000000000000000000000aa");

/// The address of the destination of the messages in tests.
pub const DESTINATION: Address = address!("0x00000000000000000000000000000000000000bb");

/// Returns an `L2ToL1Tx` event at the provided outbox position.
pub fn l2_to_l1_tx(position: u64) -> L2ToL1Tx {
    L2ToL1Tx {
        caller: ROUTER,
        destination: DESTINATION,
        hash: U256::from(position) + U256::from(1_000_000),
        position: U256::from(position),
        arbBlockNum: U256::from(position * 10),
        ethBlockNum: U256::from(position * 5),
        timestamp: U256::from(1_700_000_000u64),
        callvalue: U256::from(1_000),
        data: Bytes::new(),
    }
}

/// Returns the log of the event, emitted by `ArbSys`.
pub fn arbitrum_log(event: &L2ToL1Tx) -> Log {
    mined_log(ARB_SYS_ADDRESS, event.encode_log_data())
}

/// Returns a `MessagePassed` event with the provided nonce and a valid withdrawal hash.
pub fn message_passed(nonce: U256) -> MessagePassed {
    let mut withdrawal = Withdrawal {
        nonce,
        sender: ROUTER,
        target: DESTINATION,
        value: U256::from(1_000),
        gas_limit: U256::ZERO,
        data: Bytes::new(),
        hash: B256::ZERO,
    };
    withdrawal.hash = withdrawal_hash(&withdrawal);

    MessagePassed {
        nonce: withdrawal.nonce,
        sender: withdrawal.sender,
        target: withdrawal.target,
        value: withdrawal.value,
        gasLimit: withdrawal.gas_limit,
        data: withdrawal.data,
        withdrawalHash: withdrawal.hash,
    }
}

/// Returns the log of the event, emitted by the `L2ToL1MessagePasser`.
pub fn message_passed_log(event: &MessagePassed) -> Log {
    mined_log(L2_TO_L1_MESSAGE_PASSER_ADDRESS, event.encode_log_data())
}

/// Returns an Arbitrum [`OutboundMessage`] at the provided outbox position.
pub fn arbitrum_message(position: u64) -> OutboundMessage {
    let event = l2_to_l1_tx(position);
    OutboundMessage {
        id: event.hash.into(),
        origin_tx: B256::with_last_byte(position as u8),
        origin_block: position,
        payload: router_primitives::ArbitrumMessage::from(event).into(),
    }
}

/// Returns an OP-stack [`OutboundMessage`] initiated at the provided block.
pub fn op_stack_message(origin_block: u64) -> OutboundMessage {
    let withdrawal: Withdrawal = message_passed(U256::from(origin_block)).into();
    OutboundMessage {
        id: withdrawal.hash,
        origin_tx: B256::with_last_byte(origin_block as u8),
        origin_block,
        payload: OpStackReceipt { withdrawals: vec![withdrawal] }.into(),
    }
}

fn mined_log(address: Address, data: LogData) -> Log {
    Log {
        inner: alloy_primitives::Log { address, data },
        block_hash: Some(B256::ZERO),
        block_number: Some(0),
        block_timestamp: None,
        transaction_hash: Some(B256::ZERO),
        transaction_index: Some(0),
        log_index: Some(0),
        removed: false,
    }
}
