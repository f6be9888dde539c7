use alloy_primitives::{address, Address};

/// The address of the `ArbSys` precompile on Arbitrum chains.
pub const ARB_SYS_ADDRESS: Address = address!("0x0000000000000000000000000000000000000064");

/// The address of the `NodeInterface` virtual contract on Arbitrum chains.
pub const NODE_INTERFACE_ADDRESS: Address = address!("0x00000000000000000000000000000000000000C8");

/// The address of the `ArbRetryableTx` precompile on Arbitrum chains.
pub const ARB_RETRYABLE_TX_ADDRESS: Address =
    address!("0x000000000000000000000000000000000000006E");

/// The address of the `L2ToL1MessagePasser` predeploy on OP-stack chains.
pub const L2_TO_L1_MESSAGE_PASSER_ADDRESS: Address =
    address!("0x4200000000000000000000000000000000000016");

/// The sentinel address used by the routers to designate the native asset.
pub const NATIVE_TOKEN_ADDRESS: Address = address!("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// The inbox message kind of a retryable ticket submission.
pub const L1_MESSAGE_TYPE_SUBMIT_RETRYABLE_TX: u8 = 9;

/// The transaction type prefix of a submit retryable transaction on Arbitrum chains.
pub const ARBITRUM_SUBMIT_RETRYABLE_TX_TYPE: u8 = 0x69;
