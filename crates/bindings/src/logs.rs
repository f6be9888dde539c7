use alloy_primitives::Log;
use alloy_sol_types::{sol, SolEvent};
use router_primitives::{ArbitrumMessage, Withdrawal};

sol! {
    // *********************ROUTER*********************
    #[derive(Debug)]
    event FundsRouted(address indexed token, uint256 amount);

    // *********************ARBITRUM*********************
    #[derive(Debug)]
    event L2ToL1Tx(
        address caller,
        address indexed destination,
        uint256 indexed hash,
        uint256 indexed position,
        uint256 arbBlockNum,
        uint256 ethBlockNum,
        uint256 timestamp,
        uint256 callvalue,
        bytes data
    );

    #[derive(Debug)]
    event SendRootUpdated(bytes32 indexed outputRoot, bytes32 indexed l2BlockHash);

    #[derive(Debug)]
    event MessageDelivered(
        uint256 indexed messageIndex,
        bytes32 indexed beforeInboxAcc,
        address inbox,
        uint8 kind,
        address sender,
        bytes32 messageDataHash,
        uint256 baseFeeL1,
        uint64 timestamp
    );

    #[derive(Debug)]
    event InboxMessageDelivered(uint256 indexed messageNum, bytes data);

    #[derive(Debug)]
    event RedeemScheduled(
        bytes32 indexed ticketId,
        bytes32 indexed retryTxHash,
        uint64 indexed sequenceNum,
        uint64 donatedGas,
        address gasDonor,
        uint256 maxRefund,
        uint256 submissionFeeRefund
    );

    // *********************OP-STACK*********************
    #[derive(Debug)]
    event MessagePassed(
        uint256 indexed nonce,
        address indexed sender,
        address indexed target,
        uint256 value,
        uint256 gasLimit,
        bytes data,
        bytes32 withdrawalHash
    );
}

/// Tries to decode the provided log into the type T.
pub fn try_decode_log<T: SolEvent>(log: &Log) -> Option<Log<T>> {
    T::decode_log(log).ok()
}

impl From<L2ToL1Tx> for ArbitrumMessage {
    fn from(value: L2ToL1Tx) -> Self {
        Self {
            caller: value.caller,
            destination: value.destination,
            hash: value.hash,
            position: value.position,
            arb_block_num: value.arbBlockNum,
            eth_block_num: value.ethBlockNum,
            timestamp: value.timestamp,
            callvalue: value.callvalue,
            data: value.data,
        }
    }
}

impl From<MessagePassed> for Withdrawal {
    fn from(value: MessagePassed) -> Self {
        Self {
            nonce: value.nonce,
            sender: value.sender,
            target: value.target,
            value: value.value,
            gas_limit: value.gasLimit,
            data: value.data,
            hash: value.withdrawalHash,
        }
    }
}
