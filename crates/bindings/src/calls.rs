use alloy_sol_types::sol;

sol! {
    // *********************OP-STACK TYPES*********************
    #[derive(Debug, PartialEq, Eq)]
    struct WithdrawalTransaction {
        uint256 nonce;
        address sender;
        address target;
        uint256 value;
        uint256 gasLimit;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct OutputRootProof {
        bytes32 version;
        bytes32 stateRoot;
        bytes32 messagePasserStorageRoot;
        bytes32 latestBlockhash;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct GameSearchResult {
        uint256 index;
        bytes32 metadata;
        uint64 timestamp;
        bytes32 rootClaim;
        bytes extraData;
    }

    // *********************ARBITRUM*********************
    interface IOutbox {
        error AlreadySpent(uint256 index);

        function isSpent(uint256 index) external view returns (bool);

        function executeTransaction(
            bytes32[] calldata proof,
            uint256 index,
            address l2Sender,
            address to,
            uint256 l2Block,
            uint256 l1Block,
            uint256 l2Timestamp,
            uint256 value,
            bytes calldata data
        ) external;
    }

    interface INodeInterface {
        function constructOutboxProof(uint64 size, uint64 leaf)
            external
            view
            returns (bytes32 send, bytes32 root, bytes32[] memory proof);
    }

    interface IInbox {
        function calculateRetryableSubmissionFee(uint256 dataLength, uint256 baseFee)
            external
            view
            returns (uint256);
    }

    interface IArbRetryableTx {
        error NoTicketWithID();

        function getTimeout(bytes32 ticketId) external view returns (uint256);

        function redeem(bytes32 ticketId) external returns (bytes32);
    }

    // *********************ROUTERS*********************
    interface IParentToChildRewardRouter {
        function canDistribute(address token) external view returns (bool);

        function inbox() external view returns (address);

        function minGasPrice() external view returns (uint256);

        function minGasLimit() external view returns (uint256);

        function routeNativeFunds(uint256 maxSubmissionCost, uint256 gasLimit, uint256 maxFeePerGas)
            external
            payable;

        function routeToken(
            address token,
            uint256 maxSubmissionCost,
            uint256 gasLimit,
            uint256 maxFeePerGas
        ) external payable;
    }

    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    // *********************OP-STACK*********************
    interface IOptimismPortal {
        error Unproven();
        error ProofNotOldEnough();
        error AlreadyFinalized();
        error InvalidGameType();
        error LegacyGame();
        error Blacklisted();
        error ProposalNotValidated();
        error OptimismPortal_Unproven();
        error OptimismPortal_ProofNotOldEnough();
        error OptimismPortal_AlreadyFinalized();
        error OptimismPortal_InvalidRootClaim();
        error OptimismPortal_ImproperDisputeGame();
        error OptimismPortal_InvalidProofTimestamp();

        function disputeGameFactory() external view returns (address);

        function respectedGameType() external view returns (uint32);

        function finalizedWithdrawals(bytes32 withdrawalHash) external view returns (bool);

        function checkWithdrawal(bytes32 withdrawalHash, address proofSubmitter) external view;

        function proveWithdrawalTransaction(
            WithdrawalTransaction memory _tx,
            uint256 disputeGameIndex,
            OutputRootProof calldata outputRootProof,
            bytes[] calldata withdrawalProof
        ) external;

        function finalizeWithdrawalTransaction(WithdrawalTransaction memory _tx) external;
    }

    interface IDisputeGameFactory {
        function gameCount() external view returns (uint256);

        function findLatestGames(uint32 gameType, uint256 start, uint256 n)
            external
            view
            returns (GameSearchResult[] memory games);
    }
}
