//! The bridges carrying the routed funds: extraction of the outbound messages from the routing
//! transactions, and the protocol adapters driving them to execution on the destination chain.

mod adapter;
pub use adapter::{Advance, ProtocolAdapter};

pub mod arbitrum;
pub use arbitrum::{AlloyArbitrumBridge, ArbitrumAdapter, ArbitrumBridge};

mod contract;
pub use contract::{ContractProvider, TRANSACTION_TIMEOUT};

mod error;
pub use error::{BridgeError, ErrorKind};

mod extractor;
pub use extractor::{
    extract_arbitrum_message, extract_op_stack_receipt, MessageExtractor, ReceiptExtractor,
    DEFAULT_RECEIPT_CACHE_CAPACITY,
};

pub mod op_stack;
pub use op_stack::{AlloyOpStackBridge, OpStackAdapter, OpStackBridge};

pub mod poll;
pub use poll::{Poll, Polled};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
