use alloy_primitives::{address, Address};

/// The max retries for the providers.
pub(crate) const PROVIDER_MAX_RETRIES: u32 = 10;

/// The initial backoff for the providers, in milliseconds.
pub(crate) const PROVIDER_INITIAL_BACKOFF: u64 = 100;

/// The default provider compute units per second.
pub(crate) const PROVIDER_COMPUTE_UNITS_PER_SECOND: u64 = 10000;

/// The default number of blocks kept between the head of the child chain and the scanned range.
pub(crate) const DEFAULT_BLOCK_LAG: u64 = 5;

/// The default interval between two passes of the continuous redeemer, in seconds.
pub(crate) const DEFAULT_LOOP_INTERVAL_SECS: u64 = 60 * 60;

/// The default interval between two polls, in seconds.
pub(crate) const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// The default maximum duration of a poll, in seconds.
pub(crate) const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30 * 60;

/// The log cache location keeping the cache in memory.
pub(crate) const IN_MEMORY_LOG_CACHE: &str = ":memory:";

/// The outbox of Arbitrum One.
pub(crate) const ARBITRUM_ONE_OUTBOX: Address =
    address!("0x0B9857ae2D4A3DBe74ffE1d7DF045bb7F96E4840");

/// The outbox of Arbitrum Nova.
pub(crate) const ARBITRUM_NOVA_OUTBOX: Address =
    address!("0xD4B80C3D7240325D18E645B49e6535A3Bf95cc58");

/// The `OptimismPortal` of OP Mainnet.
pub(crate) const OP_MAINNET_PORTAL: Address =
    address!("0xbEb5Fc579115071764c7423A4f12eDde41f106Ed");

/// The `OptimismPortal` of Base.
pub(crate) const BASE_PORTAL: Address = address!("0x49048044D57e1C92A77f79988d21Fa8fAF74E97e");
