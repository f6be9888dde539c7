//! The command line arguments of the reward router.

use crate::constants;

use std::time::Duration;

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::RetryBackoffLayer;
use router_bridge::{arbitrum::DEFAULT_SEND_ROOT_SEARCH_DEPTH, poll::Poll};
use router_primitives::ProtocolFamily;
use router_redeemer::RedeemerConfig;
use router_scanner::DEFAULT_PAGE_SIZE;
use router_trigger::RouteAsset;

/// The reward router command line.
#[derive(Debug, clap::Parser)]
#[command(name = "reward-router", version, about = "Routes rewards across a parent and child chain")]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The reward router commands.
#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Redeems the child to parent messages sent by a child to parent reward router.
    Redeem(RedeemCommand),
    /// Routes the funds held by a parent to child reward router to the child chain.
    Route(RouteCommand),
}

/// The arguments of the `redeem` command.
#[derive(Debug, clap::Args)]
pub struct RedeemCommand {
    /// The parent chain arguments.
    #[command(flatten)]
    pub parent: ParentChainArgs,
    /// The child chain arguments.
    #[command(flatten)]
    pub child: ChildChainArgs,
    /// The redeemer arguments.
    #[command(flatten)]
    pub redeemer: RedeemerArgs,
    /// The bridge contract addresses.
    #[command(flatten)]
    pub bridge: BridgeAddressArgs,
    /// The poll arguments.
    #[command(flatten)]
    pub poll: PollArgs,
}

/// The arguments of the `route` command.
#[derive(Debug, clap::Args)]
pub struct RouteCommand {
    /// The parent chain arguments.
    #[command(flatten)]
    pub parent: ParentChainArgs,
    /// The child chain arguments.
    #[command(flatten)]
    pub child: ChildChainArgs,
    /// The route arguments.
    #[command(flatten)]
    pub route: RouteArgs,
    /// The poll arguments.
    #[command(flatten)]
    pub poll: PollArgs,
}

/// The arguments for the parent chain provider.
#[derive(Debug, Clone, clap::Args)]
pub struct ParentChainArgs {
    /// The URL for the parent chain RPC.
    #[arg(long = "parent.url", id = "parent_url", value_name = "PARENT_URL")]
    pub url: reqwest::Url,
    /// The private key signing the parent chain transactions.
    #[arg(long = "parent.private-key", id = "parent_private_key", env = "PARENT_CHAIN_PK", hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,
    /// The compute units per second for the provider.
    #[arg(long = "parent.cups", id = "parent_compute_units_per_second", value_name = "PARENT_COMPUTE_UNITS_PER_SECOND", default_value_t = constants::PROVIDER_COMPUTE_UNITS_PER_SECOND)]
    pub compute_units_per_second: u64,
    /// The max amount of retries for the provider.
    #[arg(long = "parent.max-retries", id = "parent_max_retries", value_name = "PARENT_MAX_RETRIES", default_value_t = constants::PROVIDER_MAX_RETRIES)]
    pub max_retries: u32,
    /// The initial backoff for the provider.
    #[arg(long = "parent.initial-backoff", id = "parent_initial_backoff", value_name = "PARENT_INITIAL_BACKOFF", default_value_t = constants::PROVIDER_INITIAL_BACKOFF)]
    pub initial_backoff: u64,
}

impl ParentChainArgs {
    /// Returns a provider to the parent chain, signing with the private key if one was provided.
    pub fn provider(&self) -> DynProvider {
        connect(
            self.url.clone(),
            self.private_key.clone(),
            self.max_retries,
            self.initial_backoff,
            self.compute_units_per_second,
        )
    }

    /// Returns the private key, erroring if none was provided.
    pub fn signer(&self) -> eyre::Result<&PrivateKeySigner> {
        self.private_key.as_ref().ok_or_else(|| eyre::eyre!("Need PARENT_CHAIN_PK"))
    }
}

/// The arguments for the child chain provider.
#[derive(Debug, Clone, clap::Args)]
pub struct ChildChainArgs {
    /// The URL for the child chain RPC.
    #[arg(long = "child.url", id = "child_url", value_name = "CHILD_URL")]
    pub url: reqwest::Url,
    /// The private key signing the child chain transactions.
    #[arg(long = "child.private-key", id = "child_private_key", env = "CHILD_CHAIN_PK", hide_env_values = true)]
    pub private_key: Option<PrivateKeySigner>,
    /// The compute units per second for the provider.
    #[arg(long = "child.cups", id = "child_compute_units_per_second", value_name = "CHILD_COMPUTE_UNITS_PER_SECOND", default_value_t = constants::PROVIDER_COMPUTE_UNITS_PER_SECOND)]
    pub compute_units_per_second: u64,
    /// The max amount of retries for the provider.
    #[arg(long = "child.max-retries", id = "child_max_retries", value_name = "CHILD_MAX_RETRIES", default_value_t = constants::PROVIDER_MAX_RETRIES)]
    pub max_retries: u32,
    /// The initial backoff for the provider.
    #[arg(long = "child.initial-backoff", id = "child_initial_backoff", value_name = "CHILD_INITIAL_BACKOFF", default_value_t = constants::PROVIDER_INITIAL_BACKOFF)]
    pub initial_backoff: u64,
}

impl ChildChainArgs {
    /// Returns a provider to the child chain, signing with the private key if one was provided.
    pub fn provider(&self) -> DynProvider {
        connect(
            self.url.clone(),
            self.private_key.clone(),
            self.max_retries,
            self.initial_backoff,
            self.compute_units_per_second,
        )
    }
}

/// Returns a provider with a retry layer, holding a wallet if a signer is provided.
fn connect(
    url: reqwest::Url,
    signer: Option<PrivateKeySigner>,
    max_retries: u32,
    initial_backoff: u64,
    compute_units_per_second: u64,
) -> DynProvider {
    let client = RpcClient::builder()
        .layer(RetryBackoffLayer::new(max_retries, initial_backoff, compute_units_per_second))
        .http(url);

    match signer {
        Some(signer) => {
            tracing::info!(target: "router::cli", address = %signer.address(), "Signing with private key");
            ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_client(client).erased()
        }
        None => ProviderBuilder::new().connect_client(client).erased(),
    }
}

/// The arguments for the redeemer.
#[derive(Debug, Clone, clap::Args)]
pub struct RedeemerArgs {
    /// The address of the child to parent reward router.
    #[arg(long = "redeemer.router", id = "redeemer_router", value_name = "ROUTER")]
    pub router: Address,
    /// The first child chain block to scan.
    #[arg(long = "redeemer.start-block", id = "redeemer_start_block", value_name = "START_BLOCK", default_value_t = 0)]
    pub start_block: u64,
    /// The number of blocks kept between the head of the child chain and the scanned range.
    #[arg(long = "redeemer.block-lag", id = "redeemer_block_lag", value_name = "BLOCK_LAG", default_value_t = constants::DEFAULT_BLOCK_LAG)]
    pub block_lag: u64,
    /// Run a single pass without waiting on the messages, then exit.
    #[arg(long = "redeemer.one-off", id = "redeemer_one_off")]
    pub one_off: bool,
    /// The path of the log cache. Use `:memory:` to keep the cache in memory.
    #[arg(long = "redeemer.log-cache", id = "redeemer_log_cache", value_name = "LOG_CACHE", default_value = constants::IN_MEMORY_LOG_CACHE)]
    pub log_cache: String,
    /// The number of blocks fetched per log request.
    #[arg(long = "redeemer.page-size", id = "redeemer_page_size", value_name = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
    /// The interval between two passes of the continuous redeemer, in seconds.
    #[arg(long = "redeemer.loop-interval", id = "redeemer_loop_interval", value_name = "LOOP_INTERVAL", default_value_t = constants::DEFAULT_LOOP_INTERVAL_SECS)]
    pub loop_interval: u64,
    /// The number of parent chain blocks searched backwards for the latest Arbitrum send root.
    #[arg(long = "redeemer.send-root-search-depth", id = "redeemer_send_root_search_depth", value_name = "SEND_ROOT_SEARCH_DEPTH", default_value_t = DEFAULT_SEND_ROOT_SEARCH_DEPTH)]
    pub send_root_search_depth: u64,
}

impl RedeemerArgs {
    /// Returns the [`RedeemerConfig`] for the arguments.
    pub const fn config(&self, poll: Poll) -> RedeemerConfig {
        RedeemerConfig::new(self.start_block, Duration::from_secs(self.loop_interval), poll)
    }

    /// Returns the sqlite URL of the log cache.
    pub fn log_cache_url(&self) -> String {
        if self.log_cache == constants::IN_MEMORY_LOG_CACHE {
            return "sqlite::memory:".to_string();
        }
        format!("sqlite://{}?mode=rwc", self.log_cache)
    }
}

/// The arguments for polling the chains.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct PollArgs {
    /// The interval between two polls, in seconds.
    #[arg(long = "poll.interval", id = "poll_interval", value_name = "POLL_INTERVAL", default_value_t = constants::DEFAULT_POLL_INTERVAL_SECS)]
    pub interval: u64,
    /// The maximum duration of a poll, in seconds.
    #[arg(long = "poll.timeout", id = "poll_timeout", value_name = "POLL_TIMEOUT", default_value_t = constants::DEFAULT_POLL_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl PollArgs {
    /// Returns the [`Poll`] for the arguments.
    pub const fn poll(&self) -> Poll {
        Poll::new(Duration::from_secs(self.interval), Duration::from_secs(self.timeout))
    }
}

/// The networks with known bridge contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NetworkPreset {
    /// Arbitrum One.
    ArbitrumOne,
    /// Arbitrum Nova.
    ArbitrumNova,
    /// OP Mainnet.
    OpMainnet,
    /// Base.
    Base,
}

impl NetworkPreset {
    /// Returns the bridge of the network.
    pub const fn bridge(&self) -> BridgeAddresses {
        match self {
            Self::ArbitrumOne => BridgeAddresses::Arbitrum { outbox: constants::ARBITRUM_ONE_OUTBOX },
            Self::ArbitrumNova => {
                BridgeAddresses::Arbitrum { outbox: constants::ARBITRUM_NOVA_OUTBOX }
            }
            Self::OpMainnet => BridgeAddresses::OpStack { portal: constants::OP_MAINNET_PORTAL },
            Self::Base => BridgeAddresses::OpStack { portal: constants::BASE_PORTAL },
        }
    }
}

/// The protocol family of the bridge, as a command line value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BridgeProtocol {
    /// The Arbitrum outbox.
    Arbitrum,
    /// The OP-stack portal.
    OpStack,
}

/// The contracts of the bridge the messages are redeemed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeAddresses {
    /// An Arbitrum bridge.
    Arbitrum {
        /// The outbox on the parent chain.
        outbox: Address,
    },
    /// An OP-stack bridge.
    OpStack {
        /// The `OptimismPortal` on the parent chain.
        portal: Address,
    },
}

impl BridgeAddresses {
    /// Returns the protocol family of the bridge.
    pub const fn family(&self) -> ProtocolFamily {
        match self {
            Self::Arbitrum { .. } => ProtocolFamily::Arbitrum,
            Self::OpStack { .. } => ProtocolFamily::OpStack,
        }
    }
}

/// The arguments for the bridge contract addresses.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct BridgeAddressArgs {
    /// The network to use the bridge contracts of.
    #[arg(long = "bridge.network", id = "bridge_network", value_name = "NETWORK", value_enum)]
    pub network: Option<NetworkPreset>,
    /// The protocol of the bridge. Defaults to the protocol of the network.
    #[arg(long = "bridge.protocol", id = "bridge_protocol", value_name = "PROTOCOL", value_enum)]
    pub protocol: Option<BridgeProtocol>,
    /// The address of the Arbitrum outbox, overriding the network default.
    #[arg(long = "bridge.outbox", id = "bridge_outbox", value_name = "OUTBOX")]
    pub outbox: Option<Address>,
    /// The address of the `OptimismPortal`, overriding the network default.
    #[arg(long = "bridge.portal", id = "bridge_portal", value_name = "PORTAL")]
    pub portal: Option<Address>,
}

impl BridgeAddressArgs {
    /// Resolves the bridge contracts from the network preset and the overrides.
    pub fn resolve(&self) -> eyre::Result<BridgeAddresses> {
        let preset = self.network.map(|network| network.bridge());
        let protocol = match (self.protocol, preset) {
            (Some(protocol), _) => protocol,
            (None, Some(BridgeAddresses::Arbitrum { .. })) => BridgeProtocol::Arbitrum,
            (None, Some(BridgeAddresses::OpStack { .. })) => BridgeProtocol::OpStack,
            (None, None) if self.outbox.is_some() => BridgeProtocol::Arbitrum,
            (None, None) if self.portal.is_some() => BridgeProtocol::OpStack,
            (None, None) => eyre::bail!("either --bridge.network or --bridge.protocol is required"),
        };

        match protocol {
            BridgeProtocol::Arbitrum => {
                let preset = match preset {
                    Some(BridgeAddresses::Arbitrum { outbox }) => Some(outbox),
                    _ => None,
                };
                let outbox = self
                    .outbox
                    .or(preset)
                    .ok_or_else(|| eyre::eyre!("--bridge.outbox is required for this network"))?;
                Ok(BridgeAddresses::Arbitrum { outbox })
            }
            BridgeProtocol::OpStack => {
                let preset = match preset {
                    Some(BridgeAddresses::OpStack { portal }) => Some(portal),
                    _ => None,
                };
                let portal = self
                    .portal
                    .or(preset)
                    .ok_or_else(|| eyre::eyre!("--bridge.portal is required for this network"))?;
                Ok(BridgeAddresses::OpStack { portal })
            }
        }
    }
}

/// The arguments for routing funds to the child chain.
#[derive(Debug, Clone, clap::Args)]
pub struct RouteArgs {
    /// The address of the parent to child reward router.
    #[arg(long = "route.router", id = "route_router", value_name = "ROUTER")]
    pub router: Address,
    /// The routed asset: `ETH` or the address of an ERC20 token.
    #[arg(long = "route.asset", id = "route_asset", value_name = "ASSET", default_value = "ETH")]
    pub asset: RouteAsset,
    /// The minimum balance of the router to route its funds, in wei.
    #[arg(long = "route.min-balance", id = "route_min_balance", value_name = "MIN_BALANCE", default_value_t = U256::ZERO)]
    pub min_balance: U256,
}
