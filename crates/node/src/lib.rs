//! The reward router: redeems the messages sent by child to parent reward routers and routes the
//! funds held by parent to child reward routers.

use std::sync::Arc;

use router_bridge::{
    AlloyArbitrumBridge, AlloyOpStackBridge, ArbitrumAdapter, OpStackAdapter, ProtocolAdapter,
    ReceiptExtractor, DEFAULT_RECEIPT_CACHE_CAPACITY,
};
use router_db::{Database, DatabaseConnectionProvider};
use router_migration::{Migrator, MigratorTrait};
use router_primitives::Watermark;
use router_redeemer::Redeemer;
use router_scanner::{EventScanner, LogCache};
use router_trigger::{
    check_and_route_funds, AlloyRetryableTracker, ParentToChildRouter, TriggerOutcome,
};
use tokio_util::sync::CancellationToken;

pub mod args;
use args::{BridgeAddresses, RedeemCommand, RouteCommand};

mod constants;

/// Runs the redeemer until completion of the one-off pass or until cancelled. Returns the
/// watermark to resume from.
pub async fn redeem(cmd: RedeemCommand, cancel: CancellationToken) -> eyre::Result<Watermark> {
    let bridge = cmd.bridge.resolve()?;
    let submitter = cmd.parent.signer()?.address();
    let parent = cmd.parent.provider();
    let child = cmd.child.provider();

    let database = Arc::new(open_log_cache(&cmd.redeemer.log_cache_url()).await?);
    let cache = Arc::new(LogCache::new(database, cmd.redeemer.page_size));
    let scanner =
        EventScanner::new(child.clone(), cache, cmd.redeemer.router, cmd.redeemer.block_lag);
    let extractor =
        ReceiptExtractor::new(child.clone(), bridge.family(), DEFAULT_RECEIPT_CACHE_CAPACITY);

    let adapter: Box<dyn ProtocolAdapter> = match bridge {
        BridgeAddresses::Arbitrum { outbox } => {
            let bridge = AlloyArbitrumBridge::new(parent, child, outbox)
                .with_send_root_search_depth(cmd.redeemer.send_root_search_depth);
            Box::new(ArbitrumAdapter::new(bridge))
        }
        BridgeAddresses::OpStack { portal } => Box::new(OpStackAdapter::new(
            AlloyOpStackBridge::new(parent, child, portal, submitter),
        )),
    };

    tracing::info!(target: "router::cli", ?bridge, router = %cmd.redeemer.router, start_block = cmd.redeemer.start_block, one_off = cmd.redeemer.one_off, "Launching redeemer");
    let redeemer = Redeemer::new(scanner, extractor, adapter, cmd.redeemer.config(cmd.poll.poll()));
    let watermark = redeemer.run(cmd.redeemer.one_off, cancel).await?;
    tracing::info!(target: "router::cli", %watermark, "Redeemer done, resume from the watermark");

    Ok(watermark)
}

/// Routes the funds of the parent to child router if eligible and waits for them to land on the
/// child chain.
pub async fn route(cmd: RouteCommand, cancel: CancellationToken) -> eyre::Result<TriggerOutcome> {
    // routing is a parent chain transaction.
    cmd.parent.signer()?;
    if cmd.child.private_key.is_none() {
        tracing::warn!(target: "router::cli", "No CHILD_CHAIN_PK, failed auto-redeems can not be retried");
    }
    let parent = cmd.parent.provider();
    let child = cmd.child.provider();

    let router = ParentToChildRouter::new(parent, cmd.route.router);
    let tracker = AlloyRetryableTracker::new(child.clone());

    tracing::info!(target: "router::cli", router = %cmd.route.router, asset = %cmd.route.asset, min_balance = %cmd.route.min_balance, "Checking parent to child router");
    let outcome = check_and_route_funds(
        &router,
        &child,
        &tracker,
        cmd.route.asset,
        cmd.route.min_balance,
        &cmd.poll.poll(),
        &cancel,
    )
    .await?;
    tracing::info!(target: "router::cli", ?outcome, "Route done");

    Ok(outcome)
}

/// Connects to the log cache and runs the migrations.
async fn open_log_cache(url: &str) -> eyre::Result<Database> {
    let database = Database::new(url).await?;
    Migrator::up(database.get_connection(), None).await?;
    Ok(database)
}
