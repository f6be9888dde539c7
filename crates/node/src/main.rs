//! Reward router binary

use clap::Parser;
use reward_router::args::{Cli, Command};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    init_tracing_subscriber();

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!(target: "router::cli", "Received shutdown signal");
            }
            cancel.cancel();
        }
    });

    let res = match Cli::parse().command {
        Command::Redeem(cmd) => reward_router::redeem(cmd, cancel).await.map(|_| ()),
        Command::Route(cmd) => reward_router::route(cmd, cancel).await.map(|_| ()),
    };

    if let Err(err) = res {
        tracing::error!(target: "router::cli", ?err, "Reward router failed");
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber, reading the filter from `RUST_LOG` and defaulting to `info`.
fn init_tracing_subscriber() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
