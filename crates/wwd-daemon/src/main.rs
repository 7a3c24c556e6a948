//! wwd-daemon entry point.
//!
//! This file is intentionally thin: it sets up tracing, loads config,
//! connects and migrates the sink, spawns the poll driver, and starts the
//! HTTP server. Route handlers live in `routes.rs`, shared state in
//! `state.rs`, the poll loop in `poll.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::sync::watch;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};
use wwd_config::WatchConfig;
use wwd_daemon::{poll, routes, state};
use wwd_feed::QWeatherFeed;
use wwd_snapshot::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience). Silent if the file does
    // not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let config = WatchConfig::from_env().context("configuration load failed")?;
    info!(?config, "configuration loaded");

    let pool = wwd_db::connect_from_env().await?;
    wwd_db::migrate(&pool).await?;

    let shared = Arc::new(state::AppState::new(pool));

    let deps = poll::PollDeps {
        feed: Box::new(QWeatherFeed::new_with_base_url(
            config.api_key.clone(),
            config.location.clone(),
            config.feed_base_url.clone(),
        )),
        snapshot: SnapshotStore::new(&config.snapshot_path),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    poll::spawn_poll_loop(
        Arc::clone(&shared),
        deps,
        config.poll_interval,
        shutdown_rx,
    );

    let app = routes::build_router(Arc::clone(&shared)).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let addr = bind_addr_from_env().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8901)));
    info!("wwd-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("WWD_DAEMON_ADDR").ok()?.parse().ok()
}

/// On ctrl-c, flip the poll driver's shutdown flag (checked between cycles,
/// not mid-sleep) and let the HTTP server drain.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
}
