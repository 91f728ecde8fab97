//! Garage controller HTTP server.

use anyhow::Context;
use garage_core::constants::REFRESH_INTERVAL_MS;
use garage_gpio::AnyGpioBackend;
use garage_server::{Options, ServerConfig, SharedRegistry, build_registry, paths, router};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse(std::env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("usage: garage-server [--debug] [--verbose] [--config <file>]");
        std::process::exit(2);
    });
    options.init_tracing();
    info!(version = garage_core::VERSION, "garage controller starting");

    let config_path = options.config.clone().unwrap_or_else(paths::config_file);
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let backend = AnyGpioBackend::detect();
    let registry: SharedRegistry = Arc::new(Mutex::new(build_registry(&config, &backend)?));

    // Periodic sensor sweep; completion detection depends on it.
    let refresh_registry = Arc::clone(&registry);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(REFRESH_INTERVAL_MS));
        loop {
            tick.tick().await;
            refresh_registry.lock().await.refresh_all();
        }
    });

    let app = router(Arc::clone(&registry), options.verbose);
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.webport));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, doors = config.doors.len(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    // Make sure no control output stays asserted across restarts.
    info!("shutting down, resetting doors");
    registry.lock().await.reset_all();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
    }
}
