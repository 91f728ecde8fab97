//! Crash recovery utility.
//!
//! If the server dies between asserting a control output and the pulse
//! timer releasing it, the opener input stays held and the door can no
//! longer be operated. Running this binary forces every configured
//! control output back to its inactive level.

use anyhow::Context;
use garage_core::constants::RESET_SETTLE_MS;
use garage_gpio::AnyGpioBackend;
use garage_server::{Options, ServerConfig, build_registry, paths};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse(std::env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("usage: garage-reset [--debug] [--config <file>]");
        std::process::exit(2);
    });
    options.init_tracing();

    let config_path = options.config.clone().unwrap_or_else(paths::config_file);
    let config = ServerConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let backend = AnyGpioBackend::detect();
    let mut registry = build_registry(&config, &backend)?;
    registry.reset_all();
    info!(doors = registry.len(), "controls reset");

    // Give slow hardware acquisitions a moment to land the writes.
    tokio::time::sleep(Duration::from_millis(RESET_SETTLE_MS)).await;
    Ok(())
}
