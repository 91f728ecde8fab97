//! Configuration file lookup.
//!
//! A file is looked for next to the working directory first, then in
//! the system data directory. The local fallback is also returned when
//! neither exists, so the eventual open error names a sensible path.

use std::path::{Path, PathBuf};
use tracing::debug;

/// System-wide data directory used by packaged installs.
pub const SYSTEM_DIR: &str = "/var/lib/garage";

/// Default configuration file name.
pub const CONFIG_FILE: &str = "config.json";

/// Resolve `name` against the working directory and [`SYSTEM_DIR`].
pub fn locate(name: &str) -> PathBuf {
    locate_in(name, Path::new("."), Path::new(SYSTEM_DIR))
}

/// The default configuration file path.
pub fn config_file() -> PathBuf {
    locate(CONFIG_FILE)
}

fn locate_in(name: &str, local: &Path, system: &Path) -> PathBuf {
    let local = local.join(name);
    let path = if local.exists() {
        local
    } else if system.is_dir() {
        system.join(name)
    } else {
        local
    };
    debug!(name, path = %path.display(), "resolved data path");
    path
}
