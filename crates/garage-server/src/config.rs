//! Server configuration file.
//!
//! The file is JSON: a `webport` plus an ordered array of doors. The
//! door order in the file defines the registry order, which in turn is
//! the order `/status` reports in.
//!
//! ```json
//! {
//!   "webport": 8080,
//!   "doors": [
//!     { "id": "main", "name": "Main",
//!       "control": { "pin": 17, "on": "HIGH", "pulse": 500 },
//!       "open":    { "pin": 27, "on": "LOW" },
//!       "closed":  { "pin": 22 } }
//!   ]
//! }
//! ```

use garage_core::constants::DEFAULT_WEBPORT;
use garage_core::{DoorConfig, Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// One configured door plus its routing identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct DoorEntry {
    /// URL path segment the door is addressed by. Defaults to the name.
    pub id: Option<String>,

    #[serde(flatten)]
    pub door: DoorConfig,
}

impl DoorEntry {
    /// The identifier the door is registered and routed under.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.door.name)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// TCP port the HTTP listener binds on.
    #[serde(default = "default_webport")]
    pub webport: u16,

    pub doors: Vec<DoorEntry>,
}

fn default_webport() -> u16 {
    DEFAULT_WEBPORT
}

impl ServerConfig {
    /// Load and parse a configuration file.
    ///
    /// Any failure here is fatal to the caller; a controller without a
    /// valid door list has nothing to do.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config = Self::parse(&raw)
            .map_err(|err| Error::config(format!("{}: {err}", path.display())))?;
        info!(
            path = %path.display(),
            doors = config.doors.len(),
            webport = config.webport,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from its JSON text.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
