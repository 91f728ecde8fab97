//! HTTP boundary and configuration for the garage controller.
//!
//! The server exposes two endpoints: `GET /pulse/{door}` triggers a
//! door and `GET /status` lists every door with its derived status.
//! Everything stateful lives in a shared [`garage_door::DoorRegistry`];
//! this crate only loads configuration, wires the routes, and runs the
//! periodic sensor refresh tick.

pub mod config;
pub mod options;
pub mod paths;
pub mod routes;

pub use config::{DoorEntry, ServerConfig};
pub use options::Options;
pub use routes::{SharedRegistry, router};

use garage_door::{Door, DoorRegistry};
use garage_gpio::AnyGpioBackend;

/// Construct every configured door and register it.
///
/// Fails only on duplicate identifiers; hardware problems degrade per
/// pin instead of failing construction.
pub fn build_registry(
    config: &ServerConfig,
    backend: &AnyGpioBackend,
) -> garage_core::Result<DoorRegistry> {
    let mut registry = DoorRegistry::new();
    for entry in &config.doors {
        let door = Door::new(&entry.door, backend.clone());
        registry.insert(entry.id(), door)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_registry_from_config() {
        let config = ServerConfig::parse(
            r#"{ "doors": [
                { "id": "main", "name": "Main", "control": { "pin": 1 } },
                { "name": "Side", "control": { "pin": 2 } }
            ] }"#,
        )
        .unwrap();

        let (mock, _handle) = garage_gpio::MockGpio::new();
        let registry = build_registry(&config, &AnyGpioBackend::Mock(mock)).unwrap();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["main", "Side"]);
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let config = ServerConfig::parse(
            r#"{ "doors": [
                { "id": "main", "name": "Main", "control": { "pin": 1 } },
                { "id": "main", "name": "Other", "control": { "pin": 2 } }
            ] }"#,
        )
        .unwrap();

        let (mock, _handle) = garage_gpio::MockGpio::new();
        assert!(build_registry(&config, &AnyGpioBackend::Mock(mock)).is_err());
    }
}
