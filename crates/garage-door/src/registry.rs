//! The set of configured doors, addressable by identifier.

use crate::door::Door;
use garage_core::{Error, Result};
use tracing::debug;

/// All doors of one controller instance, in configuration order.
///
/// Identifiers are the URL-safe handles the boundary layer routes on;
/// they are distinct from the human readable door names. Iteration
/// preserves insertion order so listings always match the configuration
/// file.
#[derive(Debug, Default)]
pub struct DoorRegistry {
    doors: Vec<(String, Door)>,
}

impl DoorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a door under `id`.
    ///
    /// Identifiers must be unique; a duplicate is a configuration error.
    pub fn insert(&mut self, id: impl Into<String>, door: Door) -> Result<()> {
        let id = id.into();
        if self.doors.iter().any(|(existing, _)| *existing == id) {
            return Err(Error::DuplicateDoor(id));
        }
        debug!(%id, door = door.name(), "door registered");
        self.doors.push((id, door));
        Ok(())
    }

    /// Look up a door by identifier.
    pub fn get(&self, id: &str) -> Option<&Door> {
        self.doors
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, door)| door)
    }

    /// Look up a door by identifier, for pulsing.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Door> {
        self.doors
            .iter_mut()
            .find(|(existing, _)| existing == id)
            .map(|(_, door)| door)
    }

    /// All doors with their identifiers, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Door)> {
        self.doors.iter().map(|(id, door)| (id.as_str(), door))
    }

    /// Run one sensor refresh tick across every door.
    pub fn refresh_all(&mut self) {
        for (_, door) in &mut self.doors {
            door.refresh();
        }
    }

    /// Force every control output off.
    pub fn reset_all(&mut self) {
        for (_, door) in &mut self.doors {
            door.reset();
        }
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }
}
