//! Shared vocabulary for the garage door controller.
//!
//! This crate defines the types, constants and error taxonomy used across
//! the workspace: signal levels and polarities, the derived door status
//! enumeration, and the per-door configuration structures deserialized
//! from the user configuration file.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
