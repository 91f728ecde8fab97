//! GPIO access abstraction for the garage door controller.
//!
//! This crate isolates the rest of the workspace from platform-specific
//! GPIO libraries. It defines the [`GpioBackend`] capability trait
//! (acquire, read and write a numbered line) together with three
//! implementations:
//!
//! - [`MockGpio`]: fully scriptable in-memory backend, paired with a
//!   [`MockGpioHandle`] that injects raw sensor levels and observes
//!   written output levels. Used by every timing test in the workspace.
//! - [`StubGpio`]: software-only fallback used when no real GPIO layer
//!   is available. It always reports ready but never performs I/O, so
//!   the controller keeps running in development environments.
//! - `RppalGpio`: real hardware access through the `rppal` crate,
//!   behind the `hardware-rppal` feature.
//!
//! # Dispatch
//!
//! Backends are passed around as the [`AnyGpioBackend`] enum rather than
//! a trait object. This keeps dispatch concrete, supports feature-gated
//! variants, and lets every variant stay cheaply cloneable (each wraps
//! shared interior state), which the pulse de-assertion and acquisition
//! retry tasks rely on.
//!
//! # Error Handling
//!
//! Acquisition failures are expected to be transient and are retried by
//! the caller; read and write failures inside the polling path are
//! swallowed there, per the controller's no-errors-in-steady-state
//! policy. The [`GpioError`] type still carries enough context for the
//! debug logs.

pub mod backend;
pub mod error;
pub mod mock;
pub mod stub;

#[cfg(feature = "hardware-rppal")]
pub mod rppal;

pub use backend::{AnyGpioBackend, GpioBackend};
pub use error::{GpioError, Result};
pub use mock::{MockGpio, MockGpioHandle};
pub use stub::StubGpio;
