//! Door state tracking for the garage controller.
//!
//! This crate is the heart of the system: it turns noisy digital sensor
//! readings into a debounced logical state, and infers a door's motion
//! status from a pending control action plus the sensor transitions that
//! follow it, even when a door has one or no position sensors.
//!
//! # Model
//!
//! A [`Door`] owns up to three [`Pin`]s: a required control output and
//! optional `open` / `closed` position sensors. Pulsing a door snapshots
//! the sensors (the *latched control intent*), asserts the control
//! output for a fixed duration, and marks the action pending. A
//! periodic [`Door::refresh`] re-samples the sensors and clears the
//! pending flag once the observed transitions show the action completed;
//! [`Door::status`] is a pure function deriving the reported status from
//! the pending flag, the latch, and the current sensor states.
//!
//! # Degradation
//!
//! Completion detection adapts to the sensors a door actually has:
//!
//! | Sensors | Pending clears when |
//! |---------|---------------------|
//! | both    | either sensor turns active at an endpoint it was not latched at |
//! | one     | that sensor's status differs from its latched value |
//! | none    | a 3 second deadline elapses |
//!
//! # Concurrency
//!
//! Doors are not thread-safe by themselves; the boundary layer keeps the
//! whole [`DoorRegistry`] behind a `tokio::sync::Mutex` so the refresh
//! tick, HTTP handlers and shutdown never interleave partial updates.
//! The only tasks a door spawns (pulse de-assertion, acquisition retry)
//! touch nothing but a cloned backend handle and an atomic readiness
//! flag, so they never contend for that lock.

pub mod door;
pub mod pin;
pub mod registry;
pub mod retry;

pub use door::Door;
pub use pin::{Pin, PinRole};
pub use registry::DoorRegistry;
pub use retry::RetryPolicy;
