//! Timing constants for door control and sensor polling.
//!
//! These values mirror the electrical and mechanical characteristics of
//! typical residential garage door openers: a short dry-contact pulse
//! triggers the motor, position switches bounce for a few milliseconds,
//! and a full travel takes several seconds.

// ============================================================================
// Control Output
// ============================================================================

/// Default duration of the control pulse (milliseconds).
///
/// The control output is asserted for this long, then released
/// unconditionally. Most opener boards register anything above ~100ms;
/// 500ms gives a comfortable margin without risking a double trigger.
pub const DEFAULT_PULSE_MS: u64 = 500;

/// How long a control action stays pending when the door has no position
/// sensors (milliseconds).
///
/// Without sensors there is no way to observe completion, so the pending
/// flag is cleared on a pure timeout.
///
/// # Value: 3000ms (3 seconds)
pub const PENDING_DEADLINE_MS: u64 = 3000;

// ============================================================================
// Sensor Polling
// ============================================================================

/// Interval between refresh ticks (milliseconds).
///
/// Each tick re-samples every sensor and re-evaluates pending controls.
/// The value only affects responsiveness and debounce latency, not
/// correctness.
pub const REFRESH_INTERVAL_MS: u64 = 500;

// ============================================================================
// Hardware Acquisition
// ============================================================================

/// Interval between GPIO handle acquisition retries (milliseconds).
///
/// On some platforms (notably Raspbian) permission to the GPIO device
/// files is granted asynchronously shortly after export, so the first
/// acquisition attempt can fail transiently.
pub const ACQUIRE_RETRY_INTERVAL_MS: u64 = 200;

// ============================================================================
// Boundary Layer
// ============================================================================

/// Default HTTP port when the configuration file does not specify one.
pub const DEFAULT_WEBPORT: u16 = 8080;

/// Settle delay before the reset utility exits (milliseconds).
///
/// Gives spawned de-assertion tasks time to flush before the process
/// terminates.
pub const RESET_SETTLE_MS: u64 = 1000;
