//! Signal levels, door status vocabulary and per-door configuration types.

use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::fmt;
use std::time::Duration;

/// Raw electrical level of a GPIO line.
///
/// Configuration files spell levels as `"HIGH"` / `"LOW"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// The opposite level.
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "LOW"),
            Level::High => write!(f, "HIGH"),
        }
    }
}

/// Direction a GPIO line is driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    /// The active level assumed when the configuration does not name one.
    ///
    /// Controls are relay-style outputs that close on HIGH; position
    /// switches are pulled up and short to ground when engaged, so
    /// inputs default to active-LOW.
    #[must_use]
    pub fn default_active_level(self) -> Level {
        match self {
            PinDirection::Input => Level::Low,
            PinDirection::Output => Level::High,
        }
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Input => write!(f, "in"),
            PinDirection::Output => write!(f, "out"),
        }
    }
}

/// Derived status of a door, as reported to HTTP clients.
///
/// This is a read-only state machine: the pending flag and sensor
/// snapshots inside the door decide which variant applies, and querying
/// the status never mutates anything. `Unknown` is the designed
/// fallback whenever the inputs cannot disambiguate the position; it is
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorStatus {
    /// The open sensor reports active and no control is pending.
    Open,

    /// The closed sensor reports active and no control is pending.
    Closed,

    /// A control is pending and the door was at the closed endpoint when
    /// it was pulsed.
    Opening,

    /// A control is pending and the door was at the open endpoint when
    /// it was pulsed.
    Closing,

    /// A control is pending but the direction of travel cannot be
    /// inferred (mid-travel pulse, or no sensors at all).
    Moving,

    /// No sensor reports a definite endpoint.
    Unknown,
}

impl DoorStatus {
    /// Status as the lowercase string used in HTTP responses.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DoorStatus::Open => "open",
            DoorStatus::Closed => "closed",
            DoorStatus::Opening => "opening",
            DoorStatus::Closing => "closing",
            DoorStatus::Moving => "moving",
            DoorStatus::Unknown => "unknown",
        }
    }

    /// Whether a control action is still in flight for this status.
    pub fn is_transitional(self) -> bool {
        matches!(
            self,
            DoorStatus::Opening | DoorStatus::Closing | DoorStatus::Moving
        )
    }
}

impl fmt::Display for DoorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for a door's control output.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// GPIO line number driving the opener.
    pub pin: u8,

    /// Active level of the output. Defaults to HIGH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Level>,

    /// Pulse duration in milliseconds. Defaults to
    /// [`DEFAULT_PULSE_MS`](crate::constants::DEFAULT_PULSE_MS).
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulse: Option<Duration>,
}

/// Configuration for an optional position sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// GPIO line number the switch is wired to.
    pub pin: u8,

    /// Active level of the input. Defaults to LOW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Level>,
}

/// User configuration for a single door.
///
/// A door always has a control output; either or both position sensors
/// may be absent, in which case completion detection degrades as
/// described on [`DoorStatus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    /// Human readable identifier of the door.
    pub name: String,

    /// Control output wiring.
    pub control: ControlConfig,

    /// Sensor engaged when the door is fully open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<SensorConfig>,

    /// Sensor engaged when the door is fully closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<SensorConfig>,
}
