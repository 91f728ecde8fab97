//! A single garage door: control output, optional sensors, derived status.

use crate::pin::{Pin, PinRole};
use garage_core::constants::{DEFAULT_PULSE_MS, PENDING_DEADLINE_MS};
use garage_core::{DoorConfig, DoorStatus, PinDirection};
use garage_gpio::AnyGpioBackend;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Sensor reached a definite endpoint it was not already at when the
/// control was pulsed.
fn completed(sensor: &Pin) -> bool {
    sensor.status() && !sensor.latched()
}

/// Sensor moved away from its pre-pulse reading, which may not mean the
/// move is over.
fn moved(sensor: &Pin) -> bool {
    sensor.status() != sensor.latched()
}

/// One garage door.
///
/// Constructed once at startup from configuration, mutated by
/// [`pulse`](Door::pulse) and [`refresh`](Door::refresh), and reset
/// best-effort at process exit so the control output is never left
/// asserted (which would block physical door travel).
#[derive(Debug)]
pub struct Door {
    name: String,
    control: Pin,
    open: Option<Pin>,
    closed: Option<Pin>,

    /// How long the control output stays asserted.
    pulse: Duration,

    /// A control action was issued and has not been confirmed complete.
    pending: bool,

    /// Fallback timeout for doors without any sensor.
    deadline: Option<Instant>,
}

impl Door {
    /// Build a door from its configuration entry.
    ///
    /// Pin polarities fall back to the direction defaults (outputs
    /// active-HIGH, inputs active-LOW) when the configuration does not
    /// name them. Hardware acquisition failures do not surface here;
    /// affected pins retry in the background and stay silent until
    /// ready.
    pub fn new(config: &DoorConfig, backend: AnyGpioBackend) -> Self {
        debug!(door = %config.name, "initializing door");

        let control_active = config
            .control
            .on
            .unwrap_or(PinDirection::Output.default_active_level());
        let control = Pin::new(
            PinRole::Control,
            config.control.pin,
            PinDirection::Output,
            control_active,
            backend.clone(),
        );

        let sensor = |role: PinRole, cfg: &garage_core::SensorConfig| {
            Pin::new(
                role,
                cfg.pin,
                PinDirection::Input,
                cfg.on.unwrap_or(PinDirection::Input.default_active_level()),
                backend.clone(),
            )
        };
        let open = config.open.as_ref().map(|cfg| sensor(PinRole::Open, cfg));
        let closed = config
            .closed
            .as_ref()
            .map(|cfg| sensor(PinRole::Closed, cfg));

        Self {
            name: config.name.clone(),
            control,
            open,
            closed,
            pulse: config
                .control
                .pulse
                .unwrap_or(Duration::from_millis(DEFAULT_PULSE_MS)),
            pending: false,
            deadline: None,
        }
    }

    /// Trigger the control pulse to move the door.
    ///
    /// Snapshots each present sensor's logical status (the latched
    /// control intent used later to tell opening from closing), marks
    /// the control pending with a 3 second fallback deadline, asserts
    /// the output, and schedules the de-assertion after the configured
    /// pulse duration. The output is always released after the pulse
    /// window; this is fire-and-forget actuation, not a closed-loop
    /// hold.
    pub fn pulse(&mut self) {
        if let Some(open) = self.open.as_mut() {
            open.latch();
        }
        if let Some(closed) = self.closed.as_mut() {
            closed.latch();
        }
        self.pending = true;
        self.deadline = Some(Instant::now() + Duration::from_millis(PENDING_DEADLINE_MS));

        debug!(
            door = %self.name,
            pin = self.control.number(),
            pulse_ms = self.pulse.as_millis() as u64,
            "control pulsed"
        );
        self.control.assert_active();

        let release = self.control.output_handle();
        let pulse = self.pulse;
        tokio::spawn(async move {
            sleep(pulse).await;
            release.deassert();
        });
    }

    /// Re-sample the sensors and detect completion of a pending control.
    ///
    /// Must be called on a fixed interval for completion detection to
    /// function; the interval only affects responsiveness, not
    /// correctness. With both sensors present the pending flag clears
    /// when either reports a definite new endpoint; with one sensor, as
    /// soon as that sensor moved off its latched value; with none, when
    /// the deadline elapses.
    pub fn refresh(&mut self) {
        if let Some(open) = self.open.as_mut() {
            open.sample();
        }
        if let Some(closed) = self.closed.as_mut() {
            closed.sample();
        }

        if !self.pending {
            return;
        }
        let done = match (self.open.as_ref(), self.closed.as_ref()) {
            (Some(open), Some(closed)) => completed(open) || completed(closed),
            (Some(sensor), None) | (None, Some(sensor)) => moved(sensor),
            (None, None) => self.deadline.is_some_and(|d| Instant::now() >= d),
        };
        if done {
            self.pending = false;
            self.deadline = None;
            debug!(door = %self.name, "pending control completed");
        }
    }

    /// Current status of the door. Pure; never mutates state.
    pub fn status(&self) -> DoorStatus {
        if self.pending {
            return match (self.open.as_ref(), self.closed.as_ref()) {
                (Some(open), Some(closed)) => {
                    if closed.latched() {
                        DoorStatus::Opening
                    } else if open.latched() {
                        DoorStatus::Closing
                    } else {
                        // Neither endpoint was engaged at pulse time:
                        // the door was already mid-travel.
                        DoorStatus::Moving
                    }
                }
                (None, Some(closed)) => {
                    if closed.latched() {
                        DoorStatus::Opening
                    } else {
                        DoorStatus::Closing
                    }
                }
                (Some(open), None) => {
                    if open.latched() {
                        DoorStatus::Closing
                    } else {
                        DoorStatus::Opening
                    }
                }
                (None, None) => DoorStatus::Moving,
            };
        }

        if self.open.as_ref().is_some_and(Pin::status) {
            return DoorStatus::Open;
        }
        if self.closed.as_ref().is_some_and(Pin::status) {
            return DoorStatus::Closed;
        }
        DoorStatus::Unknown
    }

    /// Force the control output off and clear the pending flag.
    ///
    /// Used at shutdown and by the crash-recovery utility; does not wait
    /// for or check sensor completion, and never fails, even when the
    /// hardware handle never finished acquiring.
    pub fn reset(&mut self) {
        self.pending = false;
        self.deadline = None;
        debug!(door = %self.name, pin = self.control.number(), "control reset");
        self.control.deassert();
    }

    /// Human readable identifier of the door.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a control action is still awaiting completion.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Configured control pulse duration.
    pub fn pulse_duration(&self) -> Duration {
        self.pulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garage_core::{ControlConfig, Level, SensorConfig};
    use garage_gpio::{MockGpio, MockGpioHandle};

    const CONTROL: u8 = 1;
    const OPEN: u8 = 2;
    const CLOSED: u8 = 3;

    fn config(open: bool, closed: bool) -> DoorConfig {
        DoorConfig {
            name: "Main".to_string(),
            control: ControlConfig {
                pin: CONTROL,
                on: None,
                pulse: None,
            },
            open: open.then_some(SensorConfig { pin: OPEN, on: None }),
            closed: closed.then_some(SensorConfig {
                pin: CLOSED,
                on: None,
            }),
        }
    }

    fn door(open: bool, closed: bool) -> (Door, MockGpioHandle) {
        let (mock, handle) = MockGpio::new();
        // Both sensors idle at their inactive (pulled-up) level.
        handle.set_level(OPEN, Level::High);
        handle.set_level(CLOSED, Level::High);
        let door = Door::new(&config(open, closed), AnyGpioBackend::Mock(mock));
        (door, handle)
    }

    /// Drive a sensor through debounce to the given logical state.
    fn settle(door: &mut Door, handle: &MockGpioHandle, pin: u8, active: bool) {
        let level = if active { Level::Low } else { Level::High };
        handle.set_level(pin, level);
        door.refresh();
        door.refresh();
    }

    #[test]
    fn test_initial_status_unknown() {
        let (door, _handle) = door(true, true);
        assert_eq!(door.status(), DoorStatus::Unknown);
    }

    #[test]
    fn test_status_closed_then_open() {
        let (mut door, handle) = door(true, true);

        settle(&mut door, &handle, CLOSED, true);
        assert_eq!(door.status(), DoorStatus::Closed);

        settle(&mut door, &handle, CLOSED, false);
        settle(&mut door, &handle, OPEN, true);
        assert_eq!(door.status(), DoorStatus::Open);
    }

    #[test]
    fn test_open_sensor_wins_over_closed() {
        // An impossible both-active reading resolves by evaluation
        // order rather than erroring.
        let (mut door, handle) = door(true, true);
        settle(&mut door, &handle, OPEN, true);
        settle(&mut door, &handle, CLOSED, true);
        assert_eq!(door.status(), DoorStatus::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_from_closed_reports_opening() {
        let (mut door, handle) = door(true, true);
        settle(&mut door, &handle, CLOSED, true);

        door.pulse();
        assert!(door.is_pending());
        assert_eq!(door.status(), DoorStatus::Opening);

        // Status stays "opening" while the closed switch releases.
        settle(&mut door, &handle, CLOSED, false);
        assert_eq!(door.status(), DoorStatus::Opening);

        // Reaching the open endpoint completes the action.
        settle(&mut door, &handle, OPEN, true);
        assert!(!door.is_pending());
        assert_eq!(door.status(), DoorStatus::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_from_open_reports_closing() {
        let (mut door, handle) = door(true, true);
        settle(&mut door, &handle, OPEN, true);

        door.pulse();
        assert_eq!(door.status(), DoorStatus::Closing);

        settle(&mut door, &handle, OPEN, false);
        settle(&mut door, &handle, CLOSED, true);
        assert_eq!(door.status(), DoorStatus::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_mid_travel_reports_moving() {
        let (mut door, handle) = door(true, true);
        // Neither endpoint engaged.
        door.pulse();
        assert_eq!(door.status(), DoorStatus::Moving);

        // Any endpoint completes the ambiguous move.
        settle(&mut door, &handle, CLOSED, true);
        assert!(!door.is_pending());
        assert_eq!(door.status(), DoorStatus::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_latched_endpoint_does_not_complete() {
        // Pulsed at the closed endpoint; the closed switch re-engaging
        // is not a new endpoint and must not clear pending.
        let (mut door, handle) = door(true, true);
        settle(&mut door, &handle, CLOSED, true);
        door.pulse();

        settle(&mut door, &handle, CLOSED, false);
        settle(&mut door, &handle, CLOSED, true);
        assert!(door.is_pending());
        assert_eq!(door.status(), DoorStatus::Opening);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_closed_sensor_directions() {
        let (mut door, handle) = door(false, true);

        settle(&mut door, &handle, CLOSED, true);
        door.pulse();
        assert_eq!(door.status(), DoorStatus::Opening);

        // Movement away from the latched reading completes the action,
        // even though no endpoint was reached.
        settle(&mut door, &handle, CLOSED, false);
        assert!(!door.is_pending());
        assert_eq!(door.status(), DoorStatus::Unknown);

        // Pulsed away from the closed endpoint: must be a close.
        door.pulse();
        assert_eq!(door.status(), DoorStatus::Closing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_open_sensor_directions() {
        let (mut door, handle) = door(true, false);

        settle(&mut door, &handle, OPEN, true);
        door.pulse();
        assert_eq!(door.status(), DoorStatus::Closing);

        settle(&mut door, &handle, OPEN, false);
        assert!(!door.is_pending());

        door.pulse();
        assert_eq!(door.status(), DoorStatus::Opening);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sensors_uses_deadline() {
        let (mut door, _handle) = door(false, false);

        door.pulse();
        assert_eq!(door.status(), DoorStatus::Moving);

        // Refreshing before the deadline changes nothing.
        tokio::time::advance(Duration::from_millis(PENDING_DEADLINE_MS - 100)).await;
        door.refresh();
        assert!(door.is_pending());
        assert_eq!(door.status(), DoorStatus::Moving);

        // Pending clears only once the deadline elapsed and a refresh ran.
        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(door.status(), DoorStatus::Moving);
        door.refresh();
        assert!(!door.is_pending());
        assert_eq!(door.status(), DoorStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_asserts_then_releases_output() {
        let (mut door, handle) = door(true, true);
        assert_eq!(handle.last_written(CONTROL), Some(Level::Low));

        door.pulse();
        assert_eq!(handle.last_written(CONTROL), Some(Level::High));

        // The de-assertion fires after the configured pulse duration
        // regardless of completion.
        tokio::time::sleep(Duration::from_millis(DEFAULT_PULSE_MS + 50)).await;
        assert_eq!(handle.last_written(CONTROL), Some(Level::Low));
        assert!(door.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_pulse_duration() {
        let (mock, handle) = MockGpio::new();
        let mut cfg = config(false, false);
        cfg.control.pulse = Some(Duration::from_millis(2000));
        let mut door = Door::new(&cfg, AnyGpioBackend::Mock(mock));
        assert_eq!(door.pulse_duration(), Duration::from_millis(2000));

        door.pulse();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.last_written(CONTROL), Some(Level::High));
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(handle.last_written(CONTROL), Some(Level::Low));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_pending_and_output() {
        let (mut door, handle) = door(true, true);
        door.pulse();
        assert!(door.is_pending());

        door.reset();
        assert!(!door.is_pending());
        assert_eq!(handle.last_written(CONTROL), Some(Level::Low));
        assert_eq!(door.status(), DoorStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_never_fails_without_hardware() {
        let (mock, handle) = MockGpio::new();
        handle.fail_acquisitions(CONTROL, u32::MAX);
        let mut door = Door::new(&config(false, false), AnyGpioBackend::Mock(mock));

        door.pulse();
        door.reset();
        assert!(!door.is_pending());
        assert_eq!(handle.last_written(CONTROL), None);
    }

    #[test]
    fn test_status_is_idempotent() {
        let (mut door, handle) = door(true, true);
        settle(&mut door, &handle, CLOSED, true);

        let first = door.status();
        for _ in 0..10 {
            assert_eq!(door.status(), first);
        }
    }

    #[test]
    fn test_active_high_sensor_polarity() {
        let (mock, handle) = MockGpio::new();
        let mut cfg = config(false, true);
        cfg.closed.as_mut().unwrap().on = Some(Level::High);
        let mut door = Door::new(&cfg, AnyGpioBackend::Mock(mock));

        handle.set_level(CLOSED, Level::High);
        door.refresh();
        door.refresh();
        assert_eq!(door.status(), DoorStatus::Closed);
    }
}
