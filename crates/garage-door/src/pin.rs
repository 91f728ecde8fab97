//! Debounced per-pin state.

use crate::retry::RetryPolicy;
use garage_core::constants::ACQUIRE_RETRY_INTERVAL_MS;
use garage_core::{Level, PinDirection};
use garage_gpio::{AnyGpioBackend, GpioBackend};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Which part a pin plays in a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// The output that pulses the opener.
    Control,

    /// The sensor engaged at the fully-open endpoint.
    Open,

    /// The sensor engaged at the fully-closed endpoint.
    Closed,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRole::Control => write!(f, "control"),
            PinRole::Open => write!(f, "open"),
            PinRole::Closed => write!(f, "closed"),
        }
    }
}

/// One physical GPIO line with debounced logical state.
///
/// A pin separates the last raw sample (`latest`) from the last
/// *confirmed* raw value (`value`): a new raw value only becomes the
/// confirmed one when it is observed on two consecutive samples, which
/// rejects single-sample glitches from switch bounce. The logical
/// `status` is then simply whether the confirmed value equals the
/// configured active level.
///
/// Readiness is shared with the background acquisition retry task
/// through an atomic flag; while the hardware handle is not acquired,
/// sampling and driving are silent no-ops.
#[derive(Debug)]
pub struct Pin {
    role: PinRole,
    number: u8,
    direction: PinDirection,
    active: Level,

    /// Last confirmed raw value.
    value: Level,

    /// Last raw sample seen, confirmed or not.
    latest: Level,

    /// Debounced logical state: confirmed value equals the active level.
    status: bool,

    /// Snapshot of `status` taken when the door was last pulsed.
    latched: bool,

    ready: Arc<AtomicBool>,
    backend: AnyGpioBackend,
}

impl Pin {
    /// Configure a pin and acquire its hardware handle.
    ///
    /// If acquisition fails it is retried in the background every
    /// 200ms, without bound; until it succeeds the pin stays unready
    /// and all I/O on it is skipped. Outputs are driven to their
    /// inactive level as soon as the handle exists.
    pub fn new(
        role: PinRole,
        number: u8,
        direction: PinDirection,
        active: Level,
        backend: AnyGpioBackend,
    ) -> Self {
        let inactive = active.inverse();
        let ready = Arc::new(AtomicBool::new(false));
        trace!(pin = number, role = %role, direction = %direction, "configuring pin");

        match backend.acquire(number, direction) {
            Ok(()) => {
                ready.store(true, Ordering::Release);
                if direction == PinDirection::Output
                    && let Err(err) = backend.write(number, inactive)
                {
                    debug!(pin = number, %err, "initial de-assert skipped");
                }
            }
            Err(err) => {
                warn!(
                    pin = number,
                    %err,
                    "pin setup failed, retrying every {ACQUIRE_RETRY_INTERVAL_MS}ms"
                );
                let policy = RetryPolicy::fixed(Duration::from_millis(ACQUIRE_RETRY_INTERVAL_MS));
                let backend = backend.clone();
                let ready = Arc::clone(&ready);
                tokio::spawn(async move {
                    if policy
                        .run(|| backend.acquire(number, direction))
                        .await
                        .is_some()
                    {
                        ready.store(true, Ordering::Release);
                        if direction == PinDirection::Output
                            && let Err(err) = backend.write(number, inactive)
                        {
                            debug!(pin = number, %err, "initial de-assert skipped");
                        }
                        info!(pin = number, "pin ready after retry");
                    }
                });
            }
        }

        Self {
            role,
            number,
            direction,
            active,
            value: inactive,
            latest: inactive,
            status: false,
            latched: false,
            ready,
            backend,
        }
    }

    /// Take one raw sample and run the debounce step.
    ///
    /// A raw value different from the confirmed one is accepted only if
    /// the previous sample already showed it; otherwise it is remembered
    /// and must repeat. Unready pins and backends with no sample to
    /// offer leave all state untouched, and read failures in this path
    /// are deliberately swallowed.
    pub fn sample(&mut self) {
        if !self.ready.load(Ordering::Acquire) {
            return;
        }
        let raw = match self.backend.read(self.number) {
            Ok(Some(raw)) => raw,
            Ok(None) | Err(_) => return,
        };

        if raw != self.value {
            trace!(pin = self.number, role = %self.role, from = %self.value, to = %raw,
                   "raw value changed");
            if self.latest == raw {
                let old = self.status;
                self.value = raw;
                self.status = raw == self.active;
                if old != self.status {
                    debug!(pin = self.number, role = %self.role,
                           from = old, to = self.status, "debounced status changed");
                }
            }
        }
        self.latest = raw;
    }

    /// Snapshot the current logical status as the latched control intent.
    pub fn latch(&mut self) {
        self.latched = self.status;
    }

    /// Drive the line to its active level. No-op while unready.
    pub(crate) fn assert_active(&self) {
        self.drive(self.active);
    }

    /// Drive the line to its inactive level. No-op while unready.
    pub(crate) fn deassert(&self) {
        self.drive(self.active.inverse());
    }

    fn drive(&self, level: Level) {
        if !self.ready.load(Ordering::Acquire) {
            return;
        }
        if let Err(err) = self.backend.write(self.number, level) {
            debug!(pin = self.number, %err, "write skipped");
        }
    }

    /// A handle the pulse timer task uses to release the output later
    /// without holding the door.
    pub(crate) fn output_handle(&self) -> OutputHandle {
        OutputHandle {
            number: self.number,
            inactive: self.active.inverse(),
            ready: Arc::clone(&self.ready),
            backend: self.backend.clone(),
        }
    }

    pub fn role(&self) -> PinRole {
        self.role
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    /// Debounced logical state.
    pub fn status(&self) -> bool {
        self.status
    }

    /// Logical state snapshotted at the last pulse.
    pub fn latched(&self) -> bool {
        self.latched
    }

    /// Whether the hardware handle has been acquired.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Detached write access to an output pin's inactive level.
#[derive(Debug, Clone)]
pub(crate) struct OutputHandle {
    number: u8,
    inactive: Level,
    ready: Arc<AtomicBool>,
    backend: AnyGpioBackend,
}

impl OutputHandle {
    pub(crate) fn deassert(&self) {
        if !self.ready.load(Ordering::Acquire) {
            return;
        }
        if let Err(err) = self.backend.write(self.number, self.inactive) {
            debug!(pin = self.number, %err, "deferred de-assert skipped");
        }
    }
}
