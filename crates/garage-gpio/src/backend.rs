//! GPIO backend trait and the enum wrapper used for dispatch.

use crate::error::Result;
use crate::mock::MockGpio;
use crate::stub::StubGpio;
use garage_core::{Level, PinDirection};
use tracing::{error, info};

/// Capability interface for raw GPIO access.
///
/// A backend owns whatever platform handles are needed to drive numbered
/// lines; callers never see those handles. All operations are quick
/// register-level affairs and therefore synchronous; the timing
/// concerns (debounce, pulse width, retry backoff) live entirely in the
/// door layer on top of this trait.
///
/// # Sampling Semantics
///
/// [`read`](GpioBackend::read) returns `Ok(None)` when the backend has
/// no sample to offer (the software stub always answers this way, and
/// the mock does so for lines no level was injected for). Callers treat
/// a missing sample as "leave the debounced state untouched".
pub trait GpioBackend {
    /// Acquire the hardware handle for a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the line. On Raspbian
    /// class systems this can be a transient permission race shortly
    /// after boot, so callers retry on a fixed backoff.
    fn acquire(&self, pin: u8, direction: PinDirection) -> Result<()>;

    /// Read the current raw level of an acquired line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line was never acquired or the read
    /// itself fails.
    fn read(&self, pin: u8) -> Result<Option<Level>>;

    /// Drive an acquired output line to a raw level.
    ///
    /// # Errors
    ///
    /// Returns an error if the line was never acquired or the write
    /// itself fails.
    fn write(&self, pin: u8, level: Level) -> Result<()>;
}

/// Enum wrapper for GPIO backend dispatch.
///
/// Keeps dispatch concrete (no trait objects), supports the
/// feature-gated hardware variant, and is cheap to clone: every
/// variant shares its interior state, so a clone handed to a spawned
/// task drives the same lines.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyGpioBackend {
    /// Scriptable in-memory backend for tests.
    Mock(MockGpio),

    /// Software-only fallback: always ready, never performs I/O.
    Stub(StubGpio),

    /// Real hardware access through `rppal`.
    #[cfg(feature = "hardware-rppal")]
    Rppal(crate::rppal::RppalGpio),
}

impl AnyGpioBackend {
    /// Pick the best backend available on this host.
    ///
    /// With the `hardware-rppal` feature enabled this tries the real
    /// GPIO layer first. When no hardware layer can be opened (or none
    /// is compiled in) it logs a single error and falls back to the
    /// software stub so the controller still runs for development.
    pub fn detect() -> Self {
        #[cfg(feature = "hardware-rppal")]
        {
            match crate::rppal::RppalGpio::new() {
                Ok(gpio) => {
                    info!("using rppal GPIO backend");
                    return Self::Rppal(gpio);
                }
                Err(err) => {
                    error!(%err, "cannot access GPIO layer, falling back to simulated pins");
                    return Self::Stub(StubGpio::new());
                }
            }
        }
        #[cfg(not(feature = "hardware-rppal"))]
        {
            error!("no GPIO layer compiled in, using simulated pins");
            Self::Stub(StubGpio::new())
        }
    }
}

impl GpioBackend for AnyGpioBackend {
    fn acquire(&self, pin: u8, direction: PinDirection) -> Result<()> {
        match self {
            Self::Mock(backend) => backend.acquire(pin, direction),
            Self::Stub(backend) => backend.acquire(pin, direction),
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(backend) => backend.acquire(pin, direction),
        }
    }

    fn read(&self, pin: u8) -> Result<Option<Level>> {
        match self {
            Self::Mock(backend) => backend.read(pin),
            Self::Stub(backend) => backend.read(pin),
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(backend) => backend.read(pin),
        }
    }

    fn write(&self, pin: u8, level: Level) -> Result<()> {
        match self {
            Self::Mock(backend) => backend.write(pin, level),
            Self::Stub(backend) => backend.write(pin, level),
            #[cfg(feature = "hardware-rppal")]
            Self::Rppal(backend) => backend.write(pin, level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_dispatch_reaches_mock() {
        let (mock, handle) = MockGpio::new();
        let backend = AnyGpioBackend::Mock(mock);

        backend.acquire(5, PinDirection::Input).unwrap();
        handle.set_level(5, Level::Low);
        assert_eq!(backend.read(5).unwrap(), Some(Level::Low));
    }

    #[test]
    fn test_enum_dispatch_reaches_stub() {
        let backend = AnyGpioBackend::Stub(StubGpio::new());

        backend.acquire(5, PinDirection::Output).unwrap();
        backend.write(5, Level::High).unwrap();
        assert_eq!(backend.read(5).unwrap(), None);
    }

    #[test]
    fn test_clone_shares_state() {
        let (mock, handle) = MockGpio::new();
        let backend = AnyGpioBackend::Mock(mock);
        let clone = backend.clone();

        backend.acquire(9, PinDirection::Output).unwrap();
        clone.write(9, Level::High).unwrap();
        assert_eq!(handle.last_written(9), Some(Level::High));
    }
}
