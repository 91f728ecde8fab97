//! Mock GPIO backend for testing and development.
//!
//! The mock simulates raw line levels in memory so sensor sequences can
//! be scripted deterministically, including the transient glitches the
//! debounce logic must reject and the acquisition failures the retry
//! loop must survive.

use crate::error::{GpioError, Result};
use garage_core::{Level, PinDirection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    /// Injected raw level per line.
    levels: HashMap<u8, Level>,

    /// Every level written to each line, in order.
    written: HashMap<u8, Vec<Level>>,

    /// Acquired lines and their directions.
    acquired: HashMap<u8, PinDirection>,

    /// Remaining forced acquisition failures per line.
    fail_acquire: HashMap<u8, u32>,
}

/// Mock GPIO backend.
///
/// Created together with a [`MockGpioHandle`]; the backend side is what
/// the doors drive, the handle side is what a test scripts.
///
/// # Examples
///
/// ```
/// use garage_gpio::{GpioBackend, MockGpio};
/// use garage_core::{Level, PinDirection};
///
/// let (gpio, handle) = MockGpio::new();
///
/// gpio.acquire(27, PinDirection::Input)?;
/// handle.set_level(27, Level::Low);
/// assert_eq!(gpio.read(27)?, Some(Level::Low));
/// # Ok::<(), garage_gpio::GpioError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MockGpio {
    state: Arc<Mutex<MockState>>,
}

impl MockGpio {
    /// Create a new mock backend and its controlling handle.
    pub fn new() -> (Self, MockGpioHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockGpioHandle { state },
        )
    }
}

impl crate::backend::GpioBackend for MockGpio {
    fn acquire(&self, pin: u8, direction: PinDirection) -> Result<()> {
        let mut state = self.state.lock().expect("mock gpio state poisoned");
        if let Some(remaining) = state.fail_acquire.get_mut(&pin) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(GpioError::acquisition(pin, "simulated permission delay"));
            }
        }
        state.acquired.insert(pin, direction);
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Option<Level>> {
        let state = self.state.lock().expect("mock gpio state poisoned");
        if !state.acquired.contains_key(&pin) {
            return Err(GpioError::NotAcquired { pin });
        }
        Ok(state.levels.get(&pin).copied())
    }

    fn write(&self, pin: u8, level: Level) -> Result<()> {
        let mut state = self.state.lock().expect("mock gpio state poisoned");
        if !state.acquired.contains_key(&pin) {
            return Err(GpioError::NotAcquired { pin });
        }
        state.levels.insert(pin, level);
        state.written.entry(pin).or_default().push(level);
        Ok(())
    }
}

/// Handle for scripting a [`MockGpio`].
///
/// Clones share the same simulated lines as the backend they came from.
#[derive(Debug, Clone)]
pub struct MockGpioHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockGpioHandle {
    /// Inject the raw level subsequent reads of a line will observe.
    pub fn set_level(&self, pin: u8, level: Level) {
        let mut state = self.state.lock().expect("mock gpio state poisoned");
        state.levels.insert(pin, level);
    }

    /// Current raw level of a line, if one was ever injected or written.
    pub fn level(&self, pin: u8) -> Option<Level> {
        let state = self.state.lock().expect("mock gpio state poisoned");
        state.levels.get(&pin).copied()
    }

    /// Every level written to a line, oldest first.
    pub fn writes(&self, pin: u8) -> Vec<Level> {
        let state = self.state.lock().expect("mock gpio state poisoned");
        state.written.get(&pin).cloned().unwrap_or_default()
    }

    /// The most recent level written to a line.
    pub fn last_written(&self, pin: u8) -> Option<Level> {
        self.writes(pin).last().copied()
    }

    /// Make the next `count` acquisitions of a line fail.
    ///
    /// Simulates the delayed-permission behavior seen on Raspbian where
    /// GPIO device files only become writable shortly after export.
    pub fn fail_acquisitions(&self, pin: u8, count: u32) {
        let mut state = self.state.lock().expect("mock gpio state poisoned");
        state.fail_acquire.insert(pin, count);
    }

    /// Whether a line has been successfully acquired.
    pub fn is_acquired(&self, pin: u8) -> bool {
        let state = self.state.lock().expect("mock gpio state poisoned");
        state.acquired.contains_key(&pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GpioBackend;

    #[test]
    fn test_read_requires_acquisition() {
        let (gpio, handle) = MockGpio::new();
        handle.set_level(3, Level::High);

        assert!(matches!(
            gpio.read(3),
            Err(GpioError::NotAcquired { pin: 3 })
        ));

        gpio.acquire(3, PinDirection::Input).unwrap();
        assert_eq!(gpio.read(3).unwrap(), Some(Level::High));
    }

    #[test]
    fn test_read_without_injected_level_yields_no_sample() {
        let (gpio, _handle) = MockGpio::new();
        gpio.acquire(3, PinDirection::Input).unwrap();
        assert_eq!(gpio.read(3).unwrap(), None);
    }

    #[test]
    fn test_writes_are_recorded_in_order() {
        let (gpio, handle) = MockGpio::new();
        gpio.acquire(17, PinDirection::Output).unwrap();

        gpio.write(17, Level::High).unwrap();
        gpio.write(17, Level::Low).unwrap();

        assert_eq!(handle.writes(17), vec![Level::High, Level::Low]);
        assert_eq!(handle.last_written(17), Some(Level::Low));
        assert_eq!(handle.level(17), Some(Level::Low));
    }

    #[test]
    fn test_forced_acquisition_failures_then_success() {
        let (gpio, handle) = MockGpio::new();
        handle.fail_acquisitions(17, 2);

        assert!(gpio.acquire(17, PinDirection::Output).is_err());
        assert!(gpio.acquire(17, PinDirection::Output).is_err());
        assert!(gpio.acquire(17, PinDirection::Output).is_ok());
        assert!(handle.is_acquired(17));
    }

    #[test]
    fn test_handle_and_backend_share_lines() {
        let (gpio, handle) = MockGpio::new();
        gpio.acquire(5, PinDirection::Input).unwrap();

        handle.set_level(5, Level::Low);
        assert_eq!(gpio.read(5).unwrap(), Some(Level::Low));

        handle.set_level(5, Level::High);
        assert_eq!(gpio.read(5).unwrap(), Some(Level::High));
    }
}
