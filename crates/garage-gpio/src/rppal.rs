//! Real GPIO access through the `rppal` crate (Raspberry Pi).

use crate::error::{GpioError, Result};
use garage_core::{Level, PinDirection};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Line {
    Input(InputPin),
    Output(OutputPin),
}

/// GPIO backend backed by the Raspberry Pi peripheral registers.
#[derive(Debug, Clone)]
pub struct RppalGpio {
    chip: Gpio,
    lines: Arc<Mutex<HashMap<u8, Line>>>,
}

impl RppalGpio {
    /// Open the GPIO peripheral.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral cannot be mapped, typically
    /// because the process lacks permission or is not running on a Pi.
    pub fn new() -> Result<Self> {
        let chip = Gpio::new().map_err(|err| GpioError::unavailable(err.to_string()))?;
        Ok(Self {
            chip,
            lines: Arc::new(Mutex::new(HashMap::new())),
        })
    }
}

fn to_rppal(level: Level) -> rppal::gpio::Level {
    match level {
        Level::Low => rppal::gpio::Level::Low,
        Level::High => rppal::gpio::Level::High,
    }
}

fn from_rppal(level: rppal::gpio::Level) -> Level {
    match level {
        rppal::gpio::Level::Low => Level::Low,
        rppal::gpio::Level::High => Level::High,
    }
}

impl crate::backend::GpioBackend for RppalGpio {
    fn acquire(&self, pin: u8, direction: PinDirection) -> Result<()> {
        let raw = self
            .chip
            .get(pin)
            .map_err(|err| GpioError::acquisition(pin, err.to_string()))?;
        let line = match direction {
            // Position switches short to ground, so inputs are pulled up.
            PinDirection::Input => Line::Input(raw.into_input_pullup()),
            PinDirection::Output => Line::Output(raw.into_output()),
        };
        self.lines
            .lock()
            .expect("gpio line table poisoned")
            .insert(pin, line);
        Ok(())
    }

    fn read(&self, pin: u8) -> Result<Option<Level>> {
        let lines = self.lines.lock().expect("gpio line table poisoned");
        match lines.get(&pin) {
            Some(Line::Input(input)) => Ok(Some(from_rppal(input.read()))),
            Some(Line::Output(_)) => Err(GpioError::io(pin, "read on output line")),
            None => Err(GpioError::NotAcquired { pin }),
        }
    }

    fn write(&self, pin: u8, level: Level) -> Result<()> {
        let mut lines = self.lines.lock().expect("gpio line table poisoned");
        match lines.get_mut(&pin) {
            Some(Line::Output(output)) => {
                output.write(to_rppal(level));
                Ok(())
            }
            Some(Line::Input(_)) => Err(GpioError::io(pin, "write on input line")),
            None => Err(GpioError::NotAcquired { pin }),
        }
    }
}
