//! Software-only GPIO stub.
//!
//! Used when no real GPIO layer is available (missing driver, developer
//! laptop). Every line acquires successfully, writes are discarded and
//! reads never produce a sample, so sensors simply stay at their initial
//! state, doors report "unknown", and the controller keeps running
//! without hardware.

use crate::error::Result;
use garage_core::{Level, PinDirection};
use tracing::trace;

/// No-op GPIO backend that always reports ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGpio;

impl StubGpio {
    pub fn new() -> Self {
        Self
    }
}

impl crate::backend::GpioBackend for StubGpio {
    fn acquire(&self, pin: u8, direction: PinDirection) -> Result<()> {
        trace!(pin, %direction, "stub acquire");
        Ok(())
    }

    fn read(&self, _pin: u8) -> Result<Option<Level>> {
        Ok(None)
    }

    fn write(&self, pin: u8, level: Level) -> Result<()> {
        trace!(pin, %level, "stub write discarded");
        Ok(())
    }
}
