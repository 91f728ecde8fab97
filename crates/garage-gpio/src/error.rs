//! Error types for GPIO operations.

/// Result type alias for GPIO operations.
pub type Result<T> = std::result::Result<T, GpioError>;

/// Errors that can occur while talking to a GPIO line.
#[derive(Debug, thiserror::Error)]
pub enum GpioError {
    /// Acquiring the hardware handle failed. On some platforms this is a
    /// transient permission race and the caller is expected to retry.
    #[error("Failed to acquire pin {pin}: {message}")]
    Acquisition { pin: u8, message: String },

    /// The line was used before its handle was acquired.
    #[error("Pin {pin} is not acquired")]
    NotAcquired { pin: u8 },

    /// The underlying GPIO layer is not available at all.
    #[error("GPIO layer unavailable: {message}")]
    Unavailable { message: String },

    /// A read or write on an acquired line failed.
    #[error("I/O failed on pin {pin}: {message}")]
    Io { pin: u8, message: String },
}

impl GpioError {
    /// Create a new acquisition error.
    pub fn acquisition(pin: u8, message: impl Into<String>) -> Self {
        Self::Acquisition {
            pin,
            message: message.into(),
        }
    }

    /// Create a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new I/O error.
    pub fn io(pin: u8, message: impl Into<String>) -> Self {
        Self::Io {
            pin,
            message: message.into(),
        }
    }
}
