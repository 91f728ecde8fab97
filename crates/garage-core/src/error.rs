use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Boundary errors
    #[error("Duplicate door id: {0}")]
    DuplicateDoor(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error with a custom message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_door_display() {
        let error = Error::DuplicateDoor("main".to_string());
        assert_eq!(error.to_string(), "Duplicate door id: main");
    }

    #[test]
    fn test_config_helper() {
        let error = Error::config("missing doors");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: missing doors");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
    }
}
