//! Command line options shared by the binaries.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Parsed command line options.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    /// Raise the default log level to `debug`.
    pub debug: bool,

    /// Additionally log each handled HTTP request.
    pub verbose: bool,

    /// Explicit configuration file, bypassing path resolution.
    pub config: Option<PathBuf>,
}

impl Options {
    /// Parse options from an argument iterator (without the program name).
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" | "-d" => options.debug = true,
                "--verbose" | "-v" => options.verbose = true,
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| format!("{arg} requires a file path"))?;
                    options.config = Some(PathBuf::from(path));
                }
                other => return Err(format!("unknown option: {other}")),
            }
        }
        Ok(options)
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` overrides the level implied by `--debug`.
    pub fn init_tracing(&self) {
        let default = if self.debug { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        Options::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_args() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_all_flags() {
        let options = parse(&["--debug", "--verbose", "--config", "/tmp/doors.json"]).unwrap();
        assert!(options.debug);
        assert!(options.verbose);
        assert_eq!(options.config, Some(PathBuf::from("/tmp/doors.json")));
    }

    #[test]
    fn test_short_flags() {
        let options = parse(&["-d", "-v"]).unwrap();
        assert!(options.debug);
        assert!(options.verbose);
    }

    #[test]
    fn test_config_requires_value() {
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(parse(&["--port"]).is_err());
    }
}
