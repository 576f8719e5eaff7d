use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating or reading a configuration file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}
