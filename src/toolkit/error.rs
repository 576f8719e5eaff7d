use thiserror::Error;

use super::ToolkitKind;
use crate::model::molecule::SourceKind;
use crate::model::property::Property;

/// Failures while talking to a chemistry toolkit session.
#[derive(Debug, Error)]
pub enum Error {
    /// The interpreter hosting the toolkit could not be started.
    #[error("failed to launch toolkit interpreter '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The session started but the toolkit itself cannot be used.
    #[error("chemistry toolkit is unavailable: {0}")]
    Unavailable(String),

    /// The session ended before answering.
    #[error("toolkit session closed unexpectedly")]
    Closed,

    #[error("I/O with the toolkit session failed")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// A reply could not be decoded or did not belong to the pending request.
    #[error("malformed toolkit message: {0}")]
    Protocol(String),

    /// The toolkit refused to parse the molecule.
    #[error("the toolkit could not read the {kind} input: {message}")]
    InvalidInput { kind: SourceKind, message: String },

    /// The toolkit reported a failure for an operation on a loaded molecule.
    #[error("toolkit operation '{operation}' failed: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },

    #[error("unexpected value for property '{property}': {value}")]
    UnexpectedValue { property: Property, value: String },

    #[error("the '{0}' toolkit is not available in this build")]
    NotCompiled(ToolkitKind),

    #[cfg(feature = "embedded")]
    #[error("embedded Python raised: {0}")]
    Python(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Protocol(e.to_string())
    }
}
