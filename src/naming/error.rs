use std::io;

use thiserror::Error;

use super::Provider;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid naming endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("could not resolve host '{host}'")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("connection to {address} failed")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("request to {host} timed out")]
    Timeout { host: String },

    #[error("I/O error while talking to {host}")]
    Io {
        host: String,
        #[source]
        source: io::Error,
    },

    #[cfg(feature = "tls")]
    #[error("TLS error with {host}: {message}")]
    Tls { host: String, message: String },

    #[error("https endpoints need the `tls` feature (requested {host})")]
    TlsNotCompiled { host: String },

    #[error("malformed HTTP response: {0}")]
    MalformedResponse(String),

    #[error("{provider} answered with HTTP status {status}")]
    Status { provider: Provider, status: u16 },
}

impl Error {
    /// Whether a fresh attempt might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Connect { .. } | Error::Timeout { .. } | Error::Io { .. }
        )
    }
}
