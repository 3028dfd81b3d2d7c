//! Error types for EWS operations.

use std::error::Error as StdError;
use std::io;

/// Result type alias for EWS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// EWS client error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The endpoint actively refused the TCP connection.
    #[error("Connection refused: {message}")]
    ConnectionRefused {
        /// Message of the refused socket's `io::Error`.
        message: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Any other HTTP transport error (DNS, TLS, timeouts, ...).
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("Server returned HTTP {status}")]
    Status {
        /// Response status (401 for rejected credentials).
        status: reqwest::StatusCode,
    },

    /// Server answered with an EWS error response or a SOAP fault.
    #[error("EWS error {code}: {message}")]
    Soap {
        /// EWS response code (e.g. `ErrorAccessDenied`) or SOAP fault code.
        code: String,
        /// Human-readable message text.
        message: String,
    },

    /// Response envelope could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// No endpoint URL was set on the service.
    #[error("No endpoint URL set")]
    NoUrl,
}

impl Error {
    /// Returns true if the endpoint refused the connection.
    #[must_use]
    pub const fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(message) = refused_cause(&err).map(ToString::to_string) {
            return Self::ConnectionRefused {
                message,
                source: err,
            };
        }
        Self::Http(err)
    }
}

/// Finds an `io::Error` of kind `ConnectionRefused` in the source chain.
fn refused_cause<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a io::Error> {
    let mut cause = Some(err);
    while let Some(current) = cause {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return Some(io_err);
            }
        }
        cause = current.source();
    }
    None
}
