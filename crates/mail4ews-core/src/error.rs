//! Error types for the connection factory.

use thiserror::Error;

/// Errors surfaced by [`ServiceFactory`](crate::ServiceFactory).
///
/// Client failures are classified once, when they leave the EWS client:
/// a refused connection becomes [`Error::Unreachable`], everything else
/// (DNS, TLS, HTTP status, EWS errors) [`Error::Unauthorized`].
#[derive(Debug, Error)]
pub enum Error {
    /// The host is not a valid endpoint URL.
    #[error("Malformed endpoint: {message}")]
    MalformedEndpoint {
        /// Parse error message.
        message: String,
        /// The parse error.
        #[source]
        source: url::ParseError,
    },

    /// The endpoint refused the connection. Worth retrying later.
    #[error("{message}")]
    Unreachable {
        /// Message of the underlying connection failure.
        message: String,
        /// The underlying client error.
        #[source]
        source: mail4ews_client::Error,
    },

    /// The server was reached but rejected the session (bad credentials,
    /// protocol fault). Not worth retrying.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// A property holds a value of the wrong type.
    #[error("Invalid value {value:?} for property {key}")]
    InvalidProperty {
        /// Property key.
        key: String,
        /// Offending value.
        value: String,
    },
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::MalformedEndpoint {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<mail4ews_client::Error> for Error {
    fn from(err: mail4ews_client::Error) -> Self {
        if let mail4ews_client::Error::ConnectionRefused { message, .. } = &err {
            let message = message.clone();
            return Self::Unreachable {
                message,
                source: err,
            };
        }
        Self::Unauthorized(err.to_string())
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
