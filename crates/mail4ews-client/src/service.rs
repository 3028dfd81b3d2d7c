//! The EWS service handle.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, trace};
use url::Url;

use crate::credentials::WebCredentials;
use crate::error::{Error, Result};
use crate::version::ExchangeVersion;

/// Timeout applied when none is configured (100 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100_000);

const TRACE_TARGET: &str = "mail4ews::trace";
const USER_AGENT: &str = concat!("mail4ews/", env!("CARGO_PKG_VERSION"));

/// A configured connection to one EWS endpoint.
///
/// Building the handle performs no I/O; requests are only sent by
/// operations such as [`Folder::bind`](crate::Folder::bind).
#[derive(Debug, Clone)]
pub struct ExchangeService {
    version: ExchangeVersion,
    credentials: Option<WebCredentials>,
    url: Option<Url>,
    timeout: Duration,
    trace_enabled: bool,
}

impl Default for ExchangeService {
    fn default() -> Self {
        Self::new()
    }
}

impl ExchangeService {
    /// Creates a service targeting the default server version.
    #[must_use]
    pub fn new() -> Self {
        Self::with_version(ExchangeVersion::default())
    }

    /// Creates a service targeting a specific server version.
    #[must_use]
    pub fn with_version(version: ExchangeVersion) -> Self {
        Self {
            version,
            credentials: None,
            url: None,
            timeout: DEFAULT_TIMEOUT,
            trace_enabled: false,
        }
    }

    /// Server version requested on every call.
    #[must_use]
    pub const fn requested_server_version(&self) -> ExchangeVersion {
        self.version
    }

    /// Sets the request timeout.
    pub const fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Enables or disables tracing of request and response envelopes.
    pub const fn set_trace_enabled(&mut self, enabled: bool) {
        self.trace_enabled = enabled;
    }

    /// Whether envelopes are traced.
    #[must_use]
    pub const fn is_trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    /// Sets the credentials used for every request.
    pub fn set_credentials(&mut self, credentials: WebCredentials) {
        self.credentials = Some(credentials);
    }

    /// Credentials, if set.
    #[must_use]
    pub const fn credentials(&self) -> Option<&WebCredentials> {
        self.credentials.as_ref()
    }

    /// Sets the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `url` is not an absolute URL.
    pub fn set_url(&mut self, url: &str) -> std::result::Result<(), url::ParseError> {
        self.url = Some(Url::parse(url)?);
        Ok(())
    }

    /// Endpoint URL, if set.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    fn http_client(&self) -> Result<Client> {
        Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(Error::Http)
    }

    /// Posts a SOAP envelope and returns the response envelope.
    ///
    /// HTTP 500 is passed through because EWS reports SOAP faults with it.
    pub(crate) async fn post_soap(&self, envelope: String) -> Result<String> {
        let url = self.url.clone().ok_or(Error::NoUrl)?;

        if self.trace_enabled {
            trace!(target: TRACE_TARGET, %url, envelope = %envelope, "EwsRequest");
        }
        debug!("Sending EWS request to {}", url);

        let mut request = self
            .http_client()?
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(envelope);

        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(credentials.login(), Some(credentials.password()));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() && status != reqwest::StatusCode::INTERNAL_SERVER_ERROR {
            debug!("EWS request rejected with HTTP {}", status);
            return Err(Error::Status { status });
        }

        let body = response.text().await?;
        if self.trace_enabled {
            trace!(target: TRACE_TARGET, %status, envelope = %body, "EwsResponse");
        }
        Ok(body)
    }
}
