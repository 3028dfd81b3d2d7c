//! Connection factory: turns connection parameters and session properties
//! into a configured [`ExchangeService`].

use std::fmt;
use std::sync::Arc;

use mail4ews_client::{ExchangeService, Folder, WebCredentials, WellKnownFolderName};
use tracing::{debug, info};

use crate::config::{Configuration, global_trace_flag};
use crate::defaults::Defaults;
use crate::error::Result;
use crate::properties::SessionProperties;

/// Caller-supplied connection parameters.
#[derive(Clone, Default)]
pub struct ConnectionParams {
    /// Endpoint URL, e.g. `https://mail.example.com/EWS/Exchange.asmx`.
    pub host: String,
    /// Port as handed over by the mail session. Ignored: the URL decides.
    pub port: u16,
    /// Username.
    pub user: Option<String>,
    /// Password.
    pub password: Option<String>,
}

impl ConnectionParams {
    /// Creates parameters for an endpoint, without credentials.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the username.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Builds EWS service handles for mail sessions.
///
/// Holds the defaults loaded once at startup and reuses them for every
/// call. Each call is independent: the factory keeps no reference to the
/// services it hands out.
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    defaults: Arc<Defaults>,
    global_trace: bool,
}

impl ServiceFactory {
    /// Creates a factory over already loaded defaults.
    ///
    /// The global trace switch is read from the environment here, once.
    #[must_use]
    pub fn new(defaults: Arc<Defaults>) -> Self {
        Self {
            defaults,
            global_trace: global_trace_flag(),
        }
    }

    /// Creates a factory over the bundled defaults.
    #[must_use]
    pub fn with_bundled_defaults() -> Self {
        Self::new(Arc::new(Defaults::load()))
    }

    /// Overrides the global trace switch.
    #[must_use]
    pub const fn with_global_trace(mut self, enabled: bool) -> Self {
        self.global_trace = enabled;
        self
    }

    /// The defaults merged under every session.
    #[must_use]
    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Resolves the configuration for a session.
    #[must_use]
    pub fn configuration(&self, session: &SessionProperties) -> Configuration {
        Configuration::resolve(session, &self.defaults)
    }

    /// Builds a service handle without any network I/O.
    ///
    /// Returns `Ok(None)` when `user` or `password` is missing: the session
    /// is not configured for EWS.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEndpoint`](crate::Error::MalformedEndpoint)
    /// if `host` is not a URL, and
    /// [`Error::InvalidProperty`](crate::Error::InvalidProperty) for a
    /// non-numeric timeout.
    pub fn configure_service(
        &self,
        params: &ConnectionParams,
        config: &Configuration,
    ) -> Result<Option<ExchangeService>> {
        let (Some(user), Some(password)) = (&params.user, &params.password) else {
            return Ok(None);
        };

        let mut service = config
            .exchange_version()
            .map_or_else(ExchangeService::new, ExchangeService::with_version);

        if let Some(timeout) = config.connection_timeout()? {
            debug!(
                "setting timeout to {} using connection timeout value",
                timeout.as_millis()
            );
            service.set_timeout(timeout);
        }
        if let Some(timeout) = config.protocol_timeout()? {
            debug!("setting protocol timeout to {} is ignored", timeout.as_millis());
        }

        service.set_trace_enabled(config.trace_enabled(self.global_trace));
        service.set_credentials(WebCredentials::new(user.as_str(), password.as_str()));

        debug!("port {} ignored, endpoint URL is authoritative", params.port);
        service.set_url(&params.host)?;

        Ok(Some(service))
    }

    /// Builds a service handle and, if the session asks for it, verifies it
    /// by binding to the Inbox.
    ///
    /// Returns `Ok(None)` when `user` or `password` is missing. At most one
    /// request is sent and nothing is retried.
    ///
    /// # Errors
    ///
    /// Everything [`configure_service`](Self::configure_service) returns,
    /// plus [`Error::Unreachable`](crate::Error::Unreachable) if the server
    /// refuses the connection and [`Error::Unauthorized`](crate::Error::Unauthorized)
    /// if it rejects the verification call.
    pub async fn build_service(
        &self,
        params: &ConnectionParams,
        session: &SessionProperties,
    ) -> Result<Option<ExchangeService>> {
        let config = self.configuration(session);
        let Some(service) = self.configure_service(params, &config)? else {
            return Ok(None);
        };

        if config.verify_on_connect() {
            debug!("Connection settings : trying to verify them");
            verify_service(&service).await?;
            info!("Connection settings verified.");
        } else {
            info!("Connection settings not verified yet.");
        }

        Ok(Some(service))
    }
}

/// Verifies a service by binding to its Inbox.
///
/// # Errors
///
/// Returns [`Error::Unreachable`](crate::Error::Unreachable) if the connection
/// is refused, [`Error::Unauthorized`](crate::Error::Unauthorized) otherwise.
pub async fn verify_service(service: &ExchangeService) -> Result<()> {
    Folder::bind(service, WellKnownFolderName::Inbox).await?;
    Ok(())
}
