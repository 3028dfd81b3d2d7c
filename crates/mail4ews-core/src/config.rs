//! Configuration resolution: session properties merged over defaults, and
//! typed access to the keys the connection factory understands.

use std::time::Duration;

use mail4ews_client::{ExchangeVersion, parse_version};
use tracing::info;

use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::properties::SessionProperties;

/// Recognized property keys.
pub mod keys {
    /// Server version name, e.g. `Exchange2010_SP1`.
    pub const EXCHANGE_VERSION: &str = "org.sourceforge.net.javamail4ews.ExchangeVersion";
    /// Trace request/response envelopes (`true`/`false`).
    pub const ENABLE_SERVICE_TRACE: &str =
        "org.sourceforge.net.javamail4ews.util.Util.EnableServiceTrace";
    /// Bind to the Inbox right after building the service (`true`/`false`).
    pub const VERIFY_CONNECTION_ON_CONNECT: &str =
        "org.sourceforge.net.javamail4ews.util.Util.VerifyConnectionOnConnect";
    /// Connection timeout in milliseconds.
    pub const CONNECTION_TIMEOUT: &str = "mail.pop3.connectiontimeout";
    /// Protocol timeout in milliseconds. Read, never applied.
    pub const PROTOCOL_TIMEOUT: &str = "mail.pop3.timeout";
}

/// Environment variable acting as the process-wide trace switch.
pub const TRACE_ENV_VAR: &str = "MAIL4EWS_ENABLE_TRACE";

/// Merges session properties over defaults. The session wins on conflict.
#[must_use]
pub fn get_configuration(session: &SessionProperties, defaults: &Defaults) -> SessionProperties {
    session.merged_with(defaults.properties())
}

/// Reads the process-wide trace switch from [`TRACE_ENV_VAR`].
#[must_use]
pub fn global_trace_flag() -> bool {
    std::env::var(TRACE_ENV_VAR).is_ok_and(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Merged properties with typed accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    properties: SessionProperties,
}

impl Configuration {
    /// Resolves the configuration for one session.
    #[must_use]
    pub fn resolve(session: &SessionProperties, defaults: &Defaults) -> Self {
        Self {
            properties: get_configuration(session, defaults),
        }
    }

    /// The merged properties.
    #[must_use]
    pub const fn properties(&self) -> &SessionProperties {
        &self.properties
    }

    /// Requested server version.
    ///
    /// `None` when unset or unknown; an unknown name is logged and otherwise
    /// ignored so the library default applies.
    #[must_use]
    pub fn exchange_version(&self) -> Option<ExchangeVersion> {
        let name = self.properties.get(keys::EXCHANGE_VERSION).unwrap_or("");
        if name.is_empty() {
            return None;
        }

        let version = parse_version(name);
        if version.is_none() {
            info!(
                "Unknown version for exchange server: '{}' using default : no version specified",
                name
            );
        }
        version
    }

    /// Whether envelope tracing is on: the configured flag or the global one.
    #[must_use]
    pub fn trace_enabled(&self, global: bool) -> bool {
        global || self.flag(keys::ENABLE_SERVICE_TRACE)
    }

    /// Whether the service should be verified right after it is built.
    #[must_use]
    pub fn verify_on_connect(&self) -> bool {
        self.flag(keys::VERIFY_CONNECTION_ON_CONNECT)
    }

    /// Connection timeout, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperty`] if the value is not a whole number
    /// of milliseconds.
    pub fn connection_timeout(&self) -> Result<Option<Duration>> {
        self.millis(keys::CONNECTION_TIMEOUT)
    }

    /// Protocol timeout, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperty`] if the value is not a whole number
    /// of milliseconds.
    pub fn protocol_timeout(&self) -> Result<Option<Duration>> {
        self.millis(keys::PROTOCOL_TIMEOUT)
    }

    fn flag(&self, key: &str) -> bool {
        self.properties.get(key).is_some_and(parse_flag)
    }

    fn millis(&self, key: &str) -> Result<Option<Duration>> {
        self.properties
            .get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| Error::InvalidProperty {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
            })
            .transpose()
    }
}
