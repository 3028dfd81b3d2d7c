//! Default session properties.

use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::properties::SessionProperties;

/// The bundled defaults resource.
pub const BUNDLED_DEFAULTS: &str = include_str!("../resources/defaults.toml");

/// Immutable default properties, merged under every session's properties.
///
/// Produced by one explicit load step (typically at startup) and then
/// shared, e.g. behind an `Arc`. Loading never fails: an unreadable or
/// malformed source is logged and yields empty defaults.
///
/// The source is TOML. Nested tables flatten to dotted keys, so
/// `[mail.pop3]` + `timeout = 5000` and `"mail.pop3.timeout" = 5000` are
/// the same property. Scalars are stored in their string form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    properties: SessionProperties,
}

impl Defaults {
    /// No defaults at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the defaults bundled with this crate.
    ///
    /// This is the startup load step and logs the library banner.
    #[must_use]
    pub fn load() -> Self {
        log_banner();
        Self::parse(BUNDLED_DEFAULTS, "bundled resource")
    }

    /// Loads defaults from a TOML file, in place of the bundled ones.
    ///
    /// Like [`load`](Self::load), this is a startup step and logs the
    /// library banner.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        log_banner();
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::parse(&source, &path.display().to_string()),
            Err(e) => {
                error!("Error loading EWS bridge default properties from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Loads defaults from TOML text.
    #[must_use]
    pub fn from_toml_str(source: &str) -> Self {
        Self::parse(source, "inline source")
    }

    fn parse(source: &str, origin: &str) -> Self {
        let table = match toml::from_str::<toml::Table>(source) {
            Ok(table) => table,
            Err(e) => {
                error!("Error loading EWS bridge default properties from {}: {}", origin, e);
                return Self::empty();
            }
        };

        let mut properties = SessionProperties::new();
        flatten("", &table, &mut properties);
        debug!("Loaded {} default properties from {}", properties.len(), origin);
        Self { properties }
    }

    /// The default properties.
    #[must_use]
    pub const fn properties(&self) -> &SessionProperties {
        &self.properties
    }
}

impl From<SessionProperties> for Defaults {
    fn from(properties: SessionProperties) -> Self {
        Self { properties }
    }
}

fn log_banner() {
    info!(
        "mail4ews {} loaded, uses Microsoft(R) software",
        crate::version()
    );
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut SessionProperties) {
    for (key, value) in table {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            toml::Value::Table(nested) => flatten(&key, nested, out),
            toml::Value::String(s) => {
                out.insert(key, s.clone());
            }
            toml::Value::Integer(i) => {
                out.insert(key, i.to_string());
            }
            toml::Value::Float(f) => {
                out.insert(key, f.to_string());
            }
            toml::Value::Boolean(b) => {
                out.insert(key, b.to_string());
            }
            toml::Value::Datetime(d) => {
                out.insert(key, d.to_string());
            }
            toml::Value::Array(_) => warn!("Ignoring array-valued default property {}", key),
        }
    }
}
