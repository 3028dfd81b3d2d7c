//! EWS protocol versions.

use std::fmt;

/// Server version a request is written against.
///
/// Sent in the `RequestServerVersion` SOAP header. The server answers using
/// the schema of the requested version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExchangeVersion {
    /// Exchange 2007 Service Pack 1.
    Exchange2007Sp1,
    /// Exchange 2010.
    Exchange2010,
    /// Exchange 2010 Service Pack 1.
    Exchange2010Sp1,
    /// Exchange 2010 Service Pack 2.
    #[default]
    Exchange2010Sp2,
}

impl ExchangeVersion {
    /// All known versions, oldest first.
    pub const ALL: [Self; 4] = [
        Self::Exchange2007Sp1,
        Self::Exchange2010,
        Self::Exchange2010Sp1,
        Self::Exchange2010Sp2,
    ];

    /// Schema name as it appears on the wire and in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange2007Sp1 => "Exchange2007_SP1",
            Self::Exchange2010 => "Exchange2010",
            Self::Exchange2010Sp1 => "Exchange2010_SP1",
            Self::Exchange2010Sp2 => "Exchange2010_SP2",
        }
    }
}

impl fmt::Display for ExchangeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a version by its exact schema name (case-sensitive).
///
/// Never fails: unknown names yield `None` and the caller picks a fallback.
#[must_use]
pub fn parse_version(name: &str) -> Option<ExchangeVersion> {
    ExchangeVersion::ALL
        .into_iter()
        .find(|version| version.as_str() == name)
}
