//! Folder binding.

use tracing::debug;

use crate::error::Result;
use crate::service::ExchangeService;
use crate::soap;

/// Folders addressable by a fixed name instead of an id.
///
/// Only the Inbox is needed to check connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownFolderName {
    /// Inbox.
    Inbox,
}

impl WellKnownFolderName {
    /// `DistinguishedFolderId` value used on the wire.
    #[must_use]
    pub const fn distinguished_id(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
        }
    }
}

/// A folder as returned by `GetFolder` with the default shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    /// Server-assigned folder id.
    pub id: String,
    /// Change key of the folder id.
    pub change_key: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Total item count.
    pub total_count: Option<u32>,
    /// Unread item count.
    pub unread_count: Option<u32>,
    /// Number of direct subfolders.
    pub child_folder_count: Option<u32>,
}

impl Folder {
    /// Binds to a well-known folder, fetching its default properties.
    ///
    /// One request, no retries. Useful as a connectivity check: it fails unless the
    /// endpoint is reachable and accepts the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionRefused`](crate::Error::ConnectionRefused)
    /// if the endpoint refuses the connection, [`Error::Http`](crate::Error::Http)
    /// for other transport failures, [`Error::Status`](crate::Error::Status) on an HTTP
    /// rejection (401 for bad credentials) and
    /// [`Error::Soap`](crate::Error::Soap) if the server refuses the call.
    pub async fn bind(service: &ExchangeService, name: WellKnownFolderName) -> Result<Self> {
        debug!("Binding to folder {}", name.distinguished_id());
        let request = soap::get_folder_request(service.requested_server_version(), name);
        let response = service.post_soap(request).await?;
        soap::parse_get_folder_response(&response)
    }
}
