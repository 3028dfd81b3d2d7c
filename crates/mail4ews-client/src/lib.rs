//! # mail4ews-client
//!
//! Minimal Exchange Web Services (EWS) client.
//!
//! This crate covers only what is needed to configure a service handle and
//! prove that it can talk to a server:
//!
//! - **Protocol versions**: the `RequestServerVersion` values a client may ask for
//! - **Credentials**: username/password sent as HTTP basic authentication
//! - **Service handle**: endpoint URL, timeout, tracing and credentials
//! - **Folder binding**: a SOAP `GetFolder` call against a well-known folder
//!
//! ## Quick Start
//!
//! ```ignore
//! use mail4ews_client::{ExchangeService, ExchangeVersion, Folder, WebCredentials, WellKnownFolderName};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut service = ExchangeService::with_version(ExchangeVersion::Exchange2010Sp1);
//!     service.set_credentials(WebCredentials::new("user@example.com", "secret"));
//!     service.set_url("https://mail.example.com/EWS/Exchange.asmx")?;
//!
//!     let inbox = Folder::bind(&service, WellKnownFolderName::Inbox).await?;
//!     println!("Inbox has {:?} unread messages", inbox.unread_count);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod credentials;
mod error;
pub mod folder;
mod service;
mod soap;
pub mod version;

pub use credentials::WebCredentials;
pub use error::{Error, Result};
pub use folder::{Folder, WellKnownFolderName};
pub use reqwest::StatusCode;
pub use service::{DEFAULT_TIMEOUT, ExchangeService};
pub use version::{ExchangeVersion, parse_version};
