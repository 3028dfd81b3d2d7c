//! # mail4ews-core
//!
//! Lets a generic mail session talk to Microsoft Exchange through Exchange
//! Web Services instead of POP3/IMAP.
//!
//! This crate provides:
//! - Session property bags and bundled defaults
//! - Configuration resolution (session properties over defaults)
//! - A connection factory producing configured [`ExchangeService`] handles,
//!   optionally verified against the server
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mail4ews_core::{ConnectionParams, Defaults, ServiceFactory, SessionProperties, keys};
//!
//! let factory = ServiceFactory::new(Arc::new(Defaults::load()));
//! let session = SessionProperties::new().with(keys::VERIFY_CONNECTION_ON_CONNECT, "true");
//! let params = ConnectionParams::new("https://mail.example.com/EWS/Exchange.asmx")
//!     .user("alice@example.com")
//!     .password("secret");
//!
//! match factory.build_service(&params, &session).await? {
//!     Some(service) => println!("connected to {:?}", service.url()),
//!     None => println!("no credentials, EWS not configured"),
//! }
//! ```
//!
//! [`ExchangeService`]: mail4ews_client::ExchangeService

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod defaults;
mod error;
pub mod factory;
pub mod properties;

pub use config::{Configuration, TRACE_ENV_VAR, get_configuration, keys};
pub use defaults::Defaults;
pub use error::{Error, Result};
pub use factory::{ConnectionParams, ServiceFactory, verify_service};
pub use properties::SessionProperties;

/// Version of this library.
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
