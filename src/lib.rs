//! Client for the NuOrder wholesale API.
//!
//! Requests are signed with NuOrder's OAuth 1.0 variant (HMAC-SHA1 over an
//! unencoded base string, hex digest). On top of the client sit typed
//! marketplace payloads, an ERP sync and, behind the `cli` feature, the
//! `nuorder` command line tool.

pub mod client;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod parameters;
pub mod sync;
pub mod transport;
pub mod v1;

mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::{Client, Credentials, Payload, Reply, RequestDescriptor, TokenPair, WouldDo};
pub use error::{Error, Result};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
