//! Upstream API module.
//!
//! This module provides:
//! - Session bootstrap (token → session cookies)
//! - Request signing for authenticated calls
//! - The upstream capability trait and its HTTP client
//! - API payload types

pub mod client;
pub mod context;
pub mod session;
pub mod types;

pub use client::{UpstreamApi, XApi};
pub use context::RequestContext;
pub use session::{CredentialExchange, HttpProbe, ProbeResponse, ProbeTransport, SessionCookieSet};
pub use types::*;
