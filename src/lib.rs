//! x-collector - collect X profiles and timeline posts as local JSON records.
//!
//! # Features
//!
//! - Session bootstrap from a long-lived `auth_token` cookie, with retries
//! - Write-once profile files for a fixed account list
//! - Daily timeline files, deduplicated by post URL and sorted newest first
//! - Filtering of quotes, retweets and stale posts; best-quality video selection
//! - Paced, strictly sequential upstream calls
//!
//! # Example
//!
//! ```no_run
//! use chrono::Local;
//! use x_collector::{ingest_latest, Config, IngestOptions, Store, XApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let api = XApi::connect(&config.client, "your auth_token cookie").await?;
//!     let store = Store::from_config(&config);
//!
//!     let report = ingest_latest(&api, &store, IngestOptions::default(), Local::now()).await?;
//!     println!("{} new posts", report.added);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collect;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fs;
pub mod output;
pub mod tweet;

// Re-exports for convenience
pub use api::{CredentialExchange, RequestContext, SessionCookieSet, UpstreamApi, XApi};
pub use collect::{
    collect, fetch_profile, fetch_profiles, ingest_latest, Connector, IngestOptions, Pacer,
    SessionConnector,
};
pub use config::{Config, RunMode};
pub use error::{Error, Result};
pub use fs::Store;
pub use tweet::TweetRecord;
