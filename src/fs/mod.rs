//! Filesystem module.
//!
//! Provides:
//! - Output file naming
//! - Profile and timeline storage

pub mod paths;
pub mod store;

pub use paths::{period_key, profile_path, timeline_path};
pub use store::{ProfileWrite, Store};
