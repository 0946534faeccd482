//! Collection module.
//!
//! This module provides:
//! - Profile collection over the account list
//! - Timeline ingestion into daily collections
//! - Pacing between upstream calls
//! - Run-mode orchestration with one session per mode
//! - Run statistics

pub mod pacing;
pub mod profile;
pub mod run;
pub mod state;
pub mod timeline;

pub use pacing::Pacer;
pub use profile::{fetch_profile, fetch_profiles, select_profile, ProfileOutcome};
pub use run::{collect, Connector, SessionConnector};
pub use state::{IngestReport, ProfileStats, RunState};
pub use timeline::{ingest_latest, IngestOptions};
