//! Deduplication module.
//!
//! Provides:
//! - Last-write-wins deduplication by tweet URL
//! - Id ordering of the persisted collection

pub mod merge;

pub use merge::{compare_ids, dedupe_last_wins, merge_records, sort_by_id_desc};
