//! Timeline post handling.
//!
//! Provides:
//! - The persisted record type
//! - Filtering of timeline items and media extraction

pub mod parser;
pub mod record;

pub use parser::{parse_timeline_item, select_best_video, SkipReason};
pub use record::{tweet_url, TweetRecord, TweetUser};
