//! Merging a fresh batch into a persisted collection.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::IdOrdering;
use crate::tweet::TweetRecord;

/// Merge `fresh` into `prior`, dedupe by tweet URL and sort newest first.
///
/// Fresh records come last, so they replace stored copies of the same post.
pub fn merge_records(
    prior: Vec<TweetRecord>,
    fresh: Vec<TweetRecord>,
    ordering: IdOrdering,
) -> Vec<TweetRecord> {
    let mut merged = dedupe_last_wins(prior.into_iter().chain(fresh));
    sort_by_id_desc(&mut merged, ordering);
    merged
}

/// Keep one record per tweet URL: the content of the last occurrence at the
/// position of the first.
pub fn dedupe_last_wins<I>(records: I) -> Vec<TweetRecord>
where
    I: IntoIterator<Item = TweetRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<TweetRecord> = Vec::new();

    for record in records {
        match index.get(&record.tweet_url) {
            Some(&pos) => unique[pos] = record,
            None => {
                index.insert(record.tweet_url.clone(), unique.len());
                unique.push(record);
            }
        }
    }

    unique
}

/// Stable sort, highest status id first.
pub fn sort_by_id_desc(records: &mut [TweetRecord], ordering: IdOrdering) {
    records.sort_by(|a, b| compare_ids(b.status_id(), a.status_id(), ordering));
}

/// Compare two status ids.
///
/// `Lexicographic` compares the strings as-is, which misorders ids of
/// different lengths. `Numeric` compares them as unbounded integers.
pub fn compare_ids(a: &str, b: &str, ordering: IdOrdering) -> Ordering {
    match ordering {
        IdOrdering::Lexicographic => a.cmp(b),
        IdOrdering::Numeric => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
    }
}
