//! Timeline ingestion.

use std::collections::HashSet;

use chrono::{DateTime, Local, Utc};

use crate::api::UpstreamApi;
use crate::collect::state::IngestReport;
use crate::config::IdOrdering;
use crate::dedup::merge_records;
use crate::error::Result;
use crate::fs::Store;
use crate::tweet::{parse_timeline_item, SkipReason, TweetRecord};

/// Settings for one ingestion.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub count: u32,
    pub id_ordering: IdOrdering,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            count: 100,
            id_ordering: IdOrdering::default(),
        }
    }
}

/// Fetch the latest timeline batch and merge it into today's collection.
///
/// Fails only when the upstream call fails, in which case nothing is
/// merged. An unreadable collection file is treated as empty.
pub async fn ingest_latest<A>(
    api: &A,
    store: &Store,
    options: IngestOptions,
    now: DateTime<Local>,
) -> Result<IngestReport>
where
    A: UpstreamApi + ?Sized,
{
    tracing::info!("Fetching latest {} timeline items...", options.count);
    let items = api.get_latest_timeline(options.count).await?;
    let fetched = items.len();

    let now_utc = now.with_timezone(&Utc);
    let mut fresh: Vec<TweetRecord> = Vec::new();
    let mut skipped = [0usize; 4];

    for item in &items {
        match parse_timeline_item(item, now_utc) {
            Ok(record) => fresh.push(record),
            Err(reason) => {
                if reason == SkipReason::MissingIdentity {
                    tracing::warn!(
                        "Skipping post due to missing screen name or id (rest_id: {:?})",
                        item.rest_id
                    );
                }
                skipped[reason as usize] += 1;
            }
        }
    }

    tracing::debug!(
        "Filtered batch: {} kept, {} quotes, {} retweets, {} too old, {} without identity",
        fresh.len(),
        skipped[SkipReason::Quote as usize],
        skipped[SkipReason::Retweet as usize],
        skipped[SkipReason::TooOld as usize],
        skipped[SkipReason::MissingIdentity as usize]
    );

    let period = now.date_naive();
    let prior = store.load_timeline(period).await;
    let known: HashSet<String> = prior.iter().map(|r| r.tweet_url.clone()).collect();

    let extracted = fresh.len();
    let added = fresh
        .iter()
        .filter(|r| !known.contains(&r.tweet_url))
        .map(|r| r.tweet_url.as_str())
        .collect::<HashSet<_>>()
        .len();

    let merged = merge_records(prior, fresh, options.id_ordering);
    let path = store.write_timeline(period, &merged).await?;

    tracing::info!(
        "Fetched {} new posts ({} not seen before) into {}. Total unique posts: {}",
        extracted,
        added,
        path.display(),
        merged.len()
    );

    Ok(IngestReport {
        fetched,
        extracted,
        added,
        total: merged.len(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TimelineItem;
    use crate::error::Error;
    use crate::tweet::{tweet_url, TweetUser};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Returns the queued batch on every call, or fails when none is set.
    struct FakeTimeline {
        batch: Mutex<Option<Vec<Value>>>,
    }

    impl FakeTimeline {
        fn new(batch: Vec<Value>) -> Self {
            Self {
                batch: Mutex::new(Some(batch)),
            }
        }

        fn failing() -> Self {
            Self {
                batch: Mutex::new(None),
            }
        }

        fn set(&self, batch: Vec<Value>) {
            *self.batch.lock().unwrap() = Some(batch);
        }
    }

    #[async_trait]
    impl UpstreamApi for FakeTimeline {
        async fn get_profile_by_handle(&self, handle: &str) -> crate::error::Result<Value> {
            Err(Error::Fetch(format!("no profile for {}", handle)))
        }

        async fn get_latest_timeline(&self, _count: u32) -> crate::error::Result<Vec<TimelineItem>> {
            let batch = self.batch.lock().unwrap().clone();
            match batch {
                Some(items) => Ok(items
                    .into_iter()
                    .map(|v| serde_json::from_value(v).unwrap())
                    .collect()),
                None => Err(Error::Fetch("HTTP 500".into())),
            }
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 29, 12, 0, 0).unwrap()
    }

    fn post(id: &str, text: &str, age: Duration) -> Value {
        let created = (now() - age).with_timezone(&Utc);
        json!({
            "rest_id": id,
            "legacy": {
                "id_str": id,
                "full_text": text,
                "created_at": created.format("%a %b %d %H:%M:%S %z %Y").to_string(),
                "is_quote_status": false
            },
            "user": {"screen_name": "alice", "name": "Alice"}
        })
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("accounts"), dir.path().join("tweets"));
        (dir, store)
    }

    fn urls(records: &[TweetRecord]) -> Vec<String> {
        records.iter().map(|r| r.tweet_url.clone()).collect()
    }

    #[tokio::test]
    async fn test_two_posts_into_empty_period() {
        let (_dir, store) = temp_store();
        let api = FakeTimeline::new(vec![
            post("1000", "first", Duration::hours(2)),
            post("2000", "second", Duration::hours(1)),
        ]);

        let report = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();
        assert_eq!(report.fetched, 2);
        assert_eq!(report.added, 2);
        assert_eq!(report.total, 2);

        let saved = store.read_timeline(now().date_naive()).await.unwrap();
        assert_eq!(
            urls(&saved),
            vec![tweet_url("alice", "2000"), tweet_url("alice", "1000")]
        );
    }

    #[tokio::test]
    async fn test_filters_applied() {
        let (_dir, store) = temp_store();
        let mut quote = post("4000", "quoting", Duration::hours(1));
        quote["legacy"]["is_quote_status"] = json!(true);
        let mut anonymous = post("5000", "who", Duration::hours(1));
        anonymous["user"] = json!(null);

        let api = FakeTimeline::new(vec![
            post("1000", "RT @alice hi", Duration::hours(1)),
            post("2000", "old", Duration::days(3)),
            post("3000", "keep me", Duration::hours(1)),
            quote,
            anonymous,
        ]);

        let report = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();
        assert_eq!(report.fetched, 5);
        assert_eq!(report.extracted, 1);

        let saved = store.read_timeline(now().date_naive()).await.unwrap();
        assert_eq!(urls(&saved), vec![tweet_url("alice", "3000")]);
    }

    #[tokio::test]
    async fn test_reingest_same_batch_is_idempotent() {
        let (_dir, store) = temp_store();
        let api = FakeTimeline::new(vec![
            post("1000", "first", Duration::hours(2)),
            post("2000", "second", Duration::hours(1)),
        ]);

        ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();
        let before = store.read_timeline(now().date_naive()).await.unwrap();

        let report = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();
        let after = store.read_timeline(now().date_naive()).await.unwrap();

        assert_eq!(report.added, 0);
        assert_eq!(report.total, 2);
        assert_eq!(urls(&before), urls(&after));
    }

    #[tokio::test]
    async fn test_refetched_post_overwrites_stored_copy() {
        let (_dir, store) = temp_store();
        let api = FakeTimeline::new(vec![post("1000", "original", Duration::hours(2))]);
        ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();

        api.set(vec![
            post("1000", "edited", Duration::hours(2)),
            post("1500", "new", Duration::hours(1)),
        ]);
        let report = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();
        assert_eq!(report.added, 1);

        let saved = store.read_timeline(now().date_naive()).await.unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].full_text.as_deref(), Some("edited"));
    }

    #[tokio::test]
    async fn test_merges_with_prior_file() {
        let (_dir, store) = temp_store();
        let stored = TweetRecord {
            user: TweetUser::default(),
            images: vec!["https://pbs.twimg.com/media/x.jpg".into()],
            videos: Vec::new(),
            tweet_url: tweet_url("bob", "1500"),
            full_text: Some("from earlier run".into()),
            created_at: None,
        };
        store
            .write_timeline(now().date_naive(), &[stored.clone()])
            .await
            .unwrap();

        let api = FakeTimeline::new(vec![post("2000", "fresh", Duration::hours(1))]);
        ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();

        let saved = store.read_timeline(now().date_naive()).await.unwrap();
        assert_eq!(
            urls(&saved),
            vec![tweet_url("alice", "2000"), tweet_url("bob", "1500")]
        );
        assert_eq!(saved[1], stored);
    }

    #[tokio::test]
    async fn test_corrupt_prior_file_degrades_to_empty() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.tweets_dir()).unwrap();
        std::fs::write(store.timeline_path(now().date_naive()), "not json").unwrap();

        let api = FakeTimeline::new(vec![post("1000", "hello", Duration::hours(1))]);
        let report = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap();

        assert_eq!(report.total, 1);
    }

    #[tokio::test]
    async fn test_failed_batch_is_not_merged() {
        let (_dir, store) = temp_store();
        store
            .write_timeline(
                now().date_naive(),
                &[TweetRecord {
                    user: TweetUser::default(),
                    images: Vec::new(),
                    videos: Vec::new(),
                    tweet_url: tweet_url("bob", "1"),
                    full_text: None,
                    created_at: None,
                }],
            )
            .await
            .unwrap();

        let api = FakeTimeline::failing();
        let err = ingest_latest(&api, &store, IngestOptions::default(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));

        let saved = store.read_timeline(now().date_naive()).await.unwrap();
        assert_eq!(saved.len(), 1);
    }
}
