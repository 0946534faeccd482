//! JSON record storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs::paths::{profile_path, timeline_path};
use crate::tweet::TweetRecord;

/// Result of writing a profile file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileWrite {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Profile and timeline files on disk.
#[derive(Debug, Clone)]
pub struct Store {
    accounts_dir: PathBuf,
    tweets_dir: PathBuf,
}

impl Store {
    pub fn new(accounts_dir: impl Into<PathBuf>, tweets_dir: impl Into<PathBuf>) -> Self {
        Self {
            accounts_dir: accounts_dir.into(),
            tweets_dir: tweets_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.options.accounts_dir.clone(),
            config.options.tweets_dir.clone(),
        )
    }

    pub fn accounts_dir(&self) -> &Path {
        &self.accounts_dir
    }

    pub fn tweets_dir(&self) -> &Path {
        &self.tweets_dir
    }

    pub fn profile_path(&self, handle: &str) -> Result<PathBuf> {
        profile_path(&self.accounts_dir, handle)
    }

    pub fn timeline_path(&self, period: NaiveDate) -> PathBuf {
        timeline_path(&self.tweets_dir, period)
    }

    pub async fn profile_exists(&self, handle: &str) -> Result<bool> {
        let path = self.profile_path(handle)?;
        Ok(fs::try_exists(&path).await?)
    }

    /// Write a profile file unless one already exists.
    ///
    /// The file is created with create-new semantics, so an existing
    /// profile is never overwritten.
    pub async fn write_profile(&self, handle: &str, profile: &Value) -> Result<ProfileWrite> {
        let path = self.profile_path(handle)?;
        let content = serde_json::to_vec_pretty(profile)?;

        fs::create_dir_all(&self.accounts_dir).await?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(ProfileWrite::AlreadyExists(path));
            }
            Err(e) => return Err(e.into()),
        };

        let written = async {
            file.write_all(&content).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            // Never leave a truncated profile behind
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        Ok(ProfileWrite::Created(path))
    }

    /// Read the timeline collection of a period.
    ///
    /// A missing or blank file is an empty collection; anything unreadable
    /// is reported as [`Error::PersistenceRead`].
    pub async fn read_timeline(&self, period: NaiveDate) -> Result<Vec<TweetRecord>> {
        let path = self.timeline_path(period);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::PersistenceRead {
                    path,
                    message: e.to_string(),
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| Error::PersistenceRead {
            path,
            message: e.to_string(),
        })
    }

    /// Read the timeline collection, treating unreadable files as empty.
    pub async fn load_timeline(&self, period: NaiveDate) -> Vec<TweetRecord> {
        match self.read_timeline(period).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("{}. Starting from an empty collection", e);
                Vec::new()
            }
        }
    }

    /// Replace the timeline collection of a period.
    pub async fn write_timeline(&self, period: NaiveDate, records: &[TweetRecord]) -> Result<PathBuf> {
        let path = self.timeline_path(period);
        let content = serde_json::to_vec_pretty(records)?;

        fs::create_dir_all(&self.tweets_dir).await?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &content).await?;
        fs::rename(&tmp, &path).await?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweet::{tweet_url, TweetUser};
    use serde_json::json;

    fn store(dir: &Path) -> Store {
        Store::new(dir.join("accounts"), dir.join("tweets"))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
    }

    fn record(id: &str) -> TweetRecord {
        TweetRecord {
            user: TweetUser::default(),
            images: Vec::new(),
            videos: Vec::new(),
            tweet_url: tweet_url("alice", id),
            full_text: Some("text".into()),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_profile_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(!store.profile_exists("jack").await.unwrap());

        let first = store
            .write_profile("jack", &json!({"rest_id": "12", "legacy": {"name": "first"}}))
            .await
            .unwrap();
        assert!(matches!(first, ProfileWrite::Created(_)));
        assert!(store.profile_exists("jack").await.unwrap());

        let second = store
            .write_profile("jack", &json!({"rest_id": "12", "legacy": {"name": "second"}}))
            .await
            .unwrap();
        assert!(matches!(second, ProfileWrite::AlreadyExists(_)));

        let saved: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("accounts/jack.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["legacy"]["name"], "first");
    }

    #[tokio::test]
    async fn test_profile_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store
            .write_profile("jack", &json!({"rest_id": "12"}))
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("accounts/jack.json")).unwrap();
        assert_eq!(text, "{\n  \"rest_id\": \"12\"\n}");
    }

    #[tokio::test]
    async fn test_missing_timeline_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(dir.path()).read_timeline(day()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_timeline_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        std::fs::create_dir_all(store.tweets_dir()).unwrap();
        std::fs::write(store.timeline_path(day()), "[{\"tweetUrl\": ").unwrap();

        assert!(matches!(
            store.read_timeline(day()).await,
            Err(Error::PersistenceRead { .. })
        ));
        assert!(store.load_timeline(day()).await.is_empty());
    }

    #[tokio::test]
    async fn test_timeline_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.write_timeline(day(), &[record("1"), record("2")]).await.unwrap();
        store.write_timeline(day(), &[record("3")]).await.unwrap();

        let records = store.read_timeline(day()).await.unwrap();
        assert_eq!(records, vec![record("3")]);
        assert!(!store.timeline_path(day()).with_extension("json.tmp").exists());
    }
}
