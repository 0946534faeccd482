//! Configuration structures and loading logic.

use crate::config::modes::{IdOrdering, RunMode};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Long-lived tokens used to bootstrap sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Token used for profile lookups (`GET_ID_X_TOKEN`).
    #[serde(default)]
    pub guest_token: String,

    /// Token of the account whose home timeline is collected (`AUTH_TOKEN`).
    #[serde(default)]
    pub auth_token: String,
}

/// HTTP client and session bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Browser user agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Endpoint probed to obtain session cookies.
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Base URL of the web GraphQL API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Attempts made by the session exchange before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds to wait between session exchange attempts.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            probe_url: default_probe_url(),
            api_base: default_api_base(),
            max_attempts: default_max_attempts(),
            retry_delay_seconds: default_retry_delay(),
        }
    }
}

/// Collection options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// What to collect (profiles, timeline, all).
    #[serde(default)]
    pub mode: RunMode,

    /// JSON file listing the target accounts.
    #[serde(default = "default_accounts_file")]
    pub accounts_file: PathBuf,

    /// Directory receiving one `<handle>.json` per profile.
    #[serde(default = "default_accounts_dir")]
    pub accounts_dir: PathBuf,

    /// Directory receiving one `<YYYY-MM-DD>.json` per day of timeline posts.
    #[serde(default = "default_tweets_dir")]
    pub tweets_dir: PathBuf,

    /// Number of timeline items requested per run.
    #[serde(default = "default_timeline_count")]
    pub timeline_count: u32,

    /// Lower bound of the pause between account fetches.
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound of the pause between account fetches.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// How post ids are compared when sorting the collection.
    #[serde(default)]
    pub id_ordering: IdOrdering,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            accounts_file: default_accounts_file(),
            accounts_dir: default_accounts_dir(),
            tweets_dir: default_tweets_dir(),
            timeline_count: default_timeline_count(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            id_ordering: IdOrdering::default(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string()
}

fn default_probe_url() -> String {
    "https://twitter.com/manifest.json".to_string()
}

fn default_api_base() -> String {
    "https://x.com/i/api/graphql".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    2
}

fn default_accounts_file() -> PathBuf {
    PathBuf::from("accounts.json")
}

fn default_accounts_dir() -> PathBuf {
    PathBuf::from("accounts")
}

fn default_tweets_dir() -> PathBuf {
    PathBuf::from("tweets")
}

fn default_timeline_count() -> u32 {
    100
}

fn default_min_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    3000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Pause bounds between account fetches.
    pub fn delay_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.options.min_delay_ms),
            Duration::from_millis(self.options.max_delay_ms),
        )
    }
}
