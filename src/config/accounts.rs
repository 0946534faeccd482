//! Target account list.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// One entry of the account list file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub twitter_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Account {
    /// Handle taken from the first path segment of the profile URL.
    pub fn handle(&self) -> Option<String> {
        handle_from_url(&self.twitter_url)
    }
}

/// Extract the handle from a profile URL such as `https://x.com/jack`.
pub fn handle_from_url(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Invalid URL format: {} ({})", url, e);
            return None;
        }
    };

    parsed
        .path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Load the ordered account list from a JSON file.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config(format!("Account list not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let accounts: Vec<Account> = serde_json::from_str(&content)?;
    Ok(accounts)
}
