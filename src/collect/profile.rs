//! Profile collection.

use std::path::PathBuf;

use serde_json::Value;

use crate::api::UpstreamApi;
use crate::collect::pacing::Pacer;
use crate::collect::state::ProfileStats;
use crate::config::{is_valid_handle, Account};
use crate::error::{Error, Result};
use crate::fs::{ProfileWrite, Store};
use crate::output::create_item_bar;

/// What happened to one handle.
#[derive(Debug)]
pub enum ProfileOutcome {
    /// A new profile file was written.
    Saved(PathBuf),
    /// A profile file already existed; nothing was fetched.
    Skipped,
    /// The payload matched neither accepted shape; nothing was written.
    Invalid,
    /// The upstream call or the write failed.
    Failed(Error),
}

/// Pick the profile object out of a lookup response.
///
/// Accepted shapes, first match wins:
/// - `data.raw.result` with `legacy` and `rest_id`
/// - `data.user` with `legacy` and `restId`
/// - `data.user.result` with `legacy` and `rest_id` (raw GraphQL)
pub fn select_profile(response: &Value) -> Result<&Value> {
    const SHAPES: [(&str, &str); 3] = [
        ("/data/raw/result", "rest_id"),
        ("/data/user", "restId"),
        ("/data/user/result", "rest_id"),
    ];

    SHAPES
        .iter()
        .filter_map(|(pointer, id_field)| {
            let candidate = response.pointer(pointer)?;
            is_profile(candidate, id_field).then_some(candidate)
        })
        .next()
        .ok_or_else(|| Error::Validation("no profile with a legacy block and stable id".into()))
}

fn is_profile(candidate: &Value, id_field: &str) -> bool {
    let has_legacy = candidate.get("legacy").is_some_and(Value::is_object);
    let has_id = match candidate.get(id_field) {
        Some(Value::String(id)) => !id.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    has_legacy && has_id
}

/// Fetch and store the profile of `handle` unless it is already stored.
///
/// Never returns an error: failures are logged and reported as
/// [`ProfileOutcome::Failed`] so the caller can carry on with the batch.
pub async fn fetch_profile<A>(api: &A, store: &Store, handle: &str) -> ProfileOutcome
where
    A: UpstreamApi + ?Sized,
{
    if let Some(outcome) = check_stored(store, handle).await {
        return outcome;
    }
    fetch_and_store(api, store, handle).await
}

/// `Some` when the handle needs no upstream call.
async fn check_stored(store: &Store, handle: &str) -> Option<ProfileOutcome> {
    match store.profile_exists(handle).await {
        Ok(true) => {
            tracing::info!("{} already exists", handle);
            Some(ProfileOutcome::Skipped)
        }
        Ok(false) => None,
        Err(e) => {
            tracing::error!("Cannot check profile file for {}: {}", handle, e);
            Some(ProfileOutcome::Failed(e))
        }
    }
}

async fn fetch_and_store<A>(api: &A, store: &Store, handle: &str) -> ProfileOutcome
where
    A: UpstreamApi + ?Sized,
{
    let response = match api.get_profile_by_handle(handle).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Error fetching {}: {}", handle, e);
            return ProfileOutcome::Failed(e);
        }
    };

    let profile = match select_profile(&response) {
        Ok(profile) => profile,
        Err(e) => {
            let raw = response.to_string();
            tracing::warn!(
                "{} data is empty or invalid format ({}). Response: {}",
                handle,
                e,
                raw.chars().take(500).collect::<String>()
            );
            return ProfileOutcome::Invalid;
        }
    };

    match store.write_profile(handle, profile).await {
        Ok(ProfileWrite::Created(path)) => {
            tracing::info!("{} saved to {}", handle, path.display());
            ProfileOutcome::Saved(path)
        }
        Ok(ProfileWrite::AlreadyExists(_)) => {
            tracing::info!("{} already exists", handle);
            ProfileOutcome::Skipped
        }
        Err(e) => {
            tracing::error!("Error saving {}: {}", handle, e);
            ProfileOutcome::Failed(e)
        }
    }
}

/// Collect profiles for every account, one at a time.
///
/// Accounts whose URL yields no well-formed handle are skipped. The pacer
/// runs between upstream fetches only; skipped accounts cost no pause.
pub async fn fetch_profiles<A>(
    api: &A,
    store: &Store,
    accounts: &[Account],
    pacer: &Pacer,
    show_progress: bool,
) -> ProfileStats
where
    A: UpstreamApi + ?Sized,
{
    let mut stats = ProfileStats::default();
    let mut fetched_any = false;

    let bar = show_progress.then(|| create_item_bar(accounts.len() as u64, "Profiles"));

    for account in accounts {
        if let Some(bar) = &bar {
            bar.inc(1);
        }

        let Some(handle) = account.handle() else {
            tracing::warn!(
                "Could not extract handle for {} from URL: {}",
                account.username,
                account.twitter_url
            );
            stats.missing_handle += 1;
            continue;
        };

        if !is_valid_handle(&handle) {
            tracing::warn!(
                "Skipping {}: '{}' is not a valid handle ({})",
                account.username,
                handle,
                account.twitter_url
            );
            stats.invalid_handle += 1;
            continue;
        }

        let outcome = match check_stored(store, &handle).await {
            Some(outcome) => outcome,
            None => {
                if fetched_any {
                    pacer.pause().await;
                }
                fetched_any = true;
                fetch_and_store(api, store, &handle).await
            }
        };

        match outcome {
            ProfileOutcome::Saved(_) => stats.saved += 1,
            ProfileOutcome::Skipped => stats.skipped += 1,
            ProfileOutcome::Invalid => stats.invalid += 1,
            ProfileOutcome::Failed(e) => {
                tracing::debug!("{} ({}) failed: {}", account.username, handle, e);
                stats.failed += 1;
            }
        }
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    stats
}
