//! Run-mode orchestration.

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::api::{UpstreamApi, XApi};
use crate::collect::pacing::Pacer;
use crate::collect::profile::fetch_profiles;
use crate::collect::state::{ProfileStats, RunState};
use crate::collect::timeline::{ingest_latest, IngestOptions};
use crate::config::{load_accounts, ClientConfig, Config, RunMode};
use crate::error::Result;
use crate::fs::Store;
use crate::output::{
    create_spinner, print_error, print_info, print_profile_stats, print_success,
    print_timeline_report,
};

/// Turns a long-lived token into an authenticated upstream client.
#[async_trait]
pub trait Connector: Send + Sync {
    type Api: UpstreamApi;

    async fn connect(&self, token: &str) -> Result<Self::Api>;
}

/// Connects through the HTTP session exchange.
pub struct SessionConnector<'a> {
    client: &'a ClientConfig,
    show_progress: bool,
}

impl<'a> SessionConnector<'a> {
    pub fn new(client: &'a ClientConfig, show_progress: bool) -> Self {
        Self {
            client,
            show_progress,
        }
    }
}

#[async_trait]
impl Connector for SessionConnector<'_> {
    type Api = XApi;

    async fn connect(&self, token: &str) -> Result<XApi> {
        let spinner = self
            .show_progress
            .then(|| create_spinner("Exchanging session cookies..."));
        let api = XApi::connect(self.client, token).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let api = api?;
        print_success("Session established");
        Ok(api)
    }
}

/// Run every collection the configured mode includes, profiles first.
///
/// Each mode builds its own session. A session that cannot be established
/// stops only its own mode and is recorded in the returned state.
pub async fn collect<C>(
    config: &Config,
    store: &Store,
    connector: &C,
    now: DateTime<Local>,
    show_progress: bool,
) -> Result<RunState>
where
    C: Connector + ?Sized,
{
    let mode = config.options.mode;
    let mut state = RunState::default();

    if mode.includes_profiles() {
        let accounts = load_accounts(&config.options.accounts_file)?;
        print_info(&format!("Loaded {} accounts", accounts.len()));

        if accounts.is_empty() {
            state.profiles = Some(ProfileStats::default());
        } else {
            match connector.connect(&config.credentials.guest_token).await {
                Ok(api) => {
                    let (min, max) = config.delay_range();
                    let pacer = Pacer::new(min, max);
                    let stats =
                        fetch_profiles(&api, store, &accounts, &pacer, show_progress).await;
                    print_profile_stats(&stats);
                    state.profiles = Some(stats);
                }
                Err(e) => {
                    print_error(&format!("Profiles not collected: {}", e));
                    state.session_failures.push(RunMode::Profiles);
                }
            }
        }
    }

    if mode.includes_timeline() {
        match connector.connect(&config.credentials.auth_token).await {
            Ok(api) => {
                let options = IngestOptions {
                    count: config.options.timeline_count,
                    id_ordering: config.options.id_ordering,
                };

                match ingest_latest(&api, store, options, now).await {
                    Ok(report) => {
                        print_timeline_report(&report);
                        state.timeline = Some(report);
                    }
                    Err(e) => {
                        print_error(&format!("Timeline batch not merged: {}", e));
                        state.timeline_failed = true;
                    }
                }
            }
            Err(e) => {
                print_error(&format!("Timeline not collected: {}", e));
                state.session_failures.push(RunMode::Timeline);
            }
        }
    }

    Ok(state)
}
