//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, IdOrdering, RunMode};

/// X profile and timeline collector CLI.
#[derive(Parser, Debug)]
#[command(
    name = "x-collector",
    version,
    about = "Collect X profiles and timeline posts into local JSON files",
    long_about = "Collects profiles for a fixed list of accounts and the latest posts of the \
                  authenticated home timeline.\n\n\
                  Profiles are written once per handle; timeline posts are merged into one \
                  deduplicated file per day."
)]
pub struct Args {
    /// What to collect.
    #[arg(long, value_enum)]
    pub mode: Option<RunModeArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// JSON file listing the target accounts.
    #[arg(long = "accounts-file")]
    pub accounts_file: Option<PathBuf>,

    /// Directory for profile files.
    #[arg(long = "accounts-dir")]
    pub accounts_dir: Option<PathBuf>,

    /// Directory for daily timeline files.
    #[arg(long = "tweets-dir")]
    pub tweets_dir: Option<PathBuf>,

    /// Token used for profile lookups.
    #[arg(long = "guest-token", env = "GET_ID_X_TOKEN", hide_env_values = true)]
    pub guest_token: Option<String>,

    /// Token of the account whose home timeline is collected.
    #[arg(long = "auth-token", env = "AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "X_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Number of timeline items to request.
    #[arg(long)]
    pub count: Option<u32>,

    /// Minimum pause between account fetches, in milliseconds.
    #[arg(long = "min-delay")]
    pub min_delay_ms: Option<u64>,

    /// Maximum pause between account fetches, in milliseconds.
    #[arg(long = "max-delay")]
    pub max_delay_ms: Option<u64>,

    /// Sort post ids numerically instead of as strings.
    #[arg(long)]
    pub numeric_ids: bool,

    /// Hide progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI run mode argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunModeArg {
    /// Profiles, then the timeline.
    All,
    /// Only profiles from the account list.
    Profiles,
    /// Only the home timeline.
    Timeline,
}

impl From<RunModeArg> for RunMode {
    fn from(arg: RunModeArg) -> Self {
        match arg {
            RunModeArg::All => RunMode::All,
            RunModeArg::Profiles => RunMode::Profiles,
            RunModeArg::Timeline => RunMode::Timeline,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.options.mode = mode.into();
        }

        if let Some(token) = self.guest_token {
            config.credentials.guest_token = token;
        }

        if let Some(token) = self.auth_token {
            config.credentials.auth_token = token;
        }

        if let Some(user_agent) = self.user_agent {
            config.client.user_agent = user_agent;
        }

        if let Some(path) = self.accounts_file {
            config.options.accounts_file = path;
        }

        if let Some(dir) = self.accounts_dir {
            config.options.accounts_dir = dir;
        }

        if let Some(dir) = self.tweets_dir {
            config.options.tweets_dir = dir;
        }

        if let Some(count) = self.count {
            config.options.timeline_count = count;
        }

        if let Some(ms) = self.min_delay_ms {
            config.options.min_delay_ms = ms;
        }

        if let Some(ms) = self.max_delay_ms {
            config.options.max_delay_ms = ms;
        }

        if self.numeric_ids {
            config.options.id_ordering = IdOrdering::Numeric;
        }
    }
}
