//! Run statistics.

use std::path::PathBuf;

use crate::config::RunMode;
use crate::error::exit_codes;

/// Counters for one profile collection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub saved: u64,
    pub skipped: u64,
    pub invalid: u64,
    pub failed: u64,
    pub missing_handle: u64,
    pub invalid_handle: u64,
}

impl ProfileStats {
    pub fn total(&self) -> u64 {
        self.saved
            + self.skipped
            + self.invalid
            + self.failed
            + self.missing_handle
            + self.invalid_handle
    }

    /// Accounts that produced no file this run for a reason worth reporting.
    pub fn problems(&self) -> u64 {
        self.invalid + self.failed + self.missing_handle + self.invalid_handle
    }
}

/// Outcome of one timeline ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Items returned by the upstream batch.
    pub fetched: usize,
    /// Items that passed filtering.
    pub extracted: usize,
    /// Identities not present in the collection before this run.
    pub added: usize,
    /// Size of the collection after the merge.
    pub total: usize,
    pub path: PathBuf,
}

/// Statistics across a whole run.
#[derive(Debug, Default)]
pub struct RunState {
    pub profiles: Option<ProfileStats>,
    pub timeline: Option<IngestReport>,
    pub timeline_failed: bool,
    /// Modes whose session could not be established.
    pub session_failures: Vec<RunMode>,
}

impl RunState {
    pub fn has_failures(&self) -> bool {
        self.timeline_failed || self.profiles.as_ref().is_some_and(|p| p.failed > 0)
    }

    pub fn session_failed(&self, mode: RunMode) -> bool {
        self.session_failures.contains(&mode)
    }

    /// Process exit code summarising the run.
    pub fn exit_code(&self) -> i32 {
        if !self.session_failures.is_empty() {
            exit_codes::AUTH_ERROR
        } else if self.has_failures() {
            exit_codes::SOME_ITEMS_FAILED
        } else {
            exit_codes::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_totals() {
        let stats = ProfileStats {
            saved: 2,
            skipped: 3,
            invalid: 1,
            failed: 1,
            missing_handle: 1,
            invalid_handle: 2,
        };
        assert_eq!(stats.total(), 10);
        assert_eq!(stats.problems(), 5);
    }

    #[test]
    fn test_run_failures() {
        let mut state = RunState::default();
        assert!(!state.has_failures());

        state.profiles = Some(ProfileStats {
            invalid: 4,
            ..Default::default()
        });
        assert!(!state.has_failures());

        state.timeline_failed = true;
        assert!(state.has_failures());
        assert_eq!(state.exit_code(), exit_codes::SOME_ITEMS_FAILED);
    }

    #[test]
    fn test_session_failure_wins_exit_code() {
        let mut state = RunState {
            timeline_failed: true,
            ..Default::default()
        };
        state.session_failures.push(RunMode::Profiles);

        assert!(state.session_failed(RunMode::Profiles));
        assert!(!state.session_failed(RunMode::Timeline));
        assert_eq!(state.exit_code(), exit_codes::AUTH_ERROR);
        assert_eq!(RunState::default().exit_code(), exit_codes::SUCCESS);
    }
}
