//! Statistics reporting.

use console::style;

use crate::collect::{IngestReport, ProfileStats, RunState};
use crate::config::RunMode;

/// Print statistics for a profile pass.
pub fn print_profile_stats(stats: &ProfileStats) {
    println!();
    println!("{}", style("Profiles:").bold());
    println!("  Saved:    {}", stats.saved);
    println!("  Skipped:  {} (already stored)", stats.skipped);
    if stats.invalid > 0 {
        println!("  Invalid:  {}", style(stats.invalid).yellow());
    }
    if stats.missing_handle > 0 {
        println!("  No handle: {}", style(stats.missing_handle).yellow());
    }
    if stats.invalid_handle > 0 {
        println!("  Bad handle: {}", style(stats.invalid_handle).yellow());
    }
    if stats.failed > 0 {
        println!("  Failed:   {}", style(stats.failed).red());
    }
    println!("  Total:    {} accounts", stats.total());
}

/// Print the outcome of a timeline ingestion.
pub fn print_timeline_report(report: &IngestReport) {
    println!();
    println!("{}", style("Timeline:").bold());
    println!("  Fetched:  {} items", report.fetched);
    println!("  Kept:     {} original posts", report.extracted);
    println!("  New:      {}", style(report.added).green());
    println!("  Total:    {} unique posts in {}", report.total, report.path.display());
}

/// Print the summary of a whole run.
pub fn print_run_summary(state: &RunState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Summary:").bold());
    match &state.profiles {
        Some(p) => println!(
            "  Profiles: {} saved, {} skipped, {} with problems",
            style(p.saved).green(),
            p.skipped,
            style(p.problems()).yellow()
        ),
        None if state.session_failed(RunMode::Profiles) => {
            println!("  Profiles: {}", style("no session").red())
        }
        None => println!("  Profiles: not collected"),
    }
    match (&state.timeline, state.timeline_failed) {
        (None, _) if state.session_failed(RunMode::Timeline) => {
            println!("  Timeline: {}", style("no session").red())
        }
        (Some(t), _) => println!(
            "  Timeline: {} new, {} total",
            style(t.added).green(),
            t.total
        ),
        (None, true) => println!("  Timeline: {}", style("failed").red()),
        (None, false) => println!("  Timeline: not collected"),
    }
    println!("{}", style("═".repeat(50)).dim());
}
