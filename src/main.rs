//! x-collector - CLI entry point.

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use x_collector::{
    cli::Args,
    collect::{collect, RunState, SessionConnector},
    config::{validate_config, Config},
    error::Result,
    fs::Store,
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_summary,
        print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(state) => ExitCode::from(state.exit_code() as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<RunState> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    let show_progress = !args.quiet;
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    print_config_summary(
        &config.options.mode.to_string(),
        &config.options.accounts_file.display().to_string(),
        &config.options.accounts_dir.display().to_string(),
        &config.options.tweets_dir.display().to_string(),
    );

    let store = Store::from_config(&config);
    let connector = SessionConnector::new(&config.client, show_progress);
    let state = collect(&config, &store, &connector, Local::now(), show_progress).await?;

    print_run_summary(&state);
    Ok(state)
}
