//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     x-collector                                       ║
║     Profiles and timeline posts as local JSON         ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(mode: &str, accounts_file: &str, accounts_dir: &str, tweets_dir: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Mode: {}", mode);
    println!("  Account list: {}", accounts_file);
    println!("  Profiles: {}", accounts_dir);
    println!("  Timeline: {}", tweets_dir);
    println!();
}
