//! Configuration module for x-collector.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Loading the target account list
//! - Configuration validation

pub mod accounts;
pub mod loader;
pub mod modes;
pub mod validation;

pub use accounts::{handle_from_url, load_accounts, Account};
pub use loader::{ClientConfig, Config, CredentialsConfig, OptionsConfig};
pub use modes::{IdOrdering, RunMode};
pub use validation::{is_valid_handle, validate_config};
