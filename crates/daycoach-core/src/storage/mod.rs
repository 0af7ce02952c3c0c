mod config;
pub mod database;
pub mod migrations;

pub use config::{AiConfig, CalendarConfig, Config, PlanConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/daycoach[-dev]/` based on DAYCOACH_ENV.
///
/// Set DAYCOACH_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYCOACH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daycoach-dev")
    } else {
        base_dir.join("daycoach")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
