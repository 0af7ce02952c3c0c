//! Configuration management commands for CLI.

use clap::Subcommand;
use daycoach_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Key: minutes-available, work-start, work-end, min-block,
        /// feed-url, ai-enabled, ai-model, ai-api-key
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_or_default();
            match key.as_str() {
                "minutes-available" => config.plan.minutes_available = value.parse()?,
                "work-start" => {
                    daycoach_core::calendar::parse_hhmm(&value)?;
                    config.calendar.work_start = value;
                }
                "work-end" => {
                    daycoach_core::calendar::parse_hhmm(&value)?;
                    config.calendar.work_end = value;
                }
                "min-block" => config.calendar.min_block = value.parse()?,
                "feed-url" => config.calendar.feed_url = Some(value),
                "ai-enabled" => config.ai.enabled = value.parse()?,
                "ai-model" => config.ai.model = value,
                "ai-api-key" => config.ai.api_key = Some(value),
                other => return Err(format!("unknown config key '{other}'").into()),
            }
            config.save()?;
            println!("config updated");
        }
    }
    Ok(())
}
