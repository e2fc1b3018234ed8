use std::time::Duration;

use clap::Parser;
use engine::listing::ListConfig;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/quotedesk.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token sent with every request.
    pub token: String,
    /// Role marker of the signed-in user; `"4"` or blank is read-only.
    pub user_type: String,
    pub debounce_ms: u64,
    pub stale_secs: u64,
    pub log_level: String,
    pub log_file: String,
    pub state_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: String::new(),
            user_type: String::new(),
            debounce_ms: 500,
            stale_secs: 300,
            log_level: "info".to_string(),
            log_file: "config/quotedesk.log".to_string(),
            state_path: "config/quotedesk_state.json".to_string(),
        }
    }
}

impl AppConfig {
    pub fn list_config(&self) -> ListConfig {
        ListConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            stale_time: Duration::from_secs(self.stale_secs),
            ..ListConfig::default()
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "quotedesk_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the API token.
    #[arg(long, env = "QUOTEDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Override the role marker.
    #[arg(long)]
    user_type: Option<String>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("QUOTEDESK_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = args.token {
        settings.token = token;
    }
    if let Some(user_type) = args.user_type {
        settings.user_type = user_type;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_list_behaviour() {
        let list = AppConfig::default().list_config();
        assert_eq!(list, ListConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "stale_secs = 60\nuser_type = \"4\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.stale_secs, 60);
        assert_eq!(settings.user_type, "4");
        assert_eq!(settings.debounce_ms, 500);
    }

    #[test]
    fn list_timing_comes_from_config() {
        let settings = AppConfig {
            debounce_ms: 250,
            stale_secs: 30,
            ..AppConfig::default()
        };
        let list = settings.list_config();
        assert_eq!(list.debounce, Duration::from_millis(250));
        assert_eq!(list.stale_time, Duration::from_secs(30));
    }
}
