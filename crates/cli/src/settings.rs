// Runtime settings: defaults, then medslot.toml (or --config), then MEDSLOT_* env

use config::{Config, ConfigError, Environment, File};
use medslot_core::application::constants::{DEFAULT_DAILY_LIMIT, DEFAULT_LOCK_TIMEOUT};
use medslot_core::application::EngineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "~/.medslot/medslot.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite URL or file path; `~` is expanded
    pub database_url: String,
    pub daily_limit: u32,
    /// 0 waits for the engine lock indefinitely
    pub lock_timeout_ms: u64,
    /// `pretty` or `json`
    pub log_format: String,
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let lock_timeout_ms = i64::try_from(DEFAULT_LOCK_TIMEOUT.as_millis()).unwrap_or(i64::MAX);

        let mut builder = Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("daily_limit", i64::from(DEFAULT_DAILY_LIMIT))?
            .set_default("lock_timeout_ms", lock_timeout_ms)?
            .set_default("log_format", "pretty")?;

        builder = match config_path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("medslot").required(false)),
        };

        builder
            .add_source(Environment::with_prefix("MEDSLOT").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Database URL with `~` expanded
    pub fn resolved_database_url(&self) -> String {
        shellexpand::tilde(&self.database_url).into_owned()
    }

    /// Directory that must exist before SQLite can create the file, if any
    pub fn database_dir(&self) -> Option<PathBuf> {
        let url = self.resolved_database_url();
        if url.contains(":memory:") || url.contains("mode=memory") {
            return None;
        }
        let path = url
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);
        Path::new(path)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            daily_limit: self.daily_limit,
            lock_timeout: match self.lock_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}
