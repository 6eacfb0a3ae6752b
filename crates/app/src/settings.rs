//! Handles settings for the application.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`config/finance_tracker.toml` unless `--config` is given), environment
//! variables prefixed with `FINANCE_TRACKER` (`__` separates nested keys),
//! then command line flags.
use serde::Deserialize;

use crate::{cli::Cli, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/finance_tracker";
const DEFAULT_DATABASE_FILE: &str = "finance_tracker.sqlite";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite(DEFAULT_DATABASE_FILE.to_string())
    }
}

impl Database {
    /// Connection string for sea-orm; a missing file is created.
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

pub fn load(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let settings = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(cli.config.is_some()))
        .add_source(config::Environment::with_prefix("FINANCE_TRACKER").separator("__"))
        .build()?;
    let mut settings: Settings = settings.try_deserialize()?;

    if cli.memory {
        settings.database = Database::Memory;
    } else if let Some(path) = &cli.database {
        settings.database = Database::Sqlite(path.clone());
    }
    if let Some(level) = &cli.log_level {
        settings.app.level = level.clone();
    }

    Ok(settings)
}
