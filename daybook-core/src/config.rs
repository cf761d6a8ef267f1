//! Daybook configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DURATION_MINS, DEFAULT_EVENT_TITLE, DEFAULT_SLOT_MINUTES,
    DEFAULT_START_ROUNDING_MINS,
};
use crate::error::{DaybookError, DaybookResult};
use crate::layout::Timeline;

static FALLBACK_DATA_DIR: &str = "~/.daybook";

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("daybook"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

/// Configuration at ~/.config/daybook/config.toml
///
/// Every field is optional in the file. `DAYBOOK_*` environment variables
/// (e.g. `DAYBOOK_SLOT_MINUTES=30`) override it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DaybookConfig {
    /// Where the event collection is stored
    pub data_dir: PathBuf,

    /// Timeline granularity
    pub slot_minutes: u32,

    pub default_duration_mins: u32,

    pub default_title: String,

    /// New events start at "now" rounded up to this many minutes
    pub start_rounding_mins: u32,
}

impl Default for DaybookConfig {
    fn default() -> Self {
        DaybookConfig {
            data_dir: default_data_dir(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
            default_duration_mins: DEFAULT_DURATION_MINS,
            default_title: DEFAULT_EVENT_TITLE.to_string(),
            start_rounding_mins: DEFAULT_START_ROUNDING_MINS,
        }
    }
}

impl DaybookConfig {
    pub fn config_path() -> DaybookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DaybookError::Config("Could not determine config directory".into()))?
            .join("daybook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template there
    /// on first run.
    pub fn load() -> DaybookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> DaybookResult<Self> {
        let config: DaybookConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("DAYBOOK"))
            .build()
            .map_err(|e| DaybookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DaybookError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DaybookResult<()> {
        Timeline::new(self.slot_minutes)?;
        if self.default_duration_mins == 0 {
            return Err(DaybookError::Config(
                "default_duration_mins must be positive".into(),
            ));
        }
        if self.start_rounding_mins == 0 {
            return Err(DaybookError::Config(
                "start_rounding_mins must be positive".into(),
            ));
        }
        Ok(())
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn save(&self, path: &Path) -> DaybookResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DaybookError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DaybookResult<()> {
        let contents = format!(
            "\
# daybook configuration

# Where your events are stored:
# data_dir = \"{}\"

# Timeline granularity in minutes (must divide a day evenly):
# slot_minutes = {}

# Defaults for new events:
# default_title = \"{}\"
# default_duration_mins = {}
# start_rounding_mins = {}
",
            default_data_dir().display(),
            DEFAULT_SLOT_MINUTES,
            DEFAULT_EVENT_TITLE,
            DEFAULT_DURATION_MINS,
            DEFAULT_START_ROUNDING_MINS,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DaybookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DaybookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
