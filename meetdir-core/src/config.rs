//! Global meetdir configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{MeetDirError, MeetDirResult};
use crate::loader::LoadOptions;
use crate::state::DEFAULT_MEETINGS_PER_PAGE;

fn default_meetings_per_page() -> usize {
    DEFAULT_MEETINGS_PER_PAGE
}

fn is_default_meetings_per_page(n: &usize) -> bool {
    *n == DEFAULT_MEETINGS_PER_PAGE
}

/// Global configuration at ~/.config/meetdir/config.toml
///
/// Every key can also be set from the environment with a `MEETDIR_` prefix,
/// e.g. `MEETDIR_DATA_URL`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetdirConfig {
    /// Where the meeting catalog is fetched from: an http(s) URL or a local path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,

    #[serde(
        default = "default_meetings_per_page",
        skip_serializing_if = "is_default_meetings_per_page"
    )]
    pub meetings_per_page: usize,

    /// Base address share links are built on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,

    /// Timezone assumed for meetings that don't declare one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timezone: Option<String>,
}

impl Default for MeetdirConfig {
    fn default() -> Self {
        MeetdirConfig {
            data_url: None,
            meetings_per_page: DEFAULT_MEETINGS_PER_PAGE,
            share_url: None,
            default_timezone: None,
        }
    }
}

impl MeetdirConfig {
    pub fn config_path() -> MeetDirResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| MeetDirError::Config("Could not determine config directory".into()))?
            .join("meetdir");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default on first run),
    /// then apply `MEETDIR_*` environment overrides.
    pub fn load() -> MeetDirResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> MeetDirResult<Self> {
        let config: MeetdirConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("MEETDIR"))
            .build()
            .map_err(|e| MeetDirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| MeetDirError::Config(e.to_string()))?;

        if config.meetings_per_page == 0 {
            return Err(MeetDirError::Config(
                "meetings_per_page must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Save the current config to ~/.config/meetdir/config.toml
    pub fn save(&self) -> MeetDirResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> MeetDirResult<()> {
        std::fs::write(path, self.to_toml()?)
            .map_err(|e| MeetDirError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn to_toml(&self) -> MeetDirResult<String> {
        toml::to_string_pretty(self).map_err(|e| MeetDirError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> MeetDirResult<()> {
        let contents = format!(
            "\
# meetdir configuration

# Where the meeting catalog is fetched from (URL or local file):
# data_url = \"https://meetings.example.org/meetings.json\"

# Meetings shown per page:
# meetings_per_page = {}

# Base address for share links:
# share_url = \"https://meetings.example.org/\"

# Timezone for meetings that don't declare one:
# default_timezone = \"America/New_York\"
",
            DEFAULT_MEETINGS_PER_PAGE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MeetDirError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| MeetDirError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// The configured data source, with `~` expanded for local paths.
    pub fn data_source(&self) -> MeetDirResult<String> {
        let url = self.data_url.as_deref().ok_or_else(|| {
            MeetDirError::Config(
                "No data_url configured. Set it in config.toml or MEETDIR_DATA_URL".into(),
            )
        })?;

        Ok(shellexpand::tilde(url).into_owned())
    }

    pub fn load_options(&self) -> MeetDirResult<LoadOptions> {
        let default_timezone = self
            .default_timezone
            .as_deref()
            .map(|tz| {
                tz.parse::<Tz>()
                    .map_err(|_| MeetDirError::InvalidTimezone(tz.to_string()))
            })
            .transpose()?;

        Ok(LoadOptions { default_timezone })
    }
}
