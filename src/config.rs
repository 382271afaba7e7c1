//! Configuration management and validation.
//!
//! Provides the run configuration: where the site lives, where the
//! identifier tables are, where statements go, and the manually curated
//! data-quality corrections applied while building records.

use crate::constants::{
    CHECKPOINT_TABLE_FILE, DEFAULT_DATA_DIR, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_ROOT_URL,
    DEFAULT_USER_AGENT, DID_NOT_START_IDS, DOG_COUNT_OVERRIDE_IDS, MUSHER_TABLE_FILE,
    RACE_TABLE_FILE,
};
use crate::error::{Result, ScrapeError};
use crate::identifiers::IdentifierSources;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manually curated corrections for known bad source data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    /// Mushers whose dog counts are forced to zero at start and end
    pub dog_count_override_ids: Vec<u32>,

    /// Registered mushers dropped from a race's participant list
    pub did_not_start_ids: Vec<u32>,
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        Self {
            dog_count_override_ids: DOG_COUNT_OVERRIDE_IDS.to_vec(),
            did_not_start_ids: DID_NOT_START_IDS.to_vec(),
        }
    }
}

impl DataQualityConfig {
    pub fn overrides_dog_count(&self, musher_id: u32) -> bool {
        self.dog_count_override_ids.contains(&musher_id)
    }

    pub fn did_not_start(&self, musher_id: u32) -> bool {
        self.did_not_start_ids.contains(&musher_id)
    }
}

/// Global configuration for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Root URL of the results website
    pub root_url: String,

    /// Directory holding the identifier tables (defaults to a path under $HOME)
    pub data_dir: Option<PathBuf>,

    /// Race table, relative to the data directory
    pub race_table: PathBuf,

    /// Checkpoint table, relative to the data directory
    pub checkpoint_table: PathBuf,

    /// Musher table, relative to the data directory
    pub musher_table: PathBuf,

    /// File receiving all statements at the end of the run
    pub output_file: Option<PathBuf>,

    pub request_timeout_secs: u64,

    pub user_agent: String,

    /// Show a progress bar when processing every race
    pub show_progress: bool,

    pub data_quality: DataQualityConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            data_dir: None,
            race_table: PathBuf::from(RACE_TABLE_FILE),
            checkpoint_table: PathBuf::from(CHECKPOINT_TABLE_FILE),
            musher_table: PathBuf::from(MUSHER_TABLE_FILE),
            output_file: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress: true,
            data_quality: DataQualityConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrapeError::configuration(format!(
                "Cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ScrapeError::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set the root URL of the site
    pub fn with_root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = root_url.into();
        self
    }

    /// Set the directory holding the identifier tables
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = Some(data_dir);
        self
    }

    /// Write statements to this file at the end of the run
    pub fn with_output_file(mut self, output_file: PathBuf) -> Self {
        self.output_file = Some(output_file);
        self
    }

    /// Disable the progress bar
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Replace the data-quality corrections
    pub fn with_data_quality(mut self, data_quality: DataQualityConfig) -> Self {
        self.data_quality = data_quality;
        self
    }

    /// Directory holding the identifier tables
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(DEFAULT_DATA_DIR))
                .ok_or_else(|| {
                    ScrapeError::configuration(
                        "Could not determine home directory; pass --data-dir",
                    )
                }),
        }
    }

    /// Full paths of the three identifier tables
    pub fn identifier_sources(&self) -> Result<IdentifierSources> {
        let data_dir = self.resolve_data_dir()?;
        Ok(IdentifierSources {
            races: data_dir.join(&self.race_table),
            checkpoints: data_dir.join(&self.checkpoint_table),
            mushers: data_dir.join(&self.musher_table),
        })
    }

    /// Reject settings that cannot work
    pub fn validate(&self) -> Result<()> {
        if !(self.root_url.starts_with("http://") || self.root_url.starts_with("https://")) {
            return Err(ScrapeError::configuration(format!(
                "root_url must be an http(s) URL, got '{}'",
                self.root_url
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ScrapeError::configuration(
                "request_timeout_secs must be greater than zero",
            ));
        }

        Ok(())
    }
}
