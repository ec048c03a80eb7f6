//! Pipeline configuration.
//!
//! Configuration is layered with the `config` crate:
//! - Bundled defaults (include_str! from reelsmith.toml)
//! - User overrides (~/.config/reelsmith/reelsmith.toml, then ./reelsmith.toml)
//!
//! Later sources override earlier ones; user files are optional.

use config::{Config, File, FileFormat};
use reelsmith_error::{ConfigError, ReelsmithError, ReelsmithResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

fn default_slot_count() -> usize {
    4
}

fn default_snapshot_key() -> String {
    "reelsmith.session".to_string()
}

fn default_max_snapshot_bytes() -> usize {
    256 * 1024
}

fn default_true() -> bool {
    true
}

/// Settings for the generation orchestrator.
///
/// # Example
///
/// ```no_run
/// use reelsmith_pipeline::PipelineConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PipelineConfig::load()?;
/// println!("{} slots per stage", config.slot_count());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_")]
pub struct PipelineConfig {
    /// Number of slots per stage, one per storyboard scene
    #[serde(default = "default_slot_count")]
    slot_count: usize,

    /// Key under which the session snapshot is stored
    #[serde(default = "default_snapshot_key")]
    snapshot_key: String,

    /// Directory for on-disk snapshots; a per-user data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    snapshot_dir: Option<PathBuf>,

    /// Ceiling for one stored snapshot, in bytes
    #[serde(default = "default_max_snapshot_bytes")]
    max_snapshot_bytes: usize,

    /// Append successful generations to the history log
    #[serde(default = "default_true")]
    record_history: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            slot_count: default_slot_count(),
            snapshot_key: default_snapshot_key(),
            snapshot_dir: None,
            max_snapshot_bytes: default_max_snapshot_bytes(),
            record_history: true,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ReelsmithResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ReelsmithError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ReelsmithError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the result is invalid.
    #[instrument]
    pub fn load() -> ReelsmithResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../reelsmith.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/reelsmith/reelsmith.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("reelsmith").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| {
                ReelsmithError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ReelsmithError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when `slot_count` or `max_snapshot_bytes` is zero.
    pub fn validate(self) -> ReelsmithResult<Self> {
        if self.slot_count == 0 {
            return Err(ConfigError::invalid("slot_count", "must be at least 1").into());
        }
        if self.max_snapshot_bytes == 0 {
            return Err(ConfigError::invalid("max_snapshot_bytes", "must be at least 1").into());
        }
        Ok(self)
    }

    /// Snapshot directory, falling back to `<data dir>/reelsmith/snapshots`.
    pub fn resolved_snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("reelsmith")
                .join("snapshots")
        })
    }
}
