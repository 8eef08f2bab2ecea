//! Factory configuration and file loading.
//!
//! A [`FactoryConfig`] can be written in RON, TOML, or JSON; the format is
//! detected from the file extension. Every field has a default, so a config
//! file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::engine::Factory;
use crate::error::FactoryError;
use crate::fixed::Ticks;
use crate::rng::SimRng;
use crate::worker::{Worker, DEFAULT_PROCESSING_DURATION};

/// Seed used when a config does not name one.
pub const DEFAULT_SEED: u64 = 0xFACA_DE00_BE17_0001;

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The config parsed but does not describe a valid factory.
    #[error(transparent)]
    Build(#[from] FactoryError),
}

// ===========================================================================
// Config
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub belt_length: usize,
    /// Product names. Repeating a name makes it more likely to be drawn.
    pub products: Vec<String>,
    pub workers_per_position: usize,
    pub processing_duration: Ticks,
    /// Explicit per-worker durations, one list per belt position. Overrides
    /// `workers_per_position` and `processing_duration` when present.
    pub stations: Option<Vec<Vec<Ticks>>>,
    pub seed: Option<u64>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            belt_length: 3,
            products: vec!["a".to_string(), "b".to_string()],
            workers_per_position: 2,
            processing_duration: DEFAULT_PROCESSING_DURATION,
            stations: None,
            seed: None,
        }
    }
}

impl FactoryConfig {
    /// Worker durations per belt position, after applying the override.
    pub fn station_durations(&self) -> Vec<Vec<Ticks>> {
        match &self.stations {
            Some(stations) => stations.clone(),
            None => vec![vec![self.processing_duration; self.workers_per_position]; self.belt_length],
        }
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Build a factory driven by a [`SimRng`] seeded from this config.
    pub fn build(&self) -> Result<Factory<SimRng>, FactoryError> {
        let catalog = Catalog::from_names(&self.products)?;
        let stations = self
            .station_durations()
            .into_iter()
            .enumerate()
            .map(|(position, durations)| {
                durations
                    .into_iter()
                    .map(|d| Worker::new(d).map_err(|source| FactoryError::InvalidWorker { position, source }))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Factory::new(self.belt_length, catalog, stations, SimRng::new(self.effective_seed()))
    }
}

// ===========================================================================
// Format detection and loading
// ===========================================================================

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Parse config text in the given format. `file` is only used for errors.
pub fn parse_config(content: &str, format: Format, file: &Path) -> Result<FactoryConfig, ConfigError> {
    let parse_err = |detail: String| ConfigError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read and deserialize a config file, detecting its format from the extension.
pub fn load_config(path: &Path) -> Result<FactoryConfig, ConfigError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, format, path)
}
