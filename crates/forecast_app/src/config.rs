//! RON configuration for the forecast run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use forecast_core::{MarkerTable, MarkerTableError};
use forecast_engine::{FetchSettings, DEFAULT_BASE_URL};
use forecast_logging::forecast_info;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "solar_forecast.ron";

/// What a run that extracted some but not all fields should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Publish what was extracted and exit successfully.
    #[default]
    Continue,
    /// Publish what was extracted, then exit with failure.
    Halt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Postal-code region, e.g. `"785"`.
    pub region: Option<String>,
    /// Rated power of the home system in kWp.
    pub power_kw: f64,
    pub base_url: String,
    pub state_file: PathBuf,
    /// Hard limit for the whole run.
    pub watchdog_secs: u64,
    pub fetch: FetchSettings,
    /// Replaces the built-in anchors when the page layout changes.
    pub markers: Option<MarkerTable>,
    pub failure_policy: FailurePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: None,
            power_kw: 1.0,
            base_url: DEFAULT_BASE_URL.to_string(),
            state_file: PathBuf::from("solar_forecast_state.json"),
            watchdog_secs: 60,
            fetch: FetchSettings::default(),
            markers: None,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("power_kw must be a non-negative number, got {0}")]
    Power(f64),
    #[error("watchdog_secs must be greater than zero")]
    Watchdog,
    #[error(transparent)]
    Markers(#[from] MarkerTableError),
}

impl AppConfig {
    /// Read `path`; a missing file means all defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                forecast_info!("No config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.power_kw.is_finite() || self.power_kw < 0.0 {
            return Err(ConfigError::Power(self.power_kw));
        }
        if self.watchdog_secs == 0 {
            return Err(ConfigError::Watchdog);
        }
        if let Some(markers) = &self.markers {
            markers.validate()?;
        }
        Ok(())
    }

    pub fn marker_table(&self) -> MarkerTable {
        self.markers.clone().unwrap_or_default()
    }
}
