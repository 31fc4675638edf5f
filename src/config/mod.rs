pub mod path;


use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    acquisition::Timing,
    constants::DEFAULT_LOG_DIR,
    drivers::{fse103::DataFormat, iio_accel::info::MountMatrix},
    indicator::{tilt::DEFAULT_DEADBAND, ForceThresholds, IndicatorMode},
};

/// Represents all possible errors loading a [TrainerConfig]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Per-axis threshold overrides. Unset axes keep their default.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ThresholdsConfig {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Configuration file contents. Every field is optional; anything left out
/// falls back to the CLI or the built-in default.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct TrainerConfig {
    /// Seconds between force readings
    pub poll_interval: Option<f64>,
    /// Maximum run time in minutes
    pub program_timeout: Option<f64>,
    pub mode: Option<IndicatorMode>,
    pub thresholds: Option<ThresholdsConfig>,
    /// Tilt deadband in g
    pub deadband: Option<f64>,
    pub data_format: Option<DataFormat>,
    /// Serial device node. Discovered when not set.
    pub port: Option<String>,
    pub log_dir: Option<String>,
    /// IIO device name or id of the accelerometer
    pub accel_device: Option<String>,
    /// Accelerometer mount matrix, e.g. "1, 0, 0; 0, 1, 0; 0, 0, 1"
    pub mount_matrix: Option<String>,
    pub low_light: Option<bool>,
}

impl TrainerConfig {
    /// Load a [TrainerConfig] from the given YAML string
    pub fn from_yaml(content: String) -> Result<TrainerConfig, LoadError> {
        let config: TrainerConfig = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [TrainerConfig] from the given YAML file
    pub fn from_yaml_path(path: &Path) -> Result<TrainerConfig, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: TrainerConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Returns this config with every field set in `other` taking its value
    pub fn merge(self, other: TrainerConfig) -> TrainerConfig {
        let thresholds = match (self.thresholds, other.thresholds) {
            (Some(base), Some(over)) => Some(ThresholdsConfig {
                x: over.x.or(base.x),
                y: over.y.or(base.y),
                z: over.z.or(base.z),
            }),
            (base, over) => over.or(base),
        };

        TrainerConfig {
            poll_interval: other.poll_interval.or(self.poll_interval),
            program_timeout: other.program_timeout.or(self.program_timeout),
            mode: other.mode.or(self.mode),
            thresholds,
            deadband: other.deadband.or(self.deadband),
            data_format: other.data_format.or(self.data_format),
            port: other.port.or(self.port),
            log_dir: other.log_dir.or(self.log_dir),
            accel_device: other.accel_device.or(self.accel_device),
            mount_matrix: other.mount_matrix.or(self.mount_matrix),
            low_light: other.low_light.or(self.low_light),
        }
    }

    /// Fill in defaults and validate
    pub fn resolve(&self) -> Result<Settings, LoadError> {
        let defaults = Timing::default();
        let poll_interval = match self.poll_interval {
            Some(secs) => positive_duration("poll_interval", secs)?,
            None => defaults.poll_interval,
        };
        let run_timeout = match self.program_timeout {
            Some(minutes) => positive_duration("program_timeout", minutes * 60.0)?,
            None => defaults.run_timeout,
        };

        let mut thresholds = ForceThresholds::default();
        if let Some(over) = self.thresholds.as_ref() {
            thresholds.x = over.x.unwrap_or(thresholds.x);
            thresholds.y = over.y.unwrap_or(thresholds.y);
            thresholds.z = over.z.unwrap_or(thresholds.z);
        }
        for (axis, value) in [("x", thresholds.x), ("y", thresholds.y), ("z", thresholds.z)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoadError::Invalid(format!(
                    "threshold {axis} must be a non-negative number, got {value}"
                )));
            }
        }

        let deadband = self.deadband.unwrap_or(DEFAULT_DEADBAND);
        if !deadband.is_finite() || deadband < 0.0 {
            return Err(LoadError::Invalid(format!(
                "deadband must be a non-negative number, got {deadband}"
            )));
        }

        let mount_matrix = match self.mount_matrix.as_deref() {
            Some(matrix) => Some(
                MountMatrix::new(matrix).map_err(|e| LoadError::Invalid(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Settings {
            timing: Timing {
                poll_interval,
                run_timeout,
            },
            mode: self.mode.unwrap_or_default(),
            thresholds,
            deadband,
            data_format: self.data_format.unwrap_or_default(),
            port: self.port.clone(),
            log_dir: PathBuf::from(self.log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR)),
            accel_device: self.accel_device.clone(),
            mount_matrix,
            low_light: self.low_light.unwrap_or(true),
        })
    }
}

/// Fully resolved settings handed to the acquisition core
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub timing: Timing,
    pub mode: IndicatorMode,
    pub thresholds: ForceThresholds,
    pub deadband: f64,
    pub data_format: DataFormat,
    pub port: Option<String>,
    pub log_dir: PathBuf,
    pub accel_device: Option<String>,
    pub mount_matrix: Option<MountMatrix>,
    pub low_light: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            mode: IndicatorMode::default(),
            thresholds: ForceThresholds::default(),
            deadband: DEFAULT_DEADBAND,
            data_format: DataFormat::default(),
            port: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            accel_device: None,
            mount_matrix: None,
            low_light: true,
        }
    }
}

fn positive_duration(name: &str, secs: f64) -> Result<Duration, LoadError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(LoadError::Invalid(format!(
            "{name} must be greater than zero, got {secs}"
        )));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| LoadError::Invalid(format!("{name}: {e}")))
}
