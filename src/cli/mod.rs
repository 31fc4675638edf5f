use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{ThresholdsConfig, TrainerConfig},
    drivers::fse103::DataFormat,
    indicator::IndicatorMode,
};


/// Log force data from an FSE103 sensor and show it on the LED matrix
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Maximum time for the program to run, in minutes [default: 20]
    #[arg(long)]
    pub program_timeout: Option<f64>,

    /// Take readings in raw or calculated force values [default: force]
    #[arg(long, value_enum)]
    pub data_format: Option<DataFormat>,

    /// What the LED matrix shows [default: force]
    #[arg(long, value_enum)]
    pub mode: Option<IndicatorMode>,

    /// Seconds between force readings [default: 0.25]
    #[arg(long)]
    pub interval: Option<f64>,

    /// Force X threshold for lighting the top/bottom row [default: 2]
    #[arg(long)]
    pub threshold_x: Option<f32>,

    /// Force Y threshold for lighting the left/right column [default: 2]
    #[arg(long)]
    pub threshold_y: Option<f32>,

    /// Force Z threshold for lighting the contact ring [default: 5]
    #[arg(long)]
    pub threshold_z: Option<f32>,

    /// Tilt deadband in g [default: 0.1]
    #[arg(long)]
    pub deadband: Option<f64>,

    /// Serial device of the force sensor (discovered when omitted)
    #[arg(long)]
    pub port: Option<String>,

    /// Directory to write force logs into [default: logs]
    #[arg(long)]
    pub log_dir: Option<String>,

    /// IIO accelerometer name or id used in tilt mode
    #[arg(long)]
    pub accel_device: Option<String>,

    /// Dim the LED matrix [default: true]
    #[arg(long)]
    pub low_light: Option<bool>,

    /// Path to a YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Settings given on the command line, as a config layer
    pub fn to_config(&self) -> TrainerConfig {
        let thresholds = if self.threshold_x.is_some()
            || self.threshold_y.is_some()
            || self.threshold_z.is_some()
        {
            Some(ThresholdsConfig {
                x: self.threshold_x,
                y: self.threshold_y,
                z: self.threshold_z,
            })
        } else {
            None
        };

        TrainerConfig {
            poll_interval: self.interval,
            program_timeout: self.program_timeout,
            mode: self.mode,
            thresholds,
            deadband: self.deadband,
            data_format: self.data_format,
            port: self.port.clone(),
            log_dir: self.log_dir.clone(),
            accel_device: self.accel_device.clone(),
            mount_matrix: None,
            low_light: self.low_light,
        }
    }
}
