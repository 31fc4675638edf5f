use std::{collections::HashMap, fmt::Debug};

use industrial_io::{Channel, ChannelType, Device};
use thiserror::Error;

use super::{
    event::Acceleration,
    info::{AxisInfo, MountMatrix},
};
use crate::{acquisition::AccelSource, constants::STANDARD_GRAVITY};

#[derive(Error, Debug)]
pub enum AccelError {
    #[error("IIO error: {0}")]
    Iio(#[from] industrial_io::Error),
    #[error("No accelerometer found: {0}")]
    NotFound(String),
    #[error("Invalid mount matrix: {0}")]
    MountMatrix(String),
}

/// Driver for reading an IIO accelerometer
pub struct Driver {
    name: String,
    mount_matrix: MountMatrix,
    accel: HashMap<String, Channel>,
    accel_info: HashMap<String, AxisInfo>,
}

impl Driver {
    /// Open the IIO device with the given name or id. Without one, the first
    /// device exposing accelerometer channels is used.
    pub fn new(device: Option<&str>, matrix: Option<MountMatrix>) -> Result<Self, AccelError> {
        // Create an IIO local context used to query for devices
        let ctx = industrial_io::context::Context::new()?;
        log::debug!("IIO context version: {}", ctx.version());

        let device = match device {
            Some(name) => ctx
                .find_device(name)
                .ok_or_else(|| AccelError::NotFound(name.to_string()))?,
            None => ctx
                .devices()
                .find(|dev| {
                    dev.channels()
                        .any(|channel| channel.channel_type() == ChannelType::Accel)
                })
                .ok_or_else(|| AccelError::NotFound("no device has accel channels".into()))?,
        };
        let name = device.name().or(device.id()).unwrap_or_default();
        log::debug!("Creating IIO accelerometer driver instance for {name}");

        // Try finding the mount matrix to determine how the sensor was mounted
        let mount_matrix = if let Some(matrix) = matrix {
            matrix
        } else if let Some(mount) = device.find_channel("mount", industrial_io::Direction::Input) {
            let matrix_str = mount.attr_read_str("matrix")?;
            log::debug!("Found mount matrix: {matrix_str}");
            MountMatrix::new(matrix_str.as_str())?
        } else {
            MountMatrix::default()
        };

        let (accel, accel_info) = get_accel_channels(&device);
        if accel.is_empty() {
            return Err(AccelError::NotFound(format!("{name} has no accel channels")));
        }
        for info in &accel_info {
            log::debug!("Found accel_info: {:?}", info);
        }

        log::info!("Accelerometer initialized...");
        Ok(Self {
            name,
            mount_matrix,
            accel,
            accel_info,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Read every accel channel and return the result in g
    pub fn poll(&self) -> Result<Acceleration, AccelError> {
        let mut value = Acceleration::default();
        for (id, channel) in self.accel.iter() {
            let Some(info) = self.accel_info.get(id) else {
                continue;
            };
            let data = channel.attr_read_int("raw")?;

            let g = info.process(data) / STANDARD_GRAVITY;
            if id.ends_with('x') {
                value.x = g;
            }
            if id.ends_with('y') {
                value.y = g;
            }
            if id.ends_with('z') {
                value.z = g;
            }
        }

        Ok(self.mount_matrix.rotate(value))
    }
}

impl Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.name)
            .field("mount_matrix", &self.mount_matrix)
            .finish()
    }
}

impl AccelSource for Driver {
    fn read_accel(&mut self) -> Result<Acceleration, AccelError> {
        self.poll()
    }
}

/// Returns the accelerometer channels of the device and their scale/offset
fn get_accel_channels(device: &Device) -> (HashMap<String, Channel>, HashMap<String, AxisInfo>) {
    let mut channels = HashMap::new();
    let mut channel_info = HashMap::new();
    device
        .channels()
        .filter(|channel| channel.channel_type() == ChannelType::Accel)
        .for_each(|channel| {
            let Some(id) = channel.id() else {
                log::warn!("Unable to get channel id for channel: {:?}", channel);
                return;
            };

            let offset = match channel.attr_read_int("offset") {
                Ok(v) => v,
                Err(e) => {
                    log::debug!("Unable to read offset for channel {id}: {:?}", e);
                    0
                }
            };

            // Scale normalizes raw values to meters per second squared
            let scale = match channel.attr_read_float("scale") {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Unable to read scale for channel {id}: {:?}", e);
                    1.0
                }
            };

            channel_info.insert(id.clone(), AxisInfo { offset, scale });
            channels.insert(id, channel);
        });

    (channels, channel_info)
}
