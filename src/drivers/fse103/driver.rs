use std::{io::Write, time::Duration};

use serialport::{DataBits, Parity, StopBits, TTYPort};
use thiserror::Error;

use crate::{
    acquisition::FrameSource,
    drivers::fse103::{
        decoder::{FrameDecoder, FrameError},
        event::Reading,
        DataFormat, BAUD_RATE, INIT_COMMAND, TTY_TIMEOUT,
    },
};

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(#[from] serialport::Error),
    #[error("Error writing to device: {0}")]
    Io(#[from] std::io::Error),
}

/// Driver for the FSE103 force sensor.
///
/// The tty is opened at the start of every read and closed when the read
/// finishes, so a failed cycle never leaves a half-read port behind.
pub struct Driver {
    // TTY device node, e.g. /dev/ttyACM0
    devnode: String,
    // Format the sensor was asked for
    data_format: DataFormat,
    decoder: FrameDecoder,
}

impl Driver {
    pub fn new(devnode: &str, data_format: DataFormat) -> Self {
        Self {
            devnode: devnode.to_string(),
            data_format,
            decoder: FrameDecoder::new(),
        }
    }

    pub fn devnode(&self) -> &str {
        self.devnode.as_str()
    }

    fn open(&self) -> Result<TTYPort, DriverError> {
        let port = serialport::new(self.devnode.as_str(), BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(TTY_TIMEOUT));
        Ok(TTYPort::open(&port)?)
    }

    /// Send the init command. The sensor does not respond to it.
    pub fn initialize(&self) -> Result<(), DriverError> {
        let mut port = self.open()?;
        port.write_all(&[INIT_COMMAND])?;
        port.flush()?;
        log::info!("Sensor initialized...");
        Ok(())
    }

    /// Open the port, decode one frame and close the port again
    pub fn poll(&mut self) -> Result<Reading, DriverError> {
        let mut port = self.open()?;
        let reading = self.decoder.decode(&mut port)?;
        drop(port);

        if let Some(format) = self.decoder.last_format() {
            if format != self.data_format {
                log::debug!(
                    "Frame tagged {:?} while {:?} was requested",
                    format,
                    self.data_format
                );
            }
        }

        Ok(reading)
    }
}

impl FrameSource for Driver {
    fn read_reading(&mut self) -> Result<Reading, DriverError> {
        self.poll()
    }
}
