use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod decoder;
pub mod discovery;
pub mod driver;
pub mod event;
pub mod serial_report;

#[cfg(test)]
mod decoder_test;
#[cfg(test)]
mod discovery_test;
#[cfg(test)]
mod serial_report_test;

/// Byte that precedes every frame sent by the sensor
pub const FRAME_MARKER: u8 = 0x0D;
/// Written once at startup. The sensor does not answer it.
pub const INIT_COMMAND: u8 = 0x7A;

pub const BAUD_RATE: u32 = 115_200;
pub const TTY_TIMEOUT: u64 = 100;

// Hardware ID's
pub const FSE103_VID: u16 = 0x16d0;
pub const FSE103_PID: u16 = 0x0c21;

// Message tags
pub const FORCE_TAG: u8 = b'f';
pub const RAW_TAG: u8 = b'r';

// Frame size following the marker byte
const REPORT_SIZE: usize = 19;

/// Units the sensor was asked to report in. Both formats share one wire
/// layout, so this only labels the data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// Calibrated force in newtons
    #[default]
    Force,
    /// Raw sensor counts
    Raw,
}

impl DataFormat {
    /// Message tag the sensor uses for frames in this format
    pub fn tag(&self) -> u8 {
        match self {
            DataFormat::Force => FORCE_TAG,
            DataFormat::Raw => RAW_TAG,
        }
    }

    /// Returns the format a message tag belongs to
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            FORCE_TAG => Some(DataFormat::Force),
            RAW_TAG => Some(DataFormat::Raw),
            _ => None,
        }
    }
}

/// Returns true if the given USB ids belong to an FSE103
pub fn is_fse103(vid: u16, pid: u16) -> bool {
    vid == FSE103_VID && pid == FSE103_PID
}
