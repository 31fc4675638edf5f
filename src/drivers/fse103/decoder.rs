//! Frame synchronization and decoding for the FSE103 serial protocol.
//!
//! Frame format (big-endian):
//! - MARKER (1 byte): 0x0D
//! - LENGTH (1 byte): declared frame length
//! - TYPE (1 byte): 'f' (force) or 'r' (raw counts)
//! - SECONDS (4 bytes): sensor clock, unsigned
//! - FORCE X/Y/Z (3x 4 bytes): IEEE-754 single precision
//! - STOP (1 byte): boolean flag
use std::io::{self, Read};

use chrono::Local;
use packed_struct::PackedStruct;
use thiserror::Error;

use super::{event::Reading, serial_report::ForceDataReport, DataFormat, FRAME_MARKER, REPORT_SIZE};

/// Most bytes dropped while hunting for a marker before the cycle is given
/// up. The read timeout only fires on a silent line, so a port streaming
/// something other than sensor frames needs its own bound.
pub const MAX_HUNT_BYTES: usize = 4 * (REPORT_SIZE + 1);

/// Errors that can occur while decoding a frame
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
    #[error("Stream closed")]
    StreamClosed,
}

/// Reads one [Reading] per call from a byte stream.
///
/// Bytes in front of the frame marker are dropped, not buffered: the sensor
/// retransmits periodically so an unsynchronized partial frame is simply lost.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes skipped while hunting for the marker during the last call
    discarded: usize,
    /// Message tag of the last frame that decoded
    last_format: Option<DataFormat>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes dropped before the marker on the last decode
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Format tag of the last successfully decoded frame
    pub fn last_format(&self) -> Option<DataFormat> {
        self.last_format
    }

    /// Decode exactly one frame from the stream into a [Reading]
    pub fn decode<R: Read>(&mut self, stream: &mut R) -> Result<Reading, FrameError> {
        let report = self.read_report(stream)?;
        let reading = Reading::new(
            Local::now(),
            report.force_x(),
            report.force_y(),
            report.force_z(),
        );
        log::trace!(
            "Decoded frame: tag={:?} seconds={} stop={}",
            report.message_type as char,
            report.sensor_seconds,
            report.is_stop()
        );

        Ok(reading)
    }

    /// Synchronize on the next marker and unpack the fixed frame layout
    /// that follows it
    pub fn read_report<R: Read>(&mut self, stream: &mut R) -> Result<ForceDataReport, FrameError> {
        self.sync(stream)?;

        let mut buf = [0; REPORT_SIZE];
        if let Err(e) = stream.read_exact(&mut buf) {
            return Err(match e.kind() {
                io::ErrorKind::UnexpectedEof => {
                    FrameError::MalformedFrame("stream ended mid-frame".to_string())
                }
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => FrameError::MalformedFrame(
                    "timed out before the full frame arrived".to_string(),
                ),
                _ => classify(e),
            });
        }

        let report = ForceDataReport::unpack(&buf)
            .map_err(|e| FrameError::MalformedFrame(e.to_string()))?;

        // The tag is the only byte with a closed set of values. Rejecting
        // anything else catches a marker found inside float data.
        let Some(format) = report.data_format() else {
            return Err(FrameError::MalformedFrame(format!(
                "unknown message type: {:#04x}",
                report.message_type
            )));
        };
        if report.length as usize != REPORT_SIZE {
            log::trace!("Declared frame length {} differs from layout", report.length);
        }
        self.last_format = Some(format);

        Ok(report)
    }

    /// Consume bytes until the frame marker has been read
    fn sync<R: Read>(&mut self, stream: &mut R) -> Result<(), FrameError> {
        self.discarded = 0;
        let mut byte = [0; 1];
        loop {
            match stream.read(&mut byte) {
                Ok(0) => return Err(FrameError::StreamClosed),
                Ok(_) => {
                    if byte[0] == FRAME_MARKER {
                        if self.discarded > 0 {
                            log::debug!("Dropped {} bytes before frame marker", self.discarded);
                        }
                        return Ok(());
                    }
                    self.discarded += 1;
                    if self.discarded >= MAX_HUNT_BYTES {
                        return Err(FrameError::MalformedFrame(format!(
                            "no frame marker in {} bytes",
                            self.discarded
                        )));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    return Err(FrameError::MalformedFrame(format!(
                        "no frame marker before read timeout ({} bytes dropped)",
                        self.discarded
                    )));
                }
                Err(e) => return Err(classify(e)),
            }
        }
    }
}

/// Map an I/O failure onto the decoder's error taxonomy
fn classify(e: io::Error) -> FrameError {
    match e.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => FrameError::StreamClosed,
        _ => FrameError::MalformedFrame(e.to_string()),
    }
}
