use std::{
    error::Error,
    io::{self, Cursor, Read},
};

use chrono::Local;
use packed_struct::PackedStruct;

use crate::drivers::fse103::{
    decoder::{FrameDecoder, FrameError, MAX_HUNT_BYTES},
    serial_report::ForceDataReport,
    DataFormat, FRAME_MARKER,
};

/// Marker followed by a packed frame
fn frame(format: DataFormat, x: f32, y: f32, z: f32) -> Vec<u8> {
    let report = ForceDataReport::new(format, 42, x, y, z);
    let mut bytes = vec![FRAME_MARKER];
    bytes.extend_from_slice(&report.pack().unwrap());
    bytes
}

/// Reader that hands out its bytes and then reports a read timeout, like a
/// serial port with nothing more to say
struct TimeoutReader {
    inner: Cursor<Vec<u8>>,
}

impl Read for TimeoutReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::TimedOut, "timed out")),
            n => Ok(n),
        }
    }
}

#[test]
fn test_decode_single_frame() -> Result<(), Box<dyn Error>> {
    let mut stream = Cursor::new(frame(DataFormat::Force, 1.0, -3.5, 7.25));
    let mut decoder = FrameDecoder::new();

    let before = Local::now();
    let reading = decoder.decode(&mut stream)?;
    let after = Local::now();

    assert_eq!(reading.force_x(), 1.0);
    assert_eq!(reading.force_y(), -3.5);
    assert_eq!(reading.force_z(), 7.25);
    assert!(reading.timestamp() >= before && reading.timestamp() <= after);
    assert_eq!(decoder.discarded(), 0);
    assert_eq!(decoder.last_format(), Some(DataFormat::Force));

    Ok(())
}

#[test]
fn test_garbage_before_marker_is_dropped() -> Result<(), Box<dyn Error>> {
    // A full frame's worth of noise, none of it the marker
    let mut bytes: Vec<u8> = (0..19u8).map(|i| 0x20 + i).collect();
    bytes.extend(frame(DataFormat::Force, 2.5, 0.0, -1.0));
    bytes.extend(frame(DataFormat::Force, 0.5, 0.25, 0.125));

    let mut stream = Cursor::new(bytes);
    let mut decoder = FrameDecoder::new();

    let first = decoder.decode(&mut stream)?;
    assert_eq!(decoder.discarded(), 19);
    assert_eq!(first.force_x(), 2.5);
    assert_eq!(first.force_z(), -1.0);

    let second = decoder.decode(&mut stream)?;
    assert_eq!(decoder.discarded(), 0);
    assert_eq!(second.force_y(), 0.25);

    Ok(())
}

#[test]
fn test_raw_and_force_tags_decode_the_same() -> Result<(), Box<dyn Error>> {
    let mut decoder = FrameDecoder::new();

    let force = decoder.decode(&mut Cursor::new(frame(DataFormat::Force, 1.0, 2.0, 3.0)))?;
    let raw = decoder.decode(&mut Cursor::new(frame(DataFormat::Raw, 1.0, 2.0, 3.0)))?;
    assert_eq!(decoder.last_format(), Some(DataFormat::Raw));

    assert_eq!(force.force_x(), raw.force_x());
    assert_eq!(force.force_y(), raw.force_y());
    assert_eq!(force.force_z(), raw.force_z());

    Ok(())
}

#[test]
fn test_truncated_frame_is_malformed() {
    let mut bytes = frame(DataFormat::Force, 1.0, 2.0, 3.0);
    bytes.truncate(10);

    let mut decoder = FrameDecoder::new();
    let result = decoder.decode(&mut Cursor::new(bytes));
    assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
}

#[test]
fn test_timeout_mid_frame_is_malformed() {
    let mut bytes = frame(DataFormat::Force, 1.0, 2.0, 3.0);
    bytes.truncate(8);

    let mut reader = TimeoutReader {
        inner: Cursor::new(bytes),
    };
    let mut decoder = FrameDecoder::new();
    let result = decoder.decode(&mut reader);
    assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
}

#[test]
fn test_timeout_while_searching_is_malformed() {
    let mut reader = TimeoutReader {
        inner: Cursor::new(vec![0x01, 0x02, 0x03]),
    };
    let mut decoder = FrameDecoder::new();
    let result = decoder.decode(&mut reader);
    assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
    assert_eq!(decoder.discarded(), 3);
}

#[test]
fn test_end_of_stream_is_closed() {
    let mut decoder = FrameDecoder::new();

    let result = decoder.decode(&mut Cursor::new(Vec::new()));
    assert!(matches!(result, Err(FrameError::StreamClosed)));

    let result = decoder.decode(&mut Cursor::new(vec![0xaa, 0xbb]));
    assert!(matches!(result, Err(FrameError::StreamClosed)));
}

#[test]
fn test_unknown_tag_rejected_then_resyncs() -> Result<(), Box<dyn Error>> {
    let mut bogus = frame(DataFormat::Force, 9.0, 9.0, 9.0);
    bogus[2] = b'x';
    let mut bytes = bogus;
    bytes.extend(frame(DataFormat::Force, 4.0, 5.0, 6.0));

    let mut stream = Cursor::new(bytes);
    let mut decoder = FrameDecoder::new();

    let result = decoder.decode(&mut stream);
    assert!(matches!(result, Err(FrameError::MalformedFrame(_))));

    let reading = decoder.decode(&mut stream)?;
    assert_eq!(reading.force_x(), 4.0);
    assert_eq!(reading.force_z(), 6.0);

    Ok(())
}

/// Reader that never runs dry and never contains a marker
struct NoiseReader {
    bytes_read: usize,
}

impl Read for NoiseReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        buf.fill(0xaa);
        self.bytes_read += buf.len();
        Ok(buf.len())
    }
}

#[test]
fn test_endless_noise_gives_up_after_hunt_limit() {
    let mut decoder = FrameDecoder::new();
    let mut noise = NoiseReader { bytes_read: 0 };
    let result = decoder.decode(&mut noise);
    assert!(matches!(result, Err(FrameError::MalformedFrame(_))));
    assert_eq!(decoder.discarded(), MAX_HUNT_BYTES);
    assert_eq!(noise.bytes_read, MAX_HUNT_BYTES);
}

#[test]
fn test_marker_just_inside_hunt_limit_decodes() -> Result<(), Box<dyn Error>> {
    let mut bytes = vec![0xaa; MAX_HUNT_BYTES - 1];
    bytes.extend(frame(DataFormat::Force, 1.0, 2.0, 3.0));
    let mut decoder = FrameDecoder::new();
    let reading = decoder.decode(&mut Cursor::new(bytes))?;
    assert_eq!(reading.force_z(), 3.0);
    assert_eq!(decoder.discarded(), MAX_HUNT_BYTES - 1);
    Ok(())
}
