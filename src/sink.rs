use std::io;

use thiserror::Error;

/// Failure writing to the record log or the display. Losing one sample is not
/// worth stopping acquisition over, so callers warn and carry on.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Error writing to sink: {0}")]
    Io(#[from] io::Error),
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}
