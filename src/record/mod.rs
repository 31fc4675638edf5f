//! Append-only force log: one CSV line per reading
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{constants::LOG_HEADER, drivers::fse103::event::Reading, sink::SinkError};


/// Anything readings can be persisted to
pub trait LogSink {
    fn append(&mut self, reading: &Reading) -> Result<(), SinkError>;
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn append(&mut self, reading: &Reading) -> Result<(), SinkError> {
        (**self).append(reading)
    }
}

/// Format a reading as a log line. The date is part of the file name, so
/// only the time of day is written.
pub fn format_record(reading: &Reading) -> String {
    format!(
        "{},{},{},{}\n",
        reading.timestamp().format("%H:%M:%S%.6f"),
        reading.force_x(),
        reading.force_y(),
        reading.force_z()
    )
}

/// File name for a log started at the given time
pub fn log_file_name(started: &DateTime<Local>) -> String {
    format!("test-{}.csv", started.format("%Y%m%d-%H:%M:%S"))
}

/// CSV file on disk. The file is reopened in append mode for every record,
/// so nothing is held open between cycles.
#[derive(Debug)]
pub struct CsvLog {
    path: PathBuf,
}

impl CsvLog {
    /// Create a new log in `dir` named after the start time and write the
    /// header line
    pub fn create(dir: &Path, started: &DateTime<Local>) -> Result<Self, SinkError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(started));
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        writeln!(file, "{LOG_HEADER}")?;

        log::info!("Logs initialized...");
        log::debug!("Logging to {path:?}");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl LogSink for CsvLog {
    fn append(&mut self, reading: &Reading) -> Result<(), SinkError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(format_record(reading).as_bytes())?;
        Ok(())
    }
}
