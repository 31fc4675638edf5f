//! Fixed-cadence driver: decode -> log -> indicate.
//!
//! Runs on a single task. The interrupt is only looked at between cycles, so
//! a cycle in progress always finishes; the serial read timeout bounds how
//! long that can take.
use std::{future::Future, time::Duration};

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    drivers::{
        fse103::{decoder::FrameError, driver::DriverError, event::Reading},
        iio_accel::{driver::AccelError, event::Acceleration},
    },
    indicator::{DisplayOp, DisplaySink, Indicator, IndicatorMode},
    record::LogSink,
};

/// Default time between force readings
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Default total run time
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Source of force readings
pub trait FrameSource {
    fn read_reading(&mut self) -> Result<Reading, DriverError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn read_reading(&mut self) -> Result<Reading, DriverError> {
        (**self).read_reading()
    }
}

/// Source of acceleration samples for tilt mode
pub trait AccelSource {
    fn read_accel(&mut self) -> Result<Acceleration, AccelError>;
}

impl<T: AccelSource + ?Sized> AccelSource for Box<T> {
    fn read_accel(&mut self) -> Result<Acceleration, AccelError> {
        (**self).read_accel()
    }
}

/// Fatal loop terminations
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Sensor stream closed")]
    StreamClosed,
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub poll_interval: Duration,
    pub run_timeout: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }
}

/// How a run ended without a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TimedOut,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: Outcome,
    /// Decode attempts, successful or not
    pub cycles: u32,
    /// Attempts dropped because of a malformed frame
    pub skipped: u32,
}

/// Owns every resource the acquisition touches
pub struct AcquisitionLoop<S, L, D> {
    timing: Timing,
    source: S,
    log_sink: L,
    display: D,
    indicator: Indicator,
    accelerometer: Option<Box<dyn AccelSource>>,
    cycles: u32,
    skipped: u32,
}

impl<S, L, D> AcquisitionLoop<S, L, D>
where
    S: FrameSource,
    L: LogSink,
    D: DisplaySink,
{
    pub fn new(timing: Timing, source: S, log_sink: L, display: D, indicator: Indicator) -> Self {
        Self {
            timing,
            source,
            log_sink,
            display,
            indicator,
            accelerometer: None,
            cycles: 0,
            skipped: 0,
        }
    }

    /// Attach the accelerometer that feeds tilt mode
    pub fn with_accelerometer(mut self, accelerometer: Box<dyn AccelSource>) -> Self {
        self.accelerometer = Some(accelerometer);
        self
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn log_sink(&self) -> &L {
        &self.log_sink
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Run until the timeout elapses, `interrupt` resolves, or a fatal error
    /// occurs. At most one decode happens per poll interval.
    pub async fn run<F>(&mut self, interrupt: F) -> Result<RunSummary, AcquisitionError>
    where
        F: Future<Output = ()>,
    {
        if self.indicator.mode() == IndicatorMode::Tilt && self.accelerometer.is_none() {
            return Err(AcquisitionError::DeviceUnavailable(
                "tilt mode requires an accelerometer".to_string(),
            ));
        }
        self.cycles = 0;
        self.skipped = 0;

        let ops = self.indicator.begin();
        self.show(&ops);

        log::info!("Logging force data, press ^C to quit");
        let start = Instant::now();
        let deadline = tokio::time::sleep_until(start + self.timing.run_timeout);
        let mut ticker = tokio::time::interval_at(
            start + self.timing.poll_interval,
            self.timing.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(deadline);
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    log::info!("User interrupt...quitting...");
                    self.shutdown();
                    return Ok(self.summary(Outcome::Interrupted));
                }
                _ = &mut deadline => {
                    log::info!("Program timed out...quitting...");
                    return Ok(self.summary(Outcome::TimedOut));
                }
                _ = ticker.tick() => {
                    self.cycle()?;
                }
            }
        }
    }

    /// One decode -> log -> indicate pass
    fn cycle(&mut self) -> Result<(), AcquisitionError> {
        self.cycles += 1;
        let reading = match self.source.read_reading() {
            Ok(reading) => reading,
            Err(DriverError::Frame(FrameError::MalformedFrame(reason))) => {
                log::warn!("Skipping cycle, malformed frame: {reason}");
                self.skipped += 1;
                return Ok(());
            }
            Err(DriverError::Frame(FrameError::StreamClosed)) => {
                log::error!("Sensor stream closed");
                return Err(AcquisitionError::StreamClosed);
            }
            Err(e) => {
                log::error!("Unable to read from sensor: {e}");
                return Err(AcquisitionError::DeviceUnavailable(e.to_string()));
            }
        };
        log::debug!(
            "Reading: x={} y={} z={}",
            reading.force_x(),
            reading.force_y(),
            reading.force_z()
        );

        if let Err(e) = self.log_sink.append(&reading) {
            log::warn!("Unable to log reading: {e}");
        }

        let ops = match &mut self.indicator {
            Indicator::Force(indicator) => indicator.update(&reading),
            Indicator::Tilt(indicator) => {
                let Some(accelerometer) = self.accelerometer.as_mut() else {
                    return Ok(());
                };
                match accelerometer.read_accel() {
                    Ok(accel) => indicator.update(&accel),
                    Err(e) => {
                        log::warn!("Unable to read accelerometer: {e}");
                        return Ok(());
                    }
                }
            }
        };
        self.show(&ops);

        Ok(())
    }

    /// Push writes to the display, warning on failure
    fn show(&mut self, ops: &[DisplayOp]) {
        if let Err(e) = self.display.apply(ops) {
            log::warn!("Unable to update display: {e}");
        }
    }

    /// Blank the display on the way out. The serial port is only open during
    /// a read, so there is nothing else to release.
    fn shutdown(&mut self) {
        if let Err(e) = self.display.clear() {
            log::warn!("Unable to clear display: {e}");
        }
        self.indicator.reset();
    }

    fn summary(&self, outcome: Outcome) -> RunSummary {
        RunSummary {
            outcome,
            cycles: self.cycles,
            skipped: self.skipped,
        }
    }
}
