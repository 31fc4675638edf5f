use std::env;
use std::error::Error;

use chrono::Local;
use clap::Parser;

use waypoint_trainer::acquisition::AcquisitionLoop;
use waypoint_trainer::cli::Args;
use waypoint_trainer::config::path::find_config_file;
use waypoint_trainer::config::TrainerConfig;
use waypoint_trainer::drivers::fse103::{discovery, driver::Driver};
use waypoint_trainer::drivers::iio_accel;
use waypoint_trainer::drivers::sense_hat::LedMatrix;
use waypoint_trainer::indicator::{
    DisplaySink, ForceIndicator, Indicator, IndicatorMode, NullDisplay, TiltIndicator,
};
use waypoint_trainer::record::CsvLog;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let log_level = match env::var("LOG_LEVEL") {
        Ok(value) => value,
        Err(_) => "info".to_string(),
    };
    env::set_var("RUST_LOG", log_level);
    env_logger::init();
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    log::info!("Starting waypoint-trainer v{}", VERSION);

    let args = Args::parse();

    // Config file, if any, sits under the command line flags
    let config_path = args.config.clone().or_else(find_config_file);
    let file_config = match config_path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            TrainerConfig::from_yaml_path(&path)?
        }
        None => TrainerConfig::default(),
    };
    let settings = file_config.merge(args.to_config()).resolve()?;
    log::debug!("Resolved settings: {settings:?}");

    let port = match settings.port.clone() {
        Some(port) => port,
        None => discovery::find_port()?,
    };
    log::info!("Serial set...");

    let driver = Driver::new(port.as_str(), settings.data_format);
    driver.initialize()?;

    let log_sink = CsvLog::create(&settings.log_dir, &Local::now())?;

    let display: Box<dyn DisplaySink> = match LedMatrix::discover() {
        Ok(matrix) => {
            if let Err(e) = matrix.set_low_light(settings.low_light) {
                log::warn!("Unable to set low light mode: {e}");
            }
            Box::new(matrix)
        }
        Err(e) => {
            log::warn!("LED matrix unavailable, continuing without it: {e}");
            Box::new(NullDisplay)
        }
    };

    let indicator = match settings.mode {
        IndicatorMode::Force => Indicator::Force(ForceIndicator::new(settings.thresholds)),
        IndicatorMode::Tilt => Indicator::Tilt(TiltIndicator::new(settings.deadband)),
    };
    log::info!("Indicators initialized...");

    let mut acquisition = AcquisitionLoop::new(settings.timing, driver, log_sink, display, indicator);
    if settings.mode == IndicatorMode::Tilt {
        let accel = iio_accel::driver::Driver::new(
            settings.accel_device.as_deref(),
            settings.mount_matrix.clone(),
        )?;
        log::info!("Using accelerometer {}", accel.name());
        acquisition = acquisition.with_accelerometer(Box::new(accel));
    }

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for interrupt: {e}");
            std::future::pending::<()>().await;
        }
    };

    let summary = acquisition.run(interrupt).await?;
    log::info!(
        "Finished after {} cycles ({} skipped): {:?}",
        summary.cycles,
        summary.skipped,
        summary.outcome
    );

    Ok(())
}
