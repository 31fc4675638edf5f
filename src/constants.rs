/// Name used for config lookups and the packaged data directory
pub const APP_NAME: &str = "waypoint-trainer";

/// Header written once at the top of every force log
pub const LOG_HEADER: &str = "Time, Force X, Force Y, Force Z";

/// Default directory force logs are written into
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Standard gravity, used to convert IIO accelerometer values into g
pub const STANDARD_GRAVITY: f64 = 9.80665;
