pub mod acquisition;
pub mod cli;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod indicator;
pub mod record;
pub mod sink;
