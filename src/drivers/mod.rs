pub mod fse103;
pub mod iio_accel;
pub mod sense_hat;
