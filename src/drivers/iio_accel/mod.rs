pub mod driver;
pub mod event;
pub mod info;

#[cfg(test)]
mod info_test;
