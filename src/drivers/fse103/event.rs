use chrono::{DateTime, Local};

/// A single force sample. The timestamp is the host wall clock at the moment
/// the frame finished decoding; the sensor's own clock is not surfaced.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    timestamp: DateTime<Local>,
    force_x: f32,
    force_y: f32,
    force_z: f32,
}

impl Reading {
    pub fn new(timestamp: DateTime<Local>, force_x: f32, force_y: f32, force_z: f32) -> Self {
        Self {
            timestamp,
            force_x,
            force_y,
            force_z,
        }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn force_x(&self) -> f32 {
        self.force_x
    }

    pub fn force_y(&self) -> f32 {
        self.force_y
    }

    pub fn force_z(&self) -> f32 {
        self.force_z
    }
}
