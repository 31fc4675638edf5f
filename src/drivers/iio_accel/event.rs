/// Acceleration along each axis in units of g. At rest, the axis pointing
/// down reads about 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
