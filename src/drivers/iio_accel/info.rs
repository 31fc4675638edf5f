use std::fmt;

use super::driver::AccelError;
use super::event::Acceleration;

/// The [MountMatrix] is used to define how sensors are oriented inside a device
/// https://github.com/torvalds/linux/blob/master/Documentation/devicetree/bindings/iio/mount-matrix.txt
#[derive(Clone, Debug, PartialEq)]
pub struct MountMatrix {
    pub x: (f64, f64, f64),
    pub y: (f64, f64, f64),
    pub z: (f64, f64, f64),
}

impl MountMatrix {
    /// Create a new [MountMatrix] from the given mount matrix string
    /// Example:
    /// "1, 0, 0; 0, 1, 0; 0, 0, 1"
    pub fn new(matrix_str: &str) -> Result<Self, AccelError> {
        let rows: Vec<&str> = matrix_str.split(';').map(|part| part.trim()).collect();
        if rows.len() != 3 {
            return Err(AccelError::MountMatrix(matrix_str.to_string()));
        }

        let mut parsed = [(0.0, 0.0, 0.0); 3];
        for (i, row) in rows.into_iter().enumerate() {
            let values: Vec<f64> = row
                .split(',')
                .map(|part| part.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| AccelError::MountMatrix(matrix_str.to_string()))?;
            let [x, y, z] = values.as_slice() else {
                return Err(AccelError::MountMatrix(matrix_str.to_string()));
            };
            parsed[i] = (*x, *y, *z);
        }

        Ok(MountMatrix {
            x: parsed[0],
            y: parsed[1],
            z: parsed[2],
        })
    }

    /// Rotate the given values according to the mount matrix.
    //   x' = mxx * x + myx * y + mzx * z
    //   y' = mxy * x + myy * y + mzy * z
    //   z' = mxz * x + myz * y + mzz * z
    pub fn rotate(&self, value: Acceleration) -> Acceleration {
        let Acceleration { x, y, z } = value;
        Acceleration {
            x: self.x.0 * x + self.x.1 * y + self.x.2 * z,
            y: self.y.0 * x + self.y.1 * y + self.y.2 * z,
            z: self.z.0 * x + self.z.1 * y + self.z.2 * z,
        }
    }
}

impl Default for MountMatrix {
    fn default() -> Self {
        MountMatrix {
            x: (1.0, 0.0, 0.0),
            y: (0.0, 1.0, 0.0),
            z: (0.0, 0.0, 1.0),
        }
    }
}

impl fmt::Display for MountMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}; {}, {}, {}; {}, {}, {}",
            self.x.0,
            self.x.1,
            self.x.2,
            self.y.0,
            self.y.1,
            self.y.2,
            self.z.0,
            self.z.1,
            self.z.2,
        )
    }
}

/// The scale and offset information for a particular axis. These are used to
/// normalize data into real units.
///   processed_value = (raw + offset) * scale
#[derive(Clone, Debug, PartialEq)]
pub struct AxisInfo {
    pub offset: i64,
    pub scale: f64,
}

impl Default for AxisInfo {
    fn default() -> Self {
        Self {
            offset: 0,
            scale: 1.0,
        }
    }
}

impl AxisInfo {
    /// Convert a raw channel value into m/s^2
    pub fn process(&self, raw: i64) -> f64 {
        (raw + self.offset) as f64 * self.scale
    }
}
