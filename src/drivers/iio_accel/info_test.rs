use std::error::Error;

use crate::drivers::iio_accel::{
    event::Acceleration,
    info::{AxisInfo, MountMatrix},
};

#[test]
fn test_parse_mount_matrix() -> Result<(), Box<dyn Error>> {
    let matrix = MountMatrix::new("0, 1, 0; -1, 0, 0; 0, 0, 1")?;
    assert_eq!(matrix.x, (0.0, 1.0, 0.0));
    assert_eq!(matrix.y, (-1.0, 0.0, 0.0));
    assert_eq!(matrix.z, (0.0, 0.0, 1.0));

    let rotated = matrix.rotate(Acceleration::new(0.5, 0.25, 1.0));
    assert_eq!(rotated, Acceleration::new(0.25, -0.5, 1.0));

    Ok(())
}

#[test]
fn test_bad_mount_matrix() {
    assert!(MountMatrix::new("1, 0, 0; 0, 1, 0").is_err());
    assert!(MountMatrix::new("1, 0; 0, 1, 0; 0, 0, 1").is_err());
    assert!(MountMatrix::new("1, 0, a; 0, 1, 0; 0, 0, 1").is_err());
}

#[test]
fn test_identity_round_trips_display() -> Result<(), Box<dyn Error>> {
    let matrix = MountMatrix::default();
    let parsed = MountMatrix::new(matrix.to_string().as_str())?;
    assert_eq!(parsed, matrix);
    Ok(())
}

#[test]
fn test_axis_processing() {
    let info = AxisInfo {
        offset: 10,
        scale: 0.5,
    };
    assert_eq!(info.process(-4), 3.0);
    assert_eq!(AxisInfo::default().process(7), 7.0);
}
