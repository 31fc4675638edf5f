use std::error::Error;

use packed_struct::PackedStruct;

use crate::drivers::fse103::{serial_report::ForceDataReport, DataFormat};

// Example frame body, marker stripped:
// length 19, 'f', 1234 s, x 1.5, y -2.5, z 6.0, stop 0
const FORCE_FRAME: [u8; 19] = [
    0x13, 0x66, 0x00, 0x00, 0x04, 0xd2, 0x3f, 0xc0, 0x00, 0x00, 0xc0, 0x20, 0x00, 0x00, 0x40,
    0xc0, 0x00, 0x00, 0x00,
];

#[tokio::test]
async fn test_unpack_force_report() -> Result<(), Box<dyn Error>> {
    let report = ForceDataReport::unpack(&FORCE_FRAME)?;

    assert_eq!(report.length, 19);
    assert_eq!(report.data_format(), Some(DataFormat::Force));
    assert_eq!(report.sensor_seconds, 1234);
    assert_eq!(report.force_x(), 1.5);
    assert_eq!(report.force_y(), -2.5);
    assert_eq!(report.force_z(), 6.0);
    assert!(!report.is_stop());

    Ok(())
}

#[tokio::test]
async fn test_numeric_fields_repack_to_original_bytes() -> Result<(), Box<dyn Error>> {
    let frames: [[u8; 19]; 3] = [
        FORCE_FRAME,
        // raw counts, odd bit patterns including a NaN payload
        [
            0x13, 0x72, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xc0, 0x00, 0x01, 0x80, 0x00, 0x00, 0x00,
            0x0d, 0x0d, 0x0d, 0x0d, 0x01,
        ],
        [
            0x13, 0x66, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, 0x7f, 0xff, 0xff,
            0x42, 0x28, 0x00, 0x00, 0x00,
        ],
    ];

    for frame in frames {
        let report = ForceDataReport::unpack(&frame)?;
        let rebuilt = ForceDataReport {
            length: report.length,
            message_type: report.message_type,
            sensor_seconds: report.sensor_seconds,
            force_x_bits: report.force_x().to_bits(),
            force_y_bits: report.force_y().to_bits(),
            force_z_bits: report.force_z().to_bits(),
            stop: report.stop,
        };
        assert_eq!(rebuilt.pack()?, frame);
    }

    Ok(())
}

#[tokio::test]
async fn test_new_report_layout() -> Result<(), Box<dyn Error>> {
    let report = ForceDataReport::new(DataFormat::Force, 1234, 1.5, -2.5, 6.0);
    assert_eq!(report.pack()?, FORCE_FRAME);

    let raw = ForceDataReport::new(DataFormat::Raw, 0, 0.0, 0.0, 0.0);
    assert_eq!(raw.pack()?[1], b'r');

    Ok(())
}
