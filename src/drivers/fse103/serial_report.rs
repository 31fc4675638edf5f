use packed_struct::prelude::*;

use super::DataFormat;

// Force Data (bytes following the 0x0D marker)
// [13, 66, 00, 00, 04, d2, 3f, c0, 00, 00, c0, 20, 00, 00, 40, c0, 00, 00, 00]
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq, Default)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "19")]
pub struct ForceDataReport {
    #[packed_field(bytes = "0")]
    pub length: u8,
    #[packed_field(bytes = "1")]
    pub message_type: u8, // 'f' or 'r'
    #[packed_field(bytes = "2..=5", endian = "msb")]
    pub sensor_seconds: u32,
    #[packed_field(bytes = "6..=9", endian = "msb")]
    pub force_x_bits: u32,
    #[packed_field(bytes = "10..=13", endian = "msb")]
    pub force_y_bits: u32,
    #[packed_field(bytes = "14..=17", endian = "msb")]
    pub force_z_bits: u32,
    #[packed_field(bytes = "18")]
    pub stop: u8,
}

impl ForceDataReport {
    /// Build a report carrying the given force values
    pub fn new(format: DataFormat, sensor_seconds: u32, x: f32, y: f32, z: f32) -> Self {
        Self {
            length: super::REPORT_SIZE as u8,
            message_type: format.tag(),
            sensor_seconds,
            force_x_bits: x.to_bits(),
            force_y_bits: y.to_bits(),
            force_z_bits: z.to_bits(),
            stop: 0,
        }
    }

    pub fn force_x(&self) -> f32 {
        f32::from_bits(self.force_x_bits)
    }

    pub fn force_y(&self) -> f32 {
        f32::from_bits(self.force_y_bits)
    }

    pub fn force_z(&self) -> f32 {
        f32::from_bits(self.force_z_bits)
    }

    /// Format the frame is tagged with, if the tag is a known one
    pub fn data_format(&self) -> Option<DataFormat> {
        DataFormat::from_tag(self.message_type)
    }

    pub fn is_stop(&self) -> bool {
        self.stop != 0
    }
}
