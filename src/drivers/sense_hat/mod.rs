//! Sense HAT 8x8 RGB LED matrix, exposed by the rpi-sense driver as a
//! framebuffer device.
use std::{
    fs::{self, File, OpenOptions},
    io,
    os::{fd::AsRawFd, unix::fs::FileExt},
    path::{Path, PathBuf},
};

use crate::{
    indicator::{Cell, Color, DisplaySink, GRID_SIZE},
    sink::SinkError,
};


/// Framebuffer name reported by the rpi-sense driver
pub const FB_NAME: &str = "RPi-Sense FB";

const GRAPHICS_CLASS_PATH: &str = "/sys/class/graphics";
const BYTES_PER_PIXEL: u64 = 2;

// Gamma reset ioctl and its table selectors
const GAMMA_DEFAULT: i32 = 0;
const GAMMA_LOW: i32 = 1;

nix::ioctl_write_int_bad!(reset_gamma, 0xF101);

/// Pack a color into the panel's RGB565 layout
pub fn rgb565(color: Color) -> [u8; 2] {
    let r = (color.r >> 3) as u16 & 0x1F;
    let g = (color.g >> 2) as u16 & 0x3F;
    let b = (color.b >> 3) as u16 & 0x1F;
    ((r << 11) | (g << 5) | b).to_le_bytes()
}

/// Returns the device node of the Sense HAT framebuffer
pub fn find_framebuffer() -> Result<PathBuf, SinkError> {
    let entries = fs::read_dir(GRAPHICS_CLASS_PATH)?;
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if !name.starts_with("fb") {
            continue;
        }
        let Ok(fb_name) = fs::read_to_string(entry.path().join("name")) else {
            continue;
        };
        log::trace!("Found framebuffer {name}: {}", fb_name.trim());
        if fb_name.trim() == FB_NAME {
            return Ok(PathBuf::from("/dev").join(name.as_ref()));
        }
    }

    Err(SinkError::Unavailable(format!(
        "no framebuffer named '{FB_NAME}'"
    )))
}

/// The LED matrix as a [DisplaySink]
#[derive(Debug)]
pub struct LedMatrix {
    path: PathBuf,
    file: File,
}

impl LedMatrix {
    /// Open the framebuffer at the given path
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        log::debug!("Opened LED matrix at {path:?}");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Find and open the Sense HAT framebuffer
    pub fn discover() -> Result<Self, SinkError> {
        let path = find_framebuffer()?;
        Self::open(path.as_path())
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Switch between the dimmed and the default gamma table
    pub fn set_low_light(&self, enabled: bool) -> Result<(), SinkError> {
        let table = if enabled { GAMMA_LOW } else { GAMMA_DEFAULT };
        // SAFETY: the fd is owned by self.file and the ioctl only takes an int
        unsafe { reset_gamma(self.file.as_raw_fd(), table) }.map_err(io::Error::from)?;
        Ok(())
    }
}

impl DisplaySink for LedMatrix {
    fn set_pixel(&mut self, cell: Cell, color: Color) -> Result<(), SinkError> {
        if cell.row >= GRID_SIZE || cell.col >= GRID_SIZE {
            return Err(SinkError::Unavailable(format!(
                "pixel out of range: {cell:?}"
            )));
        }
        let offset = (cell.row as u64 * GRID_SIZE as u64 + cell.col as u64) * BYTES_PER_PIXEL;
        self.file.write_all_at(&rgb565(color), offset)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        let size = (GRID_SIZE as usize) * (GRID_SIZE as usize) * BYTES_PER_PIXEL as usize;
        self.file.write_all_at(&vec![0; size], 0)?;
        Ok(())
    }
}
