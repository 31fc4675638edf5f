//! Drives the 8x8 LED grid from force readings or device tilt.
//!
//! State machines here never touch hardware. Each update returns the list of
//! [DisplayOp] writes needed to move the grid from its previous state to the
//! new one, and the caller hands that list to a [DisplaySink].
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sink::SinkError;

pub mod force;
pub mod tilt;


pub use force::{ForceIndicator, ForceThresholds};
pub use tilt::{TiltBubble, TiltIndicator, Zone};

/// Width and height of the LED grid
pub const GRID_SIZE: u8 = 8;

/// A single LED on the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const OFF: Color = Color::new(0, 0, 0);
    /// Light green frame
    pub const BORDER: Color = Color::new(0, 150, 0);
    /// Force threshold exceeded
    pub const ACCENT: Color = Color::new(255, 0, 0);
    pub const BUBBLE: Color = Color::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_off(&self) -> bool {
        *self == Color::OFF
    }
}

/// One write to the display
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayOp {
    Clear,
    Set(Cell, Color),
}

/// Anything that can show the LED grid
pub trait DisplaySink {
    fn set_pixel(&mut self, cell: Cell, color: Color) -> Result<(), SinkError>;
    fn clear(&mut self) -> Result<(), SinkError>;

    /// Apply a batch of writes in order
    fn apply(&mut self, ops: &[DisplayOp]) -> Result<(), SinkError> {
        for op in ops {
            match op {
                DisplayOp::Clear => self.clear()?,
                DisplayOp::Set(cell, color) => self.set_pixel(*cell, *color)?,
            }
        }
        Ok(())
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn set_pixel(&mut self, cell: Cell, color: Color) -> Result<(), SinkError> {
        (**self).set_pixel(cell, color)
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        (**self).clear()
    }
}

/// Stand-in used when no LED hardware is attached
#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn set_pixel(&mut self, cell: Cell, color: Color) -> Result<(), SinkError> {
        log::trace!("Set pixel {cell:?} to {color:?}");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SinkError> {
        log::trace!("Clear display");
        Ok(())
    }
}

/// Which signal drives the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    /// Light edge zones when force thresholds are crossed
    #[default]
    Force,
    /// Track device tilt with a 2x2 bubble
    Tilt,
}

/// The set of cells currently lit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndicatorState {
    highlighted: std::collections::BTreeSet<Cell>,
}

impl IndicatorState {
    pub fn is_lit(&self, cell: &Cell) -> bool {
        self.highlighted.contains(cell)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.highlighted.iter()
    }

    pub fn len(&self) -> usize {
        self.highlighted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlighted.is_empty()
    }

    /// Bring the state in line with a batch of writes
    pub fn apply(&mut self, ops: &[DisplayOp]) {
        for op in ops {
            match op {
                DisplayOp::Clear => self.highlighted.clear(),
                DisplayOp::Set(cell, color) if color.is_off() => {
                    self.highlighted.remove(cell);
                }
                DisplayOp::Set(cell, _) => {
                    self.highlighted.insert(*cell);
                }
            }
        }
    }
}

/// Ring at rows/cols 1 and 6. Frames the bubble playfield in tilt mode and
/// doubles as the contact signal in force mode.
pub fn border_ring() -> Vec<Cell> {
    let mut cells = Vec::new();
    for row in 1..=6 {
        for col in 1..=6 {
            if row == 1 || row == 6 || col == 1 || col == 6 {
                cells.push(Cell::new(row, col));
            }
        }
    }
    cells
}

/// Indicator state machine for the configured mode
#[derive(Debug)]
pub enum Indicator {
    Force(ForceIndicator),
    Tilt(TiltIndicator),
}

impl Indicator {
    pub fn mode(&self) -> IndicatorMode {
        match self {
            Indicator::Force(_) => IndicatorMode::Force,
            Indicator::Tilt(_) => IndicatorMode::Tilt,
        }
    }

    /// Writes that put the grid in its starting state
    pub fn begin(&mut self) -> Vec<DisplayOp> {
        match self {
            Indicator::Force(indicator) => indicator.begin(),
            Indicator::Tilt(indicator) => indicator.begin(),
        }
    }

    /// Forget what is lit after the display was cleared externally
    pub fn reset(&mut self) {
        match self {
            Indicator::Force(indicator) => indicator.reset(),
            Indicator::Tilt(indicator) => indicator.reset(),
        }
    }

    /// Cells the state machine believes are lit
    pub fn state(&self) -> &IndicatorState {
        match self {
            Indicator::Force(indicator) => indicator.state(),
            Indicator::Tilt(indicator) => indicator.state(),
        }
    }
}
