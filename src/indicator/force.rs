use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{border_ring, Cell, Color, DisplayOp, IndicatorState, GRID_SIZE};
use crate::drivers::fse103::event::Reading;

/// Per-axis force thresholds, in sensor units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ForceThresholds {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for ForceThresholds {
    fn default() -> Self {
        Self {
            x: 2.0,
            y: 2.0,
            z: 5.0,
        }
    }
}

/// Lights coarse edge zones when a force threshold is crossed.
///
/// The zones are big, so every update clears the grid and redraws the whole
/// target set.
#[derive(Debug, Default)]
pub struct ForceIndicator {
    thresholds: ForceThresholds,
    state: IndicatorState,
}

impl ForceIndicator {
    pub fn new(thresholds: ForceThresholds) -> Self {
        Self {
            thresholds,
            state: IndicatorState::default(),
        }
    }

    pub fn thresholds(&self) -> &ForceThresholds {
        &self.thresholds
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    pub fn begin(&mut self) -> Vec<DisplayOp> {
        let ops = vec![DisplayOp::Clear];
        self.state.apply(&ops);
        ops
    }

    pub fn reset(&mut self) {
        self.state.apply(&[DisplayOp::Clear]);
    }

    /// Cells to light for the given reading, and their colors
    pub fn target(&self, reading: &Reading) -> BTreeMap<Cell, Color> {
        let mut target = BTreeMap::new();
        let t = &self.thresholds;

        // Contact: anything pressing on the face of the sensor
        if reading.force_z().abs() > t.z {
            for cell in border_ring() {
                target.insert(cell, Color::BORDER);
            }
        }

        let last = GRID_SIZE - 1;
        if reading.force_x() > t.x {
            for col in 0..GRID_SIZE {
                target.insert(Cell::new(last, col), Color::ACCENT);
            }
        }
        if reading.force_x() < -t.x {
            for col in 0..GRID_SIZE {
                target.insert(Cell::new(0, col), Color::ACCENT);
            }
        }
        if reading.force_y() > t.y {
            for row in 0..GRID_SIZE {
                target.insert(Cell::new(row, last), Color::ACCENT);
            }
        }
        if reading.force_y() < -t.y {
            for row in 0..GRID_SIZE {
                target.insert(Cell::new(row, 0), Color::ACCENT);
            }
        }

        target
    }

    /// Clear and redraw the grid for a new reading
    pub fn update(&mut self, reading: &Reading) -> Vec<DisplayOp> {
        let target = self.target(reading);
        let mut ops = Vec::with_capacity(target.len() + 1);
        ops.push(DisplayOp::Clear);
        ops.extend(
            target
                .into_iter()
                .map(|(cell, color)| DisplayOp::Set(cell, color)),
        );
        self.state.apply(&ops);
        ops
    }
}
