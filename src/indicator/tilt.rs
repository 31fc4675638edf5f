//! Bubble level: a 2x2 cursor that slides toward the low side of the device.
//!
//! Each axis falls into one of three zones around a deadband, and each zone
//! maps to a fixed bubble position. There is no hysteresis, so a signal
//! sitting right on the deadband edge can flip zones every cycle.
use super::{border_ring, Cell, Color, DisplayOp, IndicatorState};
use crate::drivers::iio_accel::event::Acceleration;

/// Default deadband, in g
pub const DEFAULT_DEADBAND: f64 = 0.1;

/// Where a single axis reading falls relative to the deadband
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Neutral,
    ShiftedNegative,
    ShiftedPositive,
}

impl Zone {
    /// Classify a signal. Values on the deadband edge count as shifted.
    pub fn classify(signal: f64, deadband: f64) -> Zone {
        if signal >= deadband {
            Zone::ShiftedPositive
        } else if signal <= -deadband {
            Zone::ShiftedNegative
        } else {
            Zone::Neutral
        }
    }

    /// Lower bubble coordinate for this zone
    pub fn first_cell(&self) -> u8 {
        match self {
            Zone::ShiftedPositive => 2,
            Zone::Neutral => 3,
            Zone::ShiftedNegative => 4,
        }
    }
}

/// Grid coordinates of the 2x2 bubble. x indexes columns, y indexes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltBubble {
    x1: u8,
    x2: u8,
    y1: u8,
    y2: u8,
}

impl TiltBubble {
    pub fn from_zones(x: Zone, y: Zone) -> Self {
        let x1 = x.first_cell();
        let y1 = y.first_cell();
        Self {
            x1,
            x2: x1 + 1,
            y1,
            y2: y1 + 1,
        }
    }

    /// (x1, x2, y1, y2)
    pub fn coordinates(&self) -> (u8, u8, u8, u8) {
        (self.x1, self.x2, self.y1, self.y2)
    }

    fn cell(x: u8, y: u8) -> Cell {
        Cell::new(y, x)
    }

    /// The four lit cells
    pub fn cells(&self) -> [Cell; 4] {
        [
            Self::cell(self.x1, self.y1),
            Self::cell(self.x1, self.y2),
            Self::cell(self.x2, self.y1),
            Self::cell(self.x2, self.y2),
        ]
    }
}

impl Default for TiltBubble {
    fn default() -> Self {
        Self::from_zones(Zone::Neutral, Zone::Neutral)
    }
}

/// Writes that move the bubble from `previous` to `next`.
///
/// For every coordinate that changed, the two cells that used its old value
/// are turned off. Cells that are part of the new bubble are left alone
/// instead of being blinked off. The four new cells are then always written,
/// so at most 8 off and 4 on writes are produced.
pub fn diff(previous: Option<&TiltBubble>, next: &TiltBubble) -> Vec<DisplayOp> {
    let mut off = Vec::with_capacity(8);
    if let Some(prev) = previous {
        if next.x1 != prev.x1 {
            off.push(TiltBubble::cell(prev.x1, prev.y1));
            off.push(TiltBubble::cell(prev.x1, prev.y2));
        }
        if next.x2 != prev.x2 {
            off.push(TiltBubble::cell(prev.x2, prev.y1));
            off.push(TiltBubble::cell(prev.x2, prev.y2));
        }
        if next.y1 != prev.y1 {
            off.push(TiltBubble::cell(prev.x1, prev.y1));
            off.push(TiltBubble::cell(prev.x2, prev.y1));
        }
        if next.y2 != prev.y2 {
            off.push(TiltBubble::cell(prev.x1, prev.y2));
            off.push(TiltBubble::cell(prev.x2, prev.y2));
        }
    }

    let on = next.cells();
    let mut ops = Vec::with_capacity(off.len() + on.len());
    let mut cleared: Vec<Cell> = Vec::with_capacity(off.len());
    for cell in off {
        if on.contains(&cell) || cleared.contains(&cell) {
            continue;
        }
        cleared.push(cell);
        ops.push(DisplayOp::Set(cell, Color::OFF));
    }
    ops.extend(on.into_iter().map(|cell| DisplayOp::Set(cell, Color::BUBBLE)));

    ops
}

/// Tracks the bubble across cycles and emits minimal updates
#[derive(Debug)]
pub struct TiltIndicator {
    deadband: f64,
    previous: Option<TiltBubble>,
    state: IndicatorState,
}

impl Default for TiltIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEADBAND)
    }
}

impl TiltIndicator {
    pub fn new(deadband: f64) -> Self {
        Self {
            deadband,
            previous: None,
            state: IndicatorState::default(),
        }
    }

    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    /// Bubble drawn by the last update, if any
    pub fn bubble(&self) -> Option<&TiltBubble> {
        self.previous.as_ref()
    }

    pub fn state(&self) -> &IndicatorState {
        &self.state
    }

    /// Clear the grid and draw the static frame. The bubble appears on the
    /// first update.
    pub fn begin(&mut self) -> Vec<DisplayOp> {
        self.previous = None;
        let mut ops = vec![DisplayOp::Clear];
        ops.extend(
            border_ring()
                .into_iter()
                .map(|cell| DisplayOp::Set(cell, Color::BORDER)),
        );
        self.state.apply(&ops);
        ops
    }

    pub fn reset(&mut self) {
        self.previous = None;
        self.state.apply(&[DisplayOp::Clear]);
    }

    /// Move the bubble to match the given acceleration
    pub fn update(&mut self, accel: &Acceleration) -> Vec<DisplayOp> {
        let x = Zone::classify(accel.x, self.deadband);
        let y = Zone::classify(accel.y, self.deadband);
        let next = TiltBubble::from_zones(x, y);
        log::trace!("Tilt x={:.3} ({x:?}) y={:.3} ({y:?})", accel.x, accel.y);

        let ops = diff(self.previous.as_ref(), &next);
        self.state.apply(&ops);
        self.previous = Some(next);
        ops
    }
}
