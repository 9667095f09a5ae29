//! Planar geometry: positions on the 2D service area and Euclidean distance.
//!
//! Everything in the engine is measured in abstract distance units on a flat
//! plane. There is no road network; drivers move in straight lines.

use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::error::{DispatchError, DispatchResult};

/// Distance a driver covers in one movement step.
pub const DEFAULT_MOVE_STEP: f64 = 0.5;

/// Below this remaining distance a movement step lands exactly on the target.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.1;

/// A point on the service plane. Attached as a component to drivers and riders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Component, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rejects NaN or infinite coordinates.
    pub fn ensure_finite(self) -> DispatchResult<Self> {
        if self.is_finite() {
            Ok(self)
        } else {
            Err(DispatchError::InvalidPosition(self))
        }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns the position one step of length `step` closer to `target`.
    ///
    /// When the remaining distance is at most `snap_threshold` the result is
    /// `target` itself. The step is clamped to the remaining distance, so a
    /// driver never overshoots its target.
    pub fn step_towards(&self, target: &Position, step: f64, snap_threshold: f64) -> Position {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = dx.hypot(dy);
        if distance <= snap_threshold || distance <= step {
            return *target;
        }
        Position {
            x: self.x + (dx / distance) * step,
            y: self.y + (dy / distance) * step,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1},{:.1})", self.x, self.y)
    }
}

pub fn distance(a: &Position, b: &Position) -> f64 {
    a.distance_to(b)
}
