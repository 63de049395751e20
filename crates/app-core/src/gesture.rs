//! Shared gesture state.
//!
//! The detection callback is the only writer; the render tick reads one
//! [`GestureState`] snapshot per frame and hands it to every consumer by
//! value, so no component can see two different poses within one frame.

use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

/// Discrete hand pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pose {
    /// Closed hand: particles assemble into their formations, media hides.
    #[default]
    Fist,
    /// Spread fingers: particles disperse into the nebula, media shows.
    Open,
}

impl Pose {
    #[inline]
    pub fn is_fist(self) -> bool {
        matches!(self, Pose::Fist)
    }

    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, Pose::Open)
    }
}

/// Latest classifier output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureState {
    /// Hand centroid in scene units, Y up. Zero when no hand is present.
    pub position: Vec2,
    pub pose: Pose,
    /// Thumb-tip to index-tip distance in normalized image units.
    pub pinch_distance: f32,
    pub hand_present: bool,
}

impl Default for GestureState {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            pose: Pose::Fist,
            pinch_distance: 0.0,
            hand_present: false,
        }
    }
}

impl GestureState {
    /// State emitted for a detection cycle without a usable hand.
    pub fn absent(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::default()
        }
    }
}

/// Cloneable handle over the process-wide gesture cell.
///
/// Writes replace the whole state (last write wins); reads copy it out.
#[derive(Clone, Debug, Default)]
pub struct GestureStore {
    cell: Rc<Cell<GestureState>>,
}

impl GestureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, state: GestureState) {
        self.cell.set(state);
    }

    pub fn snapshot(&self) -> GestureState {
        self.cell.get()
    }
}
