//! Input model: mouse buttons, pointer targets, wheel deltas and the drag gesture.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. A drag records its anchor once, at pointer-down, so the final
//! offset depends only on where the pointer ends up and never on how many
//! move events arrived in between.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::entity::PlayerId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// What the pointer landed on, as resolved by the host's hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Bare map surface (image or empty overlay).
    Surface,
    /// A player marker.
    Marker(PlayerId),
    /// A floating control: zoom buttons or the settings panel.
    Overlay,
}

/// A keyboard key as reported by the browser (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, i.e. zoom out).
    pub dy: f64,
}

impl WheelDelta {
    /// Whether this delta asks to zoom in. Only the sign of `dy` matters.
    #[must_use]
    pub fn zooms_in(&self) -> bool {
        self.dy < 0.0
    }
}

/// Active gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The user is dragging the map with the primary button held.
    Panning {
        /// Pointer position minus camera offset, captured at pointer-down.
        anchor: Point,
    },
}

impl InputState {
    /// Begin a drag at `pointer` with the camera currently at `offset`.
    #[must_use]
    pub fn start_pan(pointer: Point, offset: Point) -> Self {
        Self::Panning { anchor: Point::new(pointer.x - offset.x, pointer.y - offset.y) }
    }

    /// Offset the camera should take with the pointer at `pointer`, if dragging.
    #[must_use]
    pub fn pan_offset(&self, pointer: Point) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::Panning { anchor } => Some(Point::new(pointer.x - anchor.x, pointer.y - anchor.y)),
        }
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }
}
