#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM};

/// A point in screen space (CSS pixels, relative to the viewport's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Midpoint of the surface.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether either dimension is zero (or not yet measured).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Pan/zoom transform for the map surface.
///
/// Applied as `translate(offset) then scale(zoom)` with the origin at the
/// top-left corner. `offset_x` / `offset_y` are in CSS pixels; `zoom` is a
/// scale factor that always stays within [`MIN_ZOOM`, `MAX_ZOOM`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Camera at `zoom` (clamped) centered on a surface of `size`.
    #[must_use]
    pub fn centered(zoom: f64, size: Size) -> Self {
        let zoom = clamp_zoom(zoom);
        let offset = center_offset_for(zoom, size.width, size.height);
        Self { offset_x: offset.x, offset_y: offset.y, zoom }
    }

    /// Current offset as a point.
    #[must_use]
    pub fn offset(&self) -> Point {
        Point::new(self.offset_x, self.offset_y)
    }

    /// Multiply zoom by `factor`, keeping the content under `origin` fixed on screen.
    ///
    /// The new zoom is clamped to [`MIN_ZOOM`, `MAX_ZOOM`]. When clamping leaves
    /// the zoom unchanged the offset is left alone too, so repeated presses at a
    /// boundary cannot drift the view. Returns whether anything changed.
    #[allow(clippy::float_cmp)]
    pub fn zoom_at(&mut self, factor: f64, origin: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !origin.x.is_finite() || !origin.y.is_finite() {
            return false;
        }
        let next = clamp_zoom(self.zoom * factor);
        if next == self.zoom {
            return false;
        }
        let ratio = next / self.zoom;
        self.offset_x = origin.x - (origin.x - self.offset_x) * ratio;
        self.offset_y = origin.y - (origin.y - self.offset_y) * ratio;
        self.zoom = next;
        true
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }

    /// Keep the current zoom and recenter on a surface of `size`.
    pub fn recenter(&mut self, size: Size) {
        let offset = center_offset_for(self.zoom, size.width, size.height);
        self.offset_x = offset.x;
        self.offset_y = offset.y;
    }

    /// Map a content-space point (unscaled surface pixels) to the screen.
    #[must_use]
    pub fn content_to_screen(&self, content: Point) -> Point {
        Point {
            x: self.offset_x + content.x * self.zoom,
            y: self.offset_y + content.y * self.zoom,
        }
    }

    /// Map a screen point back into content space.
    #[must_use]
    pub fn screen_to_content(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.zoom,
            y: (screen.y - self.offset_y) / self.zoom,
        }
    }
}

/// Clamp a zoom factor into [`MIN_ZOOM`, `MAX_ZOOM`].
///
/// `NaN` collapses to `1.0`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Offset that centers a `width × height` surface scaled by `zoom` within itself.
///
/// An unmeasured surface (either side zero) yields the origin.
#[must_use]
pub fn center_offset_for(zoom: f64, width: f64, height: f64) -> Point {
    if !(width > 0.0 && height > 0.0) {
        return Point::default();
    }
    Point {
        x: (width - width * zoom) / 2.0,
        y: (height - height * zoom) / 2.0,
    }
}
