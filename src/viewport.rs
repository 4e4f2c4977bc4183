//! View box state: zoom, wheel zoom, drag-pan and reset.
//!
//! The viewport never touches a rendering surface. It owns the numbers that
//! end up in the root `viewBox` attribute and the zoom factor they correspond
//! to; the engine reads [`Viewport::view_box`] when it re-renders.
//!
//! Nothing here is usable until [`Viewport::capture_original`] has recorded the
//! content box. Before that, every zoom, pan and reset is a silent no-op.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::fmt;

use serde::Serialize;

use crate::consts::ZOOM_SNAP_EPSILON;
use crate::transform;

/// A point in either screen or content space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
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

/// An on-screen rectangle in CSS pixels (`x`/`y` is the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// The window of content space mapped onto the rendering area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ViewBox {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Width and height are positive and every component is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.w > 0.0 && self.h > 0.0 && [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite())
    }

    /// Parse a `viewBox` attribute value (`"x y w h"`, comma or space separated).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut nums = Vec::with_capacity(4);
        for tok in raw.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
            let Ok(v) = tok.parse::<f64>() else {
                return None;
            };
            nums.push(v);
        }
        let [x, y, w, h] = nums[..] else {
            return None;
        };
        let vb = Self { x, y, w, h };
        vb.is_valid().then_some(vb)
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.w, self.h)
    }
}

/// Zoom limits and behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Snap back to the original view box (and lock panning) at zoom 1.
    pub clip: bool,
}

/// Pan gesture bookkeeping between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy)]
struct PanGesture {
    /// Pointer position the view box currently reflects.
    applied: Point,
    /// Most recent pointer sample, not yet applied.
    latest: Point,
    /// Content units per screen pixel, horizontally and vertically.
    ratio_x: f64,
    ratio_y: f64,
}

/// View box and zoom state for one widget.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ZoomConfig,
    zoom: f64,
    view_box: Option<ViewBox>,
    original: Option<ViewBox>,
    screen: Rect,
    stop_zoom: bool,
    moved: bool,
    pan: Option<PanGesture>,
}

impl Viewport {
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            zoom: 1.0,
            view_box: None,
            original: None,
            screen: Rect::default(),
            stop_zoom: false,
            moved: false,
            pan: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn view_box(&self) -> Option<ViewBox> {
        self.view_box
    }

    #[must_use]
    pub fn original(&self) -> Option<ViewBox> {
        self.original
    }

    #[must_use]
    pub fn screen(&self) -> Rect {
        self.screen
    }

    #[must_use]
    pub fn config(&self) -> ZoomConfig {
        self.config
    }

    /// Whether the last pan gesture actually moved the view box.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.moved
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Clip mode is on and the zoom is (within tolerance) back at 1.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.config.clip && is_unit_zoom(self.zoom)
    }

    /// Map a screen point into content space through the current view box.
    #[must_use]
    pub fn screen_to_content(&self, point: Point) -> Option<Point> {
        transform::screen_to_content(point, self.screen, self.view_box?)
    }

    // --- Setup ---

    /// Record the on-screen box of the SVG root.
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Record the content box as the original view box and display it.
    ///
    /// Only the first valid capture is kept; returns whether this call captured.
    pub fn capture_original(&mut self, content: ViewBox) -> bool {
        if self.original.is_some() || !content.is_valid() {
            return false;
        }
        self.original = Some(content);
        self.view_box = Some(content);
        self.zoom = 1.0;
        true
    }

    /// Replace the saved original after the content changed, leaving the
    /// displayed view box alone.
    pub fn update_original(&mut self, content: ViewBox) -> bool {
        if self.original.is_none() || !content.is_valid() {
            return false;
        }
        self.original = Some(content);
        true
    }

    // --- Zoom ---

    /// Zoom in by one step, keeping the top-left corner anchored.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.step)
    }

    /// Zoom out by one step, keeping the top-left corner anchored.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(1.0 / self.config.step)
    }

    fn zoom_by(&mut self, factor: f64) -> bool {
        let (Some(vb), Some(_)) = (self.view_box, self.original) else {
            return false;
        };
        let Some(next) = self.admit(factor) else {
            return false;
        };
        if self.snap(next) {
            return true;
        }
        self.zoom = next;
        self.view_box = Some(ViewBox::new(vb.x, vb.y, vb.w / factor, vb.h / factor));
        true
    }

    /// Pointer-centered zoom. `delta_y > 0` zooms out, `delta_y < 0` zooms in.
    pub fn wheel_zoom(&mut self, pointer: Point, delta_y: f64) -> bool {
        if self.stop_zoom {
            self.stop_zoom = false;
            return false;
        }
        if delta_y == 0.0 {
            return false;
        }
        let (Some(vb), Some(_)) = (self.view_box, self.original) else {
            return false;
        };
        let Some(before) = transform::screen_to_content(pointer, self.screen, vb) else {
            return false;
        };
        let factor = if delta_y > 0.0 { 1.0 / self.config.step } else { self.config.step };
        let Some(next) = self.admit(factor) else {
            return false;
        };
        if self.snap(next) {
            self.stop_zoom = true;
            return true;
        }

        let resized = ViewBox::new(vb.x, vb.y, vb.w / factor, vb.h / factor);
        let Some(after) = transform::screen_to_content(pointer, self.screen, resized) else {
            return false;
        };
        self.zoom = next;
        self.view_box = Some(ViewBox::new(
            vb.x - (after.x - before.x),
            vb.y - (after.y - before.y),
            resized.w,
            resized.h,
        ));
        true
    }

    /// Restore the original view box and zoom 1. No-op before capture.
    pub fn reset(&mut self) -> bool {
        let Some(original) = self.original else {
            return false;
        };
        self.view_box = Some(original);
        self.zoom = 1.0;
        true
    }

    /// The zoom after applying `factor`, if it stays within bounds.
    fn admit(&self, factor: f64) -> Option<f64> {
        let next = self.zoom * factor;
        (next >= self.config.min && next <= self.config.max).then_some(next)
    }

    /// In clip mode, snap to the original view box when `next` is ~1.
    fn snap(&mut self, next: f64) -> bool {
        if !self.config.clip || !is_unit_zoom(next) {
            return false;
        }
        self.zoom = 1.0;
        self.view_box = self.original;
        true
    }

    // --- Pan ---

    /// Start a pan gesture at `pointer`. Resets the drag flag unconditionally;
    /// returns whether a gesture actually started.
    pub fn begin_pan(&mut self, pointer: Point) -> bool {
        self.moved = false;
        self.pan = None;
        if self.is_locked() {
            return false;
        }
        let Some(vb) = self.view_box else {
            return false;
        };
        let (rw, rh) = (self.screen.width, self.screen.height);
        if rw <= 0.0 || rh <= 0.0 {
            return false;
        }

        // The limiting dimension decides how many content units a pixel spans.
        let screen_ratio = rw / rh;
        let (dw, dh) = if vb.w / vb.h >= screen_ratio { (vb.w, vb.w / screen_ratio) } else { (vb.h * screen_ratio, vb.h) };

        self.pan = Some(PanGesture { applied: pointer, latest: pointer, ratio_x: dw / rw, ratio_y: dh / rh });
        true
    }

    /// Record a pointer sample for the active gesture. Returns `false` when no
    /// gesture is active.
    pub fn pan_sample(&mut self, pointer: Point) -> bool {
        match self.pan.as_mut() {
            Some(gesture) => {
                gesture.latest = pointer;
                true
            }
            None => false,
        }
    }

    /// Apply the latest sample to the view box. Safe to call after the gesture
    /// ended; returns whether the view box changed.
    pub fn pan_tick(&mut self) -> bool {
        let (Some(gesture), Some(vb)) = (self.pan.as_mut(), self.view_box) else {
            return false;
        };
        let dx = gesture.applied.x - gesture.latest.x;
        let dy = gesture.applied.y - gesture.latest.y;
        gesture.applied = gesture.latest;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.view_box = Some(ViewBox::new(vb.x + dx * gesture.ratio_x, vb.y + dy * gesture.ratio_y, vb.w, vb.h));
        self.moved = true;
        true
    }

    /// Finish the gesture, applying any pending sample first.
    pub fn end_pan(&mut self) -> bool {
        let changed = self.pan_tick();
        self.pan = None;
        changed
    }
}

/// `zoom` is 1 within the snap tolerance (in `log10` space).
#[must_use]
pub fn is_unit_zoom(zoom: f64) -> bool {
    zoom.log10().abs() < ZOOM_SNAP_EPSILON
}
