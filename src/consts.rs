//! Shared constants for the widget engine.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor accepted by default.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest zoom factor accepted by default.
pub const ZOOM_MAX: f64 = 20.0;

/// Multiplicative zoom step applied per zoom-in / zoom-out / wheel tick.
pub const ZOOM_STEP: f64 = 1.1;

/// Distance from 1.0, in `log10` space, under which clip mode snaps back to
/// the original view box.
pub const ZOOM_SNAP_EPSILON: f64 = 1e-3;

// ── Timing ──────────────────────────────────────────────────────

/// Minimum interval between two view box writes while panning.
pub const PAN_TICK_MS: f64 = 40.0;

/// Delay before a single click on a button is reported.
pub const DBLCLICK_TIMEOUT_MS: f64 = 250.0;

/// Quiet period after the last pointer move before hover is reported.
pub const HOVER_TIMEOUT_MS: f64 = 400.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Prefix given to ids inside selection clones.
pub const SELECTION_PREFIX: &str = "selection.-_-.";

/// Prefix given to ids inside the hover clone.
pub const HOVER_PREFIX: &str = "hover.-_-.";

/// Id of the single hover clone.
pub const HOVER_CLONE_ID: &str = "hovered_shape";

/// Attribute holding the source element id on the hover clone.
pub const SOURCE_ATTR: &str = "data-element";

/// Tags restyled as drawable outlines in highlight clones.
pub const STRUCTURE_SHAPES: [&str; 7] = ["rect", "circle", "ellipse", "line", "polyline", "polygon", "path"];

// ── Tooltip ─────────────────────────────────────────────────────

/// Horizontal tooltip offset from the pointer, in CSS pixels.
pub const TOOLTIP_OFFSET_X: f64 = 10.0;

/// Vertical tooltip offset from the pointer, in CSS pixels.
pub const TOOLTIP_OFFSET_Y: f64 = 15.0;

// ── Export ──────────────────────────────────────────────────────

/// Download name for SVG exports.
pub const SVG_FILE_NAME: &str = "image.svg";

/// Download name for PNG exports.
pub const PNG_FILE_NAME: &str = "image.png";

/// XML prolog prepended to SVG exports.
pub const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// SVG namespace URI.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// XLink namespace URI.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
