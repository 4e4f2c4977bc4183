//! Markup views of the document.
//!
//! The document is the source of truth; these functions only decide which
//! root attributes and which layers a given consumer sees.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::SVG_NS;
use crate::doc::{NodeId, SerializeOptions, SvgDoc};
use crate::viewport::ViewBox;

/// Live view: fills its container, shows the current view box and the overlay.
#[must_use]
pub fn view_markup(doc: &SvgDoc, view_box: Option<ViewBox>, sanitize: bool) -> String {
    let mut root_attrs = vec![
        ("width".to_string(), Some("100%".to_string())),
        ("height".to_string(), Some("100%".to_string())),
    ];
    if let Some(vb) = view_box {
        root_attrs.push(("viewBox".to_string(), Some(vb.to_string())));
    }
    doc.to_markup(&SerializeOptions { root_attrs, skip: Vec::new(), sanitize_attributes: sanitize })
}

/// Core content: no overlay, original view box restored.
#[must_use]
pub fn core_markup(doc: &SvgDoc, original: Option<ViewBox>, overlay: Option<NodeId>, sanitize: bool) -> String {
    let root_attrs = original.map(|vb| ("viewBox".to_string(), Some(vb.to_string()))).into_iter().collect();
    doc.to_markup(&SerializeOptions { root_attrs, skip: overlay.into_iter().collect(), sanitize_attributes: sanitize })
}

/// Standalone rendering at `scale`: explicit pixel size and the original view
/// box, overlay included, as shown on screen.
#[must_use]
pub fn raster_markup(doc: &SvgDoc, original: ViewBox, scale: f64) -> String {
    let root_attrs = vec![
        ("version".to_string(), Some("1.1".to_string())),
        ("xmlns".to_string(), Some(SVG_NS.to_string())),
        ("width".to_string(), Some((original.w * scale).to_string())),
        ("height".to_string(), Some((original.h * scale).to_string())),
        ("viewBox".to_string(), Some(original.to_string())),
    ];
    doc.to_markup(&SerializeOptions { root_attrs, skip: Vec::new(), sanitize_attributes: true })
}
