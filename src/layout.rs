//! Content measurement for the original view box.
//!
//! In a browser the box comes from the live DOM and the host hands it over
//! through `EngineCore::capture_content_box`. With the `raster` feature the
//! engine can also measure on its own by laying the content out with `usvg`.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::doc::{NodeId, SerializeOptions, SvgDoc};
use crate::viewport::ViewBox;

/// Markup of the document without `skip` and without root sizing, so that
/// coordinates come out in the content's own user space.
#[must_use]
pub fn content_markup(doc: &SvgDoc, skip: &[NodeId]) -> String {
    let opts = SerializeOptions {
        root_attrs: ["viewBox", "width", "height", "preserveAspectRatio"]
            .iter()
            .map(|name| ((*name).to_string(), None))
            .collect(),
        skip: skip.to_vec(),
        sanitize_attributes: true,
    };
    doc.to_markup(&opts)
}

/// Measures rendered content bounds.
pub struct Measurer {
    #[cfg(feature = "raster")]
    options: usvg::Options<'static>,
}

impl Default for Measurer {
    fn default() -> Self {
        Self::new()
    }
}

impl Measurer {
    /// Build a measurer. System fonts are loaded once here.
    #[must_use]
    #[cfg(feature = "raster")]
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }

    #[must_use]
    #[cfg(not(feature = "raster"))]
    pub fn new() -> Self {
        Self {}
    }

    /// Build a measurer around prepared parse options.
    #[must_use]
    #[cfg(feature = "raster")]
    pub fn with_options(options: usvg::Options<'static>) -> Self {
        Self { options }
    }

    /// Parse options with the system fonts already loaded.
    #[must_use]
    #[cfg(feature = "raster")]
    pub fn options(&self) -> &usvg::Options<'static> {
        &self.options
    }

    /// Bounding box of everything drawn by `markup`, or `None` when the markup
    /// does not lay out or draws nothing.
    #[must_use]
    #[cfg(feature = "raster")]
    pub fn measure(&self, markup: &str) -> Option<ViewBox> {
        let tree = match usvg::Tree::from_str(markup, &self.options) {
            Ok(tree) => tree,
            Err(err) => {
                tracing::debug!(%err, "content did not lay out");
                return None;
            }
        };
        // An empty root still reports a placeholder box.
        if !tree.root().has_children() {
            return None;
        }
        let bbox = tree.root().abs_bounding_box();
        let vb = ViewBox::new(
            f64::from(bbox.x()),
            f64::from(bbox.y()),
            f64::from(bbox.width()),
            f64::from(bbox.height()),
        );
        vb.is_valid().then_some(vb)
    }

    /// Without a layout engine there is nothing to measure with.
    #[must_use]
    #[cfg(not(feature = "raster"))]
    pub fn measure(&self, _markup: &str) -> Option<ViewBox> {
        None
    }

    /// Measure the document's content, leaving out `skip`.
    #[must_use]
    pub fn measure_content(&self, doc: &SvgDoc, skip: &[NodeId]) -> Option<ViewBox> {
        self.measure(&content_markup(doc, skip))
    }
}
