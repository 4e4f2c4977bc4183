//! Overlay layer: restyled clones of selected and hovered elements.
//!
//! The layer is a `<g>` appended as the last child of the SVG root, so it
//! paints above the content. Each clone is re-parented there with the full
//! transform chain of its source flattened onto it, which keeps it aligned
//! with the original wherever that sits in the tree.
//!
//! Clone ids are never added to the document's id index, and selectable ids
//! inside a clone get a selection or hover prefix, so id lookups only ever
//! reach live content and the two kinds of clone never share an id.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use indexmap::{IndexMap, IndexSet};

use crate::consts::{HOVER_CLONE_ID, HOVER_PREFIX, SELECTION_PREFIX, SOURCE_ATTR};
use crate::doc::{NodeId, SvgDoc};
use crate::index::ElementIndex;
use crate::transform::compose_chain;

/// Which kind of highlight a clone renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneTag {
    Selection,
    Hover,
}

/// Paint applied to a highlight clone.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub color: String,
    pub opacity: f64,
    /// Added to the source stroke width (1 when unset).
    pub width_delta: f64,
}

/// The overlay group and the clones currently inside it.
#[derive(Debug, Clone)]
pub struct OverlayLayer {
    group: NodeId,
    shapes: Vec<String>,
    selection: IndexMap<String, NodeId>,
    hover: Option<(String, NodeId)>,
}

impl OverlayLayer {
    /// Append an empty overlay group to the document root.
    ///
    /// `shapes` lists the tags whose fill and stroke get rewritten in clones.
    #[must_use]
    pub fn install(doc: &mut SvgDoc, shapes: &[String]) -> Option<Self> {
        let group = doc.create_element(doc.root(), "g")?;
        doc.set_attr(group, "class", "svgui-overlay");
        Some(Self { group, shapes: shapes.to_vec(), selection: IndexMap::new(), hover: None })
    }

    #[must_use]
    pub fn group(&self) -> NodeId {
        self.group
    }

    /// Source ids with a live selection clone, in insertion order.
    pub fn selection_ids(&self) -> impl Iterator<Item = &str> {
        self.selection.keys().map(String::as_str)
    }

    /// Source id of the hover clone, if one is shown.
    #[must_use]
    pub fn hover_source(&self) -> Option<&str> {
        self.hover.as_ref().map(|(id, _)| id.as_str())
    }

    /// Make the selection clones match `selected` exactly. Returns whether
    /// anything was added or removed.
    pub fn reconcile_selection(
        &mut self,
        doc: &mut SvgDoc,
        index: &ElementIndex,
        selected: &IndexSet<String>,
        style: &HighlightStyle,
    ) -> bool {
        let stale: Vec<String> = self.selection.keys().filter(|id| !selected.contains(*id)).cloned().collect();
        let mut changed = !stale.is_empty();
        for id in stale {
            if let Some(node) = self.selection.shift_remove(&id) {
                doc.remove_subtree(node);
            }
        }
        for id in selected {
            if self.selection.contains_key(id) {
                continue;
            }
            match self.add_clone(doc, index, id, CloneTag::Selection, style) {
                Some(node) => {
                    self.selection.insert(id.clone(), node);
                    changed = true;
                }
                None => tracing::debug!(id = %id, "selected id has no element to clone"),
            }
        }
        changed
    }

    /// Show the hover clone for `target`, or remove it when `target` is `None`.
    /// An unchanged target leaves the existing clone alone.
    pub fn set_hover(&mut self, doc: &mut SvgDoc, index: &ElementIndex, target: Option<(&str, &HighlightStyle)>) -> bool {
        if self.hover_source() == target.map(|(id, _)| id) {
            return false;
        }
        if let Some((_, node)) = self.hover.take() {
            doc.remove_subtree(node);
        }
        if let Some((id, style)) = target {
            self.hover = self.add_clone(doc, index, id, CloneTag::Hover, style).map(|node| (id.to_string(), node));
        }
        true
    }

    /// Remove every clone.
    pub fn clear(&mut self, doc: &mut SvgDoc) {
        for (_, node) in self.selection.drain(..) {
            doc.remove_subtree(node);
        }
        if let Some((_, node)) = self.hover.take() {
            doc.remove_subtree(node);
        }
    }

    fn add_clone(
        &self,
        doc: &mut SvgDoc,
        index: &ElementIndex,
        source_id: &str,
        tag: CloneTag,
        style: &HighlightStyle,
    ) -> Option<NodeId> {
        let source = doc.find_by_id(source_id)?;
        if source == doc.root() {
            return None;
        }
        let matrix = compose_chain(doc, source);
        let copy = doc.clone_subtree(source)?;

        let prefix = match tag {
            CloneTag::Selection => SELECTION_PREFIX,
            CloneTag::Hover => HOVER_PREFIX,
        };
        for node in doc.descendants(copy).into_iter().skip(1) {
            let Some(inner) = doc.attr(node, "id").filter(|id| index.is_selectable(id)).map(str::to_string) else {
                continue;
            };
            doc.set_attr(node, "id", &format!("{prefix}{inner}"));
        }
        match tag {
            CloneTag::Selection => {
                doc.set_attr(copy, "id", &format!("{SELECTION_PREFIX}{source_id}"));
            }
            CloneTag::Hover => {
                doc.set_attr(copy, "id", HOVER_CLONE_ID);
                doc.set_attr(copy, SOURCE_ATTR, source_id);
            }
        }
        doc.set_attr(copy, "transform", &matrix.to_svg());
        self.restyle(doc, copy, style);
        doc.append_child(self.group, copy);
        Some(copy)
    }

    fn restyle(&self, doc: &mut SvgDoc, copy: NodeId, style: &HighlightStyle) {
        for node in doc.descendants(copy) {
            if !doc.tag(node).is_some_and(|tag| self.shapes.iter().any(|s| s == tag)) {
                continue;
            }
            let width = doc.presentation(node, "stroke-width").and_then(|raw| parse_length(&raw)).unwrap_or(1.0);
            doc.set_style(node, "fill", "none");
            doc.set_style(node, "stroke", &style.color);
            doc.set_style(node, "stroke-width", &(width + style.width_delta).to_string());
            doc.set_style(node, "stroke-opacity", "1");
        }
        doc.set_style(copy, "opacity", &style.opacity.to_string());
        doc.set_style(copy, "pointer-events", "none");
        doc.set_style(copy, "visibility", "visible");
    }
}

/// Leading number of a CSS length (`"2"`, `"2.5px"`).
fn parse_length(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let end = raw.find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+')).unwrap_or(raw.len());
    match raw[..end].parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
