//! Selection set and click semantics.
//!
//! A plain click selects the nearest selectable ancestor of the target
//! together with every selectable element nested inside it. Ctrl-click toggles
//! that whole group in or out. The set only ever holds ids that the index
//! currently marks selectable.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use indexmap::IndexSet;

use crate::doc::SvgDoc;
use crate::hit;
use crate::index::ElementIndex;

#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    selected: IndexSet<String>,
}

impl SelectionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(&self) -> &IndexSet<String> {
        &self.selected
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Apply a click whose target has the ancestor chain `chain` (leaf first).
    ///
    /// Returns `false` only for the one no-op transition: ctrl held with no
    /// selectable target.
    pub fn click(&mut self, chain: &[String], ctrl: bool, doc: &SvgDoc, index: &ElementIndex) -> bool {
        let target = hit::selectable_target(chain, index);
        match (target, ctrl) {
            (None, false) => {
                self.selected.clear();
                true
            }
            (None, true) => false,
            (Some(target), false) => {
                self.selected = index.selectable_group(doc, &target).into_iter().collect();
                true
            }
            (Some(target), true) => {
                let group = index.selectable_group(doc, &target);
                if self.selected.contains(&target) {
                    for id in &group {
                        self.selected.shift_remove(id);
                    }
                } else {
                    self.selected.extend(group);
                }
                true
            }
        }
    }

    /// Replace the selection with the selectable members of `ids`.
    pub fn update(&mut self, ids: &[String], index: &ElementIndex) {
        self.selected = ids.iter().filter(|id| index.is_selectable(id)).cloned().collect();
    }

    /// Drop ids that are no longer selectable or no longer in the document.
    /// Returns whether anything was dropped.
    pub fn prune(&mut self, doc: &SvgDoc, index: &ElementIndex) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| index.is_selectable(id) && doc.contains_id(id));
        self.selected.len() != before
    }
}
