//! Hover tracking, debounced hover notification and the tooltip.
//!
//! The live hover target follows the pointer immediately so the highlight never
//! lags. What the host hears about (the `hovered` notification and the tooltip
//! contents) only changes when [`HoverEngine::settle`] runs, which the engine
//! does once the pointer has been still for the hover timeout.

#[cfg(test)]
#[path = "hover_test.rs"]
mod hover_test;

use serde::Serialize;

use crate::consts::{TOOLTIP_OFFSET_X, TOOLTIP_OFFSET_Y};
use crate::hit::Hit;
use crate::index::ElementIndex;
use crate::schedule::TimerToken;
use crate::viewport::{Point, Rect};

/// Tooltip state for the host to mirror. `left`/`top` are CSS pixels relative
/// to the widget's top-left corner.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tooltip {
    pub visible: bool,
    pub element: Option<String>,
    pub text: String,
    pub left: f64,
    pub top: f64,
}

impl Tooltip {
    fn hidden() -> Self {
        Self::default()
    }
}

/// What a hover transition changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverOutcome {
    /// The notified hover id changed.
    pub notify: bool,
    /// The tooltip changed.
    pub tooltip: bool,
}

#[derive(Debug, Clone)]
pub struct HoverEngine {
    current: Option<Hit>,
    notified: Option<String>,
    pointer: Point,
    pending: Option<TimerToken>,
    tooltip: Tooltip,
    show_tooltips: bool,
    inside: bool,
    latched: bool,
}

impl HoverEngine {
    #[must_use]
    pub fn new(show_tooltips: bool) -> Self {
        Self {
            current: None,
            notified: None,
            pointer: Point::default(),
            pending: None,
            tooltip: Tooltip::hidden(),
            show_tooltips,
            inside: false,
            latched: false,
        }
    }

    // --- Queries ---

    /// Element under the pointer right now.
    #[must_use]
    pub fn current(&self) -> Option<&Hit> {
        self.current.as_ref()
    }

    /// Last hover id reported to the host.
    #[must_use]
    pub fn notified(&self) -> Option<&str> {
        self.notified.as_deref()
    }

    #[must_use]
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    #[must_use]
    pub fn show_tooltips(&self) -> bool {
        self.show_tooltips
    }

    /// The pointer is over the widget (content or tooltip).
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.inside || self.latched
    }

    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    // --- Timer bookkeeping ---

    /// Remember the armed notification timer, handing back the one it replaces.
    pub fn replace_pending(&mut self, token: TimerToken) -> Option<TimerToken> {
        self.pending.replace(token)
    }

    pub fn take_pending(&mut self) -> Option<TimerToken> {
        self.pending.take()
    }

    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending == Some(token)
    }

    // --- Transitions ---

    /// Pointer moved over the content. Returns whether the live target changed.
    pub fn track(&mut self, hit: Option<Hit>, pointer: Point) -> bool {
        self.inside = true;
        self.latched = false;
        self.pointer = pointer;
        let changed = self.current_id() != hit.as_ref().map(|h| h.id.as_str());
        self.current = hit;
        changed
    }

    /// Pointer left the content. Returns whether the live target changed.
    pub fn leave(&mut self) -> bool {
        self.inside = false;
        self.current.take().is_some()
    }

    /// Report the live target and refresh the tooltip.
    pub fn settle(&mut self, index: &ElementIndex, screen: Rect) -> HoverOutcome {
        self.pending = None;
        let next = self.current_id().map(str::to_string);
        let notify = next != self.notified;
        self.notified = next;
        HoverOutcome { notify, tooltip: self.refresh_tooltip(index, screen) }
    }

    /// The pointer entered the tooltip: hold on to the element it describes.
    /// Returns whether the live target changed.
    pub fn enter_tooltip(&mut self, index: &ElementIndex) -> bool {
        self.latched = true;
        let Some(element) = self.tooltip.element.clone().filter(|_| self.tooltip.visible) else {
            return false;
        };
        let Some(role) = index.role(&element) else {
            return false;
        };
        let changed = self.current_id() != Some(element.as_str());
        self.current = Some(Hit { id: element, role });
        changed
    }

    /// The pointer left the tooltip. Clears the hover right away; returns
    /// whether the live target changed, plus what was reported.
    pub fn leave_tooltip(&mut self, index: &ElementIndex, screen: Rect) -> (bool, HoverOutcome) {
        self.latched = false;
        let changed = self.current.take().is_some();
        (changed, self.settle(index, screen))
    }

    /// Flip tooltip display and re-evaluate the tooltip immediately.
    pub fn toggle_tooltips(&mut self, index: &ElementIndex, screen: Rect) -> bool {
        self.show_tooltips = !self.show_tooltips;
        tracing::debug!(show = self.show_tooltips, "tooltips toggled");
        self.refresh_tooltip(index, screen)
    }

    /// Forget targets that are no longer registered. Returns whether the live
    /// target changed, plus what was reported.
    pub fn prune(&mut self, index: &ElementIndex, screen: Rect) -> (bool, HoverOutcome) {
        let stale = |id: &str| !index.contains(id);
        let changed = self.current.as_ref().is_some_and(|h| stale(&h.id));
        if changed {
            self.current = None;
        }
        let unreported = self.notified.as_deref().is_some_and(stale);
        if !changed && !unreported && !self.tooltip.element.as_deref().is_some_and(stale) {
            return (false, HoverOutcome::default());
        }
        (changed, self.settle(index, screen))
    }

    fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|h| h.id.as_str())
    }

    /// Recompute the tooltip. A tooltip already showing for the same element
    /// keeps its position.
    fn refresh_tooltip(&mut self, index: &ElementIndex, screen: Rect) -> bool {
        let next = match self.notified.as_deref() {
            Some(id) if self.show_tooltips => match index.title(id) {
                Some(_) if self.tooltip.visible && self.tooltip.element.as_deref() == Some(id) => self.tooltip.clone(),
                Some(title) => Tooltip {
                    visible: true,
                    element: Some(id.to_string()),
                    text: title.to_string(),
                    left: self.pointer.x - screen.x + TOOLTIP_OFFSET_X,
                    top: self.pointer.y - screen.y + TOOLTIP_OFFSET_Y,
                },
                None => Tooltip::hidden(),
            },
            _ => Tooltip::hidden(),
        };
        if next == self.tooltip {
            return false;
        }
        self.tooltip = next;
        true
    }
}
