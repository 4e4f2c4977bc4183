//! Single versus double click on buttons.
//!
//! A click arms a timer and reports nothing. If the timer fires, the click was
//! a single click. A double click that arrives first disarms it and is
//! reported on its own, so a double click never produces a single as well.

#[cfg(test)]
#[path = "button_test.rs"]
mod button_test;

use serde::Serialize;

use crate::schedule::{Scheduler, TimerKind, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    Single,
    Double,
}

/// One operate notification. `count` grows by one per notification over the
/// lifetime of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonEvent {
    pub count: u64,
    pub id: Option<String>,
    pub kind: ClickKind,
}

#[derive(Debug, Clone, Default)]
pub struct ButtonDispatcher {
    count: u64,
    pending: Option<(String, TimerToken)>,
}

impl ButtonDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications emitted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Button waiting for its single-click timer.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(id, _)| id.as_str())
    }

    /// A button was clicked: (re)arm the single-click timer.
    pub fn click(&mut self, id: &str, scheduler: &mut impl Scheduler, timeout_ms: f64) {
        self.cancel(scheduler);
        let token = scheduler.schedule(timeout_ms, TimerKind::ButtonSingle);
        self.pending = Some((id.to_string(), token));
    }

    /// The single-click timer `token` fired.
    pub fn fire(&mut self, token: TimerToken) -> Option<ButtonEvent> {
        match self.pending.take() {
            Some((id, pending)) if pending == token => Some(self.emit(id, ClickKind::Single)),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// A double click landed on `id` (the nearest button, if any). Any
    /// pending single is dropped first.
    pub fn double_click(&mut self, id: Option<&str>, scheduler: &mut impl Scheduler) -> Option<ButtonEvent> {
        self.cancel(scheduler);
        id.map(|id| self.emit(id.to_string(), ClickKind::Double))
    }

    /// Drop the pending single click, if any.
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some((_, token)) = self.pending.take() {
            scheduler.cancel(token);
        }
    }

    fn emit(&mut self, id: String, kind: ClickKind) -> ButtonEvent {
        self.count += 1;
        tracing::debug!(id = %id, count = self.count, ?kind, "button operated");
        ButtonEvent { count: self.count, id: Some(id), kind }
    }
}
