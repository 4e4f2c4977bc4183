use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::button::{ButtonDispatcher, ButtonEvent};
use crate::config::{BatchTable, ConfigError, RoleTable, WidgetConfig};
use crate::consts::PAN_TICK_MS;
use crate::doc::{DocError, NodeId, Order, SvgDoc};
use crate::export::{self, ExportError, ExportedFile};
use crate::hit;
use crate::hover::{HoverEngine, HoverOutcome, Tooltip};
use crate::index::{ElementIndex, Role, RoleRow};
use crate::input::{Button, InputState, Key, Modifiers, WheelDelta};
use crate::layout::Measurer;
use crate::overlay::OverlayLayer;
use crate::render;
use crate::schedule::{Scheduler, TimerKind, TimerQueue};
use crate::selection::SelectionEngine;
use crate::styling::{self, ApplyOptions, Target};
use crate::viewport::{Point, Rect, ViewBox, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Notifications returned from event handlers and commands for the host to
/// act on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// The selection, in selection order.
    Selected { ids: Vec<String> },
    /// The hovered element; an empty string when nothing is hovered.
    Hovered {
        #[serde(serialize_with = "empty_if_none")]
        id: Option<String>,
    },
    /// A button was operated.
    Operated(ButtonEvent),
    /// The tooltip changed.
    Tooltip(Tooltip),
    /// The view box or the overlay changed; re-read the markup.
    RenderNeeded,
}

#[allow(clippy::ref_option)]
fn empty_if_none<S: Serializer>(id: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.as_deref().unwrap_or_default())
}

/// Errors that stop a widget from being created.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error(transparent)]
    Doc(#[from] DocError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot attach the overlay layer to the SVG root")]
    Overlay,
}

/// Core widget state: everything that does not depend on a browser.
///
/// One instance per mounted widget. The host feeds it pointer events, runtime
/// commands and clock ticks, and applies the returned [`Action`]s.
pub struct EngineCore<S: Scheduler = TimerQueue> {
    instance_id: Uuid,
    config: WidgetConfig,
    doc: SvgDoc,
    main: NodeId,
    index: ElementIndex,
    overlay: OverlayLayer,
    viewport: Viewport,
    selection: SelectionEngine,
    hover: HoverEngine,
    buttons: ButtonDispatcher,
    input: InputState,
    scheduler: S,
    measurer: Measurer,
    png_scale: Option<f64>,
}

impl EngineCore<TimerQueue> {
    /// Build a widget from its configuration, driven by a virtual clock.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Doc`] when the markup is not an SVG document.
    pub fn new(config: WidgetConfig) -> Result<Self, WidgetError> {
        Self::with_scheduler(config, TimerQueue::new())
    }

    /// Parse a JSON configuration and build a widget from it.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Config`] for unusable JSON and
    /// [`WidgetError::Doc`] when the markup is not an SVG document.
    pub fn from_json(raw: &str) -> Result<Self, WidgetError> {
        Self::new(WidgetConfig::from_json(raw)?)
    }
}

impl<S: Scheduler> EngineCore<S> {
    /// Build a widget that arms its timers on `scheduler`.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Doc`] when the markup is not an SVG document.
    pub fn with_scheduler(config: WidgetConfig, scheduler: S) -> Result<Self, WidgetError> {
        let instance_id = Uuid::new_v4();
        let mut doc = SvgDoc::parse(&config.svg_markup)?;
        let main = main_group(&mut doc);
        let index = ElementIndex::classify(&config.role_table.rows);

        let init_opts =
            ApplyOptions { to_ignore: &[], targeted_tags: &config.structure_shape_tags, append: false };
        styling::apply(&mut doc, &config.style_batches.rows, init_opts, Target::Style);
        styling::apply(&mut doc, &config.attribute_batches.rows, init_opts, Target::Attribute);

        let overlay = OverlayLayer::install(&mut doc, &config.structure_shape_tags).ok_or(WidgetError::Overlay)?;
        let viewport = Viewport::new(config.zoom());
        let hover = HoverEngine::new(config.show_tooltips);

        let mut core = Self {
            instance_id,
            config,
            doc,
            main,
            index,
            overlay,
            viewport,
            selection: SelectionEngine::new(),
            hover,
            buttons: ButtonDispatcher::new(),
            input: InputState::Idle,
            scheduler,
            measurer: Measurer::new(),
            png_scale: None,
        };

        let measured = core.measurer.measure_content(&core.doc, &[core.overlay.group()]);
        if let Some(content) = measured {
            core.viewport.capture_original(content);
        }
        if !core.config.selected.is_empty() {
            let preselected = core.config.selected.clone();
            core.selection.update(&preselected, &core.index);
            core.reconcile_selection();
        }

        tracing::info!(
            instance_id = %core.instance_id,
            elements = core.index.len(),
            selected = core.selection.len(),
            captured = core.viewport.original().is_some(),
            "widget initialized"
        );
        Ok(core)
    }

    // --- Layout ---

    /// Record the on-screen box of the SVG root, in CSS pixels.
    pub fn set_screen_box(&mut self, screen: Rect) {
        self.viewport.set_screen(screen);
    }

    /// Capture the content box measured by the host. Only the first capture
    /// counts; later calls are ignored.
    pub fn capture_content_box(&mut self, content: ViewBox) -> Vec<Action> {
        if !self.viewport.capture_original(content) {
            tracing::debug!(instance_id = %self.instance_id, "content box already captured or invalid");
            return Vec::new();
        }
        tracing::info!(instance_id = %self.instance_id, view_box = %content, "content box captured");
        vec![Action::RenderNeeded]
    }

    /// Replace the saved content box after the content changed, as measured
    /// by the host. The displayed view box is left alone.
    pub fn update_content_box(&mut self, content: ViewBox) {
        self.viewport.update_original(content);
    }

    fn remeasure(&mut self) {
        if let Some(content) = self.measurer.measure_content(&self.doc, &[self.overlay.group()]) {
            self.viewport.update_original(content);
        }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.cancel_pan_tick();
        self.input = if self.viewport.begin_pan(screen) { InputState::Panning { tick: None } } else { InputState::Idle };
        Vec::new()
    }

    /// Pointer moved over the content. `chain` holds the target's id and its
    /// ancestors' ids, leaf first.
    pub fn on_pointer_move(&mut self, screen: Point, chain: &[String], _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();

        if let InputState::Panning { tick } = self.input {
            self.viewport.pan_sample(screen);
            if tick.is_none() {
                let token = self.scheduler.schedule(PAN_TICK_MS, TimerKind::PanTick);
                self.input = InputState::Panning { tick: Some(token) };
            }
        }

        let target = hit::hover_target(chain, &self.index);
        if self.hover.track(target, screen) && self.sync_hover_overlay() {
            actions.push(Action::RenderNeeded);
        }
        self.rearm_hover_timer();
        actions
    }

    pub fn on_pointer_up(&mut self, _screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_panning() {
            return Vec::new();
        }
        self.cancel_pan_tick();
        self.input = InputState::Idle;
        if self.viewport.end_pan() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Pointer left the content area.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.hover.leave() && self.sync_hover_overlay() {
            actions.push(Action::RenderNeeded);
        }
        self.rearm_hover_timer();
        actions
    }

    /// A click landed on the element chain `chain`. Ignored after a drag.
    pub fn on_click(&mut self, chain: &[String], modifiers: Modifiers) -> Vec<Action> {
        if self.viewport.moved() {
            tracing::debug!(instance_id = %self.instance_id, "click after drag ignored");
            return Vec::new();
        }
        self.dispatch_click(chain, modifiers.toggles_selection())
    }

    /// A double click landed on `chain`. Ignored after a drag.
    pub fn on_double_click(&mut self, chain: &[String], _modifiers: Modifiers) -> Vec<Action> {
        if self.viewport.moved() {
            return Vec::new();
        }
        self.dispatch_double_click(chain)
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if self.viewport.wheel_zoom(screen, delta.dy) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Escape while the pointer is over the widget flips tooltip display.
    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if !key.is_escape() || !self.hover.is_inside() {
            return Vec::new();
        }
        let screen = self.viewport.screen();
        if self.hover.toggle_tooltips(&self.index, screen) {
            vec![Action::Tooltip(self.hover.tooltip().clone())]
        } else {
            Vec::new()
        }
    }

    /// The pointer moved onto the tooltip: keep its element hovered.
    pub fn on_tooltip_enter(&mut self) -> Vec<Action> {
        if let Some(token) = self.hover.take_pending() {
            self.scheduler.cancel(token);
        }
        if self.hover.enter_tooltip(&self.index) && self.sync_hover_overlay() {
            return vec![Action::RenderNeeded];
        }
        Vec::new()
    }

    pub fn on_tooltip_leave(&mut self) -> Vec<Action> {
        if let Some(token) = self.hover.take_pending() {
            self.scheduler.cancel(token);
        }
        let screen = self.viewport.screen();
        let (changed, outcome) = self.hover.leave_tooltip(&self.index, screen);
        let mut actions = self.hover_actions(outcome);
        if changed && self.sync_hover_overlay() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Time ---

    /// Advance the clock to `now_ms` and fire every timer that came due.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        for fired in self.scheduler.pop_due(now_ms) {
            match fired.kind {
                TimerKind::HoverNotify => {
                    if self.hover.is_pending(fired.token) {
                        let screen = self.viewport.screen();
                        let outcome = self.hover.settle(&self.index, screen);
                        actions.extend(self.hover_actions(outcome));
                    }
                }
                TimerKind::PanTick => {
                    if self.input == (InputState::Panning { tick: Some(fired.token) }) {
                        self.input = InputState::Panning { tick: None };
                        if self.viewport.pan_tick() {
                            actions.push(Action::RenderNeeded);
                        }
                    }
                }
                TimerKind::ButtonSingle => {
                    if let Some(event) = self.buttons.fire(fired.token) {
                        actions.push(Action::Operated(event));
                    }
                }
            }
        }
        actions
    }

    // --- Commands: selection and buttons ---

    /// Replace the selection with the selectable members of `ids`.
    pub fn update_selection(&mut self, ids: &[String]) -> Vec<Action> {
        self.selection.update(ids, &self.index);
        self.selection_actions()
    }

    /// Run the click (or double click) pipeline as if the user had clicked
    /// element `id`. Unknown ids are ignored.
    pub fn click_element(&mut self, id: &str, is_double: bool) -> Vec<Action> {
        let chain = ElementIndex::ancestors_of(&self.doc, id);
        if chain.is_empty() {
            tracing::debug!(instance_id = %self.instance_id, id, "click on unknown element ignored");
            return Vec::new();
        }
        if is_double { self.dispatch_double_click(&chain) } else { self.dispatch_click(&chain, false) }
    }

    fn dispatch_click(&mut self, chain: &[String], toggle: bool) -> Vec<Action> {
        if let Some(button) = hit::button_target(chain, &self.index) {
            self.buttons.click(&button, &mut self.scheduler, self.config.dblclick_timeout_ms);
            return Vec::new();
        }
        if self.selection.click(chain, toggle, &self.doc, &self.index) { self.selection_actions() } else { Vec::new() }
    }

    fn dispatch_double_click(&mut self, chain: &[String]) -> Vec<Action> {
        let button = hit::button_target(chain, &self.index);
        self.buttons.double_click(button.as_deref(), &mut self.scheduler).map(Action::Operated).into_iter().collect()
    }

    // --- Commands: styling ---

    pub fn set_element_styles(
        &mut self,
        batch: &BatchTable,
        to_ignore: &[String],
        targeted_tags: Option<&[String]>,
        append: bool,
    ) -> Vec<Action> {
        self.apply_batch(batch, to_ignore, targeted_tags, append, Target::Style)
    }

    /// Apply style fields to every selected element.
    pub fn set_selection_styles(
        &mut self,
        fields: &[(String, String)],
        targeted_tags: Option<&[String]>,
        append: bool,
    ) -> Vec<Action> {
        self.apply_to_selection(fields, targeted_tags, append, Target::Style)
    }

    pub fn set_element_attributes(
        &mut self,
        batch: &BatchTable,
        to_ignore: &[String],
        targeted_tags: Option<&[String]>,
        append: bool,
    ) -> Vec<Action> {
        self.apply_batch(batch, to_ignore, targeted_tags, append, Target::Attribute)
    }

    /// Apply attribute fields to every selected element.
    pub fn set_selection_attributes(
        &mut self,
        fields: &[(String, String)],
        targeted_tags: Option<&[String]>,
        append: bool,
    ) -> Vec<Action> {
        self.apply_to_selection(fields, targeted_tags, append, Target::Attribute)
    }

    fn apply_batch(
        &mut self,
        batch: &BatchTable,
        to_ignore: &[String],
        targeted_tags: Option<&[String]>,
        append: bool,
        target: Target,
    ) -> Vec<Action> {
        let tags = self.targeted_tags(targeted_tags);
        self.overlay.clear(&mut self.doc);
        let opts = ApplyOptions { to_ignore, targeted_tags: &tags, append };
        let writes = styling::apply(&mut self.doc, &batch.rows, opts, target);
        tracing::debug!(instance_id = %self.instance_id, writes, ?target, "batch applied");
        self.rebuild_overlay();
        vec![Action::RenderNeeded]
    }

    fn apply_to_selection(
        &mut self,
        fields: &[(String, String)],
        targeted_tags: Option<&[String]>,
        append: bool,
        target: Target,
    ) -> Vec<Action> {
        let tags = self.targeted_tags(targeted_tags);
        self.overlay.clear(&mut self.doc);
        let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append };
        let writes =
            styling::apply_to_selection(&mut self.doc, &self.index, self.selection.set(), fields, opts, target);
        tracing::debug!(instance_id = %self.instance_id, writes, ?target, "selection batch applied");
        self.rebuild_overlay();
        vec![Action::RenderNeeded]
    }

    /// Requested tags, or the structure shapes when none were given.
    fn targeted_tags(&self, requested: Option<&[String]>) -> Vec<String> {
        match requested {
            Some(tags) if !tags.is_empty() => tags.to_vec(),
            _ => self.config.structure_shape_tags.clone(),
        }
    }

    // --- Commands: structure ---

    /// Move each element among its siblings, in the order given.
    pub fn order_elements(&mut self, ids: &[String], order: Order) -> Vec<Action> {
        let mut moved = false;
        for id in ids {
            match self.doc.find_by_id(id) {
                Some(node) => moved |= self.doc.reorder(node, order),
                None => tracing::debug!(instance_id = %self.instance_id, id = %id, "cannot order unknown element"),
            }
        }
        // The overlay must stay on top of anything moved to the front of the root.
        self.doc.reorder(self.overlay.group(), Order::Front);
        if moved { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Add an element parsed from `markup` to the main content group.
    ///
    /// Ignored when `id` is already in use or the markup does not parse.
    pub fn add_element(&mut self, id: &str, markup: &str, role: Option<Role>, title: Option<&str>) -> Vec<Action> {
        if id.is_empty() || self.index.contains(id) || self.doc.contains_id(id) {
            tracing::warn!(instance_id = %self.instance_id, id, "element id already in use; not adding");
            return Vec::new();
        }
        let node = match self.doc.parse_fragment(markup) {
            Ok(node) => node,
            Err(err) => {
                tracing::warn!(instance_id = %self.instance_id, id, %err, "cannot add element");
                return Vec::new();
            }
        };
        self.doc.set_attr(node, "id", id);
        self.doc.attach(self.main, node);
        if self.main == self.doc.root() {
            self.doc.reorder(self.overlay.group(), Order::Front);
        }

        let mut row = RoleRow::new(id, role.unwrap_or_default());
        if let Some(title) = title {
            row = row.with_title(title);
        }
        self.index.insert(&row);
        self.remeasure();
        tracing::debug!(instance_id = %self.instance_id, id, role = ?row.role, "element added");
        vec![Action::RenderNeeded]
    }

    /// Remove elements from the document, the index and the selection.
    pub fn remove_elements(&mut self, ids: &[String]) -> Vec<Action> {
        let mut removed = false;
        for id in ids {
            let dropped = match self.doc.find_by_id(id) {
                Some(node) => {
                    if self.doc.ancestors(self.main).contains(&node) {
                        tracing::warn!(instance_id = %self.instance_id, id = %id, "main group removed; adding to the root from now on");
                        self.main = self.doc.root();
                    }
                    self.doc.remove_subtree(node)
                }
                None => Vec::new(),
            };
            removed |= !dropped.is_empty();
            for gone in dropped.iter().chain(std::iter::once(id)) {
                removed |= self.index.remove(gone);
            }
        }
        if !removed {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.selection.prune(&self.doc, &self.index) {
            actions.extend(self.selection_actions());
        }
        let screen = self.viewport.screen();
        let (_, outcome) = self.hover.prune(&self.index, screen);
        actions.extend(self.hover_actions(outcome));
        self.rebuild_overlay();
        self.remeasure();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the role and title of elements present in the document.
    pub fn update_ui_elements(&mut self, table: &RoleTable) -> Vec<Action> {
        for row in &table.rows {
            if self.doc.contains_id(&row.id) {
                self.index.upsert(row);
            } else {
                tracing::warn!(instance_id = %self.instance_id, id = %row.id, "no element with this id; role not updated");
            }
        }
        let mut actions = Vec::new();
        if self.selection.prune(&self.doc, &self.index) {
            actions.extend(self.selection_actions());
        }
        let screen = self.viewport.screen();
        let (_, outcome) = self.hover.prune(&self.index, screen);
        actions.extend(self.hover_actions(outcome));
        self.rebuild_overlay();
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Commands: view ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        if self.viewport.zoom_in() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        if self.viewport.zoom_out() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        if self.viewport.reset() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Output ---

    /// Markup to display: current view box, overlay included.
    #[must_use]
    pub fn render_markup(&self) -> String {
        render::view_markup(&self.doc, self.viewport.view_box(), self.config.sanitize_attributes)
    }

    /// Content markup without the overlay, with the original view box.
    #[must_use]
    pub fn get_core_svg(&self) -> String {
        render::core_markup(
            &self.doc,
            self.viewport.original(),
            Some(self.overlay.group()),
            self.config.sanitize_attributes,
        )
    }

    /// Set the PNG scale the user typed. Missing, zero or invalid values fall
    /// back to the configured default.
    pub fn set_png_scale(&mut self, scale: Option<f64>) {
        self.png_scale = scale.filter(|s| s.is_finite() && *s > 0.0);
    }

    #[must_use]
    pub fn png_scale(&self) -> f64 {
        self.png_scale.unwrap_or(self.config.default_png_scale)
    }

    #[must_use]
    pub fn export_svg(&self) -> ExportedFile {
        export::svg_file(&self.get_core_svg())
    }

    /// Rasterize the view at the PNG scale. `Ok(None)` before the content box
    /// has been captured.
    ///
    /// # Errors
    ///
    /// Propagates rasterization failures.
    pub fn export_png(&self) -> Result<Option<ExportedFile>, ExportError> {
        let Some(original) = self.viewport.original() else {
            tracing::debug!(instance_id = %self.instance_id, "PNG export before content capture");
            return Ok(None);
        };
        let markup = render::raster_markup(&self.doc, original, self.png_scale());
        export::png_file(&markup, &self.measurer).map(Some)
    }

    // --- Queries ---

    #[must_use]
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn doc(&self) -> &SvgDoc {
        &self.doc
    }

    #[must_use]
    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayLayer {
        &self.overlay
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn selected(&self) -> Vec<String> {
        self.selection.to_vec()
    }

    /// Last hover id reported to the host.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hover.notified()
    }

    #[must_use]
    pub fn tooltip(&self) -> &Tooltip {
        self.hover.tooltip()
    }

    #[must_use]
    pub fn show_tooltips(&self) -> bool {
        self.hover.show_tooltips()
    }

    #[must_use]
    pub fn button_count(&self) -> u64 {
        self.buttons.count()
    }

    // --- Internals ---

    fn selection_actions(&mut self) -> Vec<Action> {
        self.reconcile_selection();
        vec![Action::Selected { ids: self.selection.to_vec() }, Action::RenderNeeded]
    }

    fn reconcile_selection(&mut self) -> bool {
        let style = self.config.selection_style();
        self.overlay.reconcile_selection(&mut self.doc, &self.index, self.selection.set(), &style)
    }

    fn rebuild_overlay(&mut self) {
        self.overlay.clear(&mut self.doc);
        self.reconcile_selection();
        self.sync_hover_overlay();
    }

    fn sync_hover_overlay(&mut self) -> bool {
        let target = self
            .hover
            .current()
            .and_then(|hit| self.index.role(&hit.id).map(|role| (hit.id.clone(), role)))
            .and_then(|(id, role)| self.config.hover_style(role).map(|style| (id, style)));
        self.overlay.set_hover(&mut self.doc, &self.index, target.as_ref().map(|(id, style)| (id.as_str(), style)))
    }

    fn rearm_hover_timer(&mut self) {
        let token = self.scheduler.schedule(self.config.hover_timeout_ms, TimerKind::HoverNotify);
        if let Some(previous) = self.hover.replace_pending(token) {
            self.scheduler.cancel(previous);
        }
    }

    fn cancel_pan_tick(&mut self) {
        if let InputState::Panning { tick: Some(token) } = self.input {
            self.scheduler.cancel(token);
        }
    }

    fn hover_actions(&self, outcome: HoverOutcome) -> Vec<Action> {
        let mut actions = Vec::new();
        if outcome.notify {
            actions.push(Action::Hovered { id: self.hover.notified().map(str::to_string) });
        }
        if outcome.tooltip {
            actions.push(Action::Tooltip(self.hover.tooltip().clone()));
        }
        actions
    }
}

/// The first `<g>` outside `<defs>`. Documents without one get their drawable
/// children wrapped in a new group.
fn main_group(doc: &mut SvgDoc) -> NodeId {
    let root = doc.root();
    let found = doc.descendants(root).into_iter().skip(1).find(|&n| {
        doc.tag(n) == Some("g") && !doc.ancestors(n).iter().any(|&a| doc.tag(a) == Some("defs"))
    });
    if let Some(group) = found {
        return group;
    }

    tracing::warn!("SVG has no <g>; wrapping its content in one");
    let drawable: Vec<NodeId> = doc
        .child_elements(root)
        .into_iter()
        .filter(|&n| !matches!(doc.tag(n), Some("defs" | "style" | "title" | "desc" | "metadata")))
        .collect();
    let Some(group) = doc.create_element(root, "g") else {
        return root;
    };
    for node in drawable {
        doc.append_child(group, node);
    }
    group
}
