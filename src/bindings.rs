//! JavaScript surface.
//!
//! `SvgWidget` wraps an [`EngineCore`] for the host page. Every event handler
//! and command returns the resulting actions as a JSON array. The clock is
//! advanced to `Date.now()` before each call; hosts should also call `tick`
//! when the delay reported by `nextDue` has elapsed so debounced hover and
//! single-click notifications are delivered without further input.

#[cfg(test)]
#[path = "bindings_test.rs"]
mod bindings_test;

use js_sys::Array;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::config::{BatchTable, OneOrMany, RoleTable, one_or_many};
use crate::doc::Order;
use crate::engine::{Action, EngineCore};
use crate::index::Role;
use crate::input::{Button, Key, Modifiers, WheelDelta};
use crate::schedule::Scheduler;
use crate::viewport::{Point, Rect, ViewBox};

/// Payload of the style and attribute commands, in the host's shape.
#[derive(Debug, Deserialize)]
struct BatchCommand {
    #[serde(alias = "element_styles", alias = "element_attributes")]
    batch: BatchTable,
    #[serde(default)]
    to_ignore: Option<OneOrMany<String>>,
    #[serde(default)]
    targeted_tags: Option<OneOrMany<String>>,
    #[serde(default)]
    append: Option<bool>,
}

#[wasm_bindgen]
pub struct SvgWidget {
    core: EngineCore,
}

#[wasm_bindgen]
impl SvgWidget {
    /// Create a widget from its JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SvgWidget, JsValue> {
        let core = EngineCore::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { core })
    }

    #[wasm_bindgen(js_name = instanceId)]
    pub fn instance_id(&self) -> String {
        self.core.instance_id().to_string()
    }

    // --- Layout ---

    #[wasm_bindgen(js_name = setScreenBox)]
    pub fn set_screen_box(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.core.set_screen_box(Rect::new(x, y, width, height));
    }

    #[wasm_bindgen(js_name = captureContentBox)]
    pub fn capture_content_box(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        self.with_clock(|core| core.capture_content_box(ViewBox::new(x, y, w, h)))
    }

    #[wasm_bindgen(js_name = updateContentBox)]
    pub fn update_content_box(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.core.update_content_box(ViewBox::new(x, y, w, h));
    }

    // --- Events ---

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16, modifiers: u8) -> String {
        let mut actions = self.advance();
        if let Some(button) = Button::from_code(button) {
            actions.extend(self.core.on_pointer_down(Point::new(x, y), button, Modifiers::from_bits(modifiers)));
        }
        encode(&actions)
    }

    /// `chain` is the array of ids from the event target up to the SVG root.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, chain: &Array, modifiers: u8) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_pointer_move(Point::new(x, y), &strings(chain), Modifiers::from_bits(modifiers)));
        encode(&actions)
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16, modifiers: u8) -> String {
        let mut actions = self.advance();
        if let Some(button) = Button::from_code(button) {
            actions.extend(self.core.on_pointer_up(Point::new(x, y), button, Modifiers::from_bits(modifiers)));
        }
        encode(&actions)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> String {
        self.with_clock(EngineCore::on_pointer_leave)
    }

    pub fn click(&mut self, chain: &Array, modifiers: u8) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_click(&strings(chain), Modifiers::from_bits(modifiers)));
        encode(&actions)
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, chain: &Array, modifiers: u8) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_double_click(&strings(chain), Modifiers::from_bits(modifiers)));
        encode(&actions)
    }

    pub fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers: u8) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_wheel(Point::new(x, y), WheelDelta { dx, dy }, Modifiers::from_bits(modifiers)));
        encode(&actions)
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, modifiers: u8) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_key_down(&Key(key.to_string()), Modifiers::from_bits(modifiers)));
        encode(&actions)
    }

    #[wasm_bindgen(js_name = tooltipEnter)]
    pub fn tooltip_enter(&mut self) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_tooltip_enter());
        encode(&actions)
    }

    #[wasm_bindgen(js_name = tooltipLeave)]
    pub fn tooltip_leave(&mut self) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.on_tooltip_leave());
        encode(&actions)
    }

    /// Fire every timer due by now.
    pub fn tick(&mut self) -> String {
        encode(&self.advance())
    }

    /// Milliseconds until the next armed timer, if any.
    #[wasm_bindgen(js_name = nextDue)]
    pub fn next_due(&self) -> Option<f64> {
        let now = self.core.scheduler().now();
        self.core.scheduler().next_due().map(|due| (due - now).max(0.0))
    }

    // --- Commands ---

    #[wasm_bindgen(js_name = updateSelection)]
    pub fn update_selection(&mut self, ids: &Array) -> String {
        self.with_clock(|core| core.update_selection(&strings(ids)))
    }

    #[wasm_bindgen(js_name = clickElement)]
    pub fn click_element(&mut self, id: &str, is_double: bool) -> String {
        let mut actions = self.advance();
        actions.extend(self.core.click_element(id, is_double));
        encode(&actions)
    }

    /// Style batch in the host's shape. Batches without an `id` column style
    /// the selection.
    #[wasm_bindgen(js_name = setStyles)]
    pub fn set_styles(&mut self, payload_json: &str) -> String {
        let Some(cmd) = parse_batch_command(payload_json) else {
            return encode(&[]);
        };
        let to_ignore = one_or_many(cmd.to_ignore);
        let tags = cmd.targeted_tags.map(OneOrMany::into_vec);
        let append = cmd.append.unwrap_or(false);
        self.with_clock(|core| {
            if cmd.batch.has_ids() {
                core.set_element_styles(&cmd.batch, &to_ignore, tags.as_deref(), append)
            } else {
                core.set_selection_styles(&cmd.batch.fields(), tags.as_deref(), append)
            }
        })
    }

    /// Attribute batch in the host's shape. Batches without an `id` column
    /// update the selection.
    #[wasm_bindgen(js_name = setAttributes)]
    pub fn set_attributes(&mut self, payload_json: &str) -> String {
        let Some(cmd) = parse_batch_command(payload_json) else {
            return encode(&[]);
        };
        let to_ignore = one_or_many(cmd.to_ignore);
        let tags = cmd.targeted_tags.map(OneOrMany::into_vec);
        let append = cmd.append.unwrap_or(false);
        self.with_clock(|core| {
            if cmd.batch.has_ids() {
                core.set_element_attributes(&cmd.batch, &to_ignore, tags.as_deref(), append)
            } else {
                core.set_selection_attributes(&cmd.batch.fields(), tags.as_deref(), append)
            }
        })
    }

    /// `position` is one of `front`, `back`, `forward` or `backward`.
    #[wasm_bindgen(js_name = orderElements)]
    pub fn order_elements(&mut self, ids: &Array, position: &str) -> String {
        let order = match position {
            "front" => Order::Front,
            "back" => Order::Back,
            "forward" => Order::Forward,
            "backward" => Order::Backward,
            other => {
                tracing::warn!(position = other, "unknown element order");
                return encode(&[]);
            }
        };
        self.with_clock(|core| core.order_elements(&strings(ids), order))
    }

    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&mut self, id: &str, markup: &str, ui_type: Option<String>, title: Option<String>) -> String {
        let role = ui_type.as_deref().map(Role::from_name);
        self.with_clock(|core| core.add_element(id, markup, role, title.as_deref()))
    }

    #[wasm_bindgen(js_name = removeElements)]
    pub fn remove_elements(&mut self, ids: &Array) -> String {
        self.with_clock(|core| core.remove_elements(&strings(ids)))
    }

    #[wasm_bindgen(js_name = updateUiElements)]
    pub fn update_ui_elements(&mut self, table_json: &str) -> String {
        let table: RoleTable = match serde_json::from_str(table_json) {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(%err, "unusable role table");
                return encode(&[]);
            }
        };
        self.with_clock(|core| core.update_ui_elements(&table))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> String {
        self.with_clock(EngineCore::zoom_in)
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> String {
        self.with_clock(EngineCore::zoom_out)
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> String {
        self.with_clock(EngineCore::reset_view)
    }

    #[wasm_bindgen(js_name = setPngScale)]
    pub fn set_png_scale(&mut self, scale: Option<f64>) {
        self.core.set_png_scale(scale);
    }

    // --- Output ---

    #[wasm_bindgen(js_name = renderMarkup)]
    pub fn render_markup(&self) -> String {
        self.core.render_markup()
    }

    #[wasm_bindgen(js_name = getCoreSvg)]
    pub fn get_core_svg(&self) -> String {
        self.core.get_core_svg()
    }

    /// `{file_name, mime, data_uri}` for the SVG download.
    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&self) -> String {
        serde_json::to_string(&self.core.export_svg()).unwrap_or_default()
    }

    /// `{file_name, mime, data_uri}` for the PNG download, or `undefined`
    /// before the content box is known.
    #[wasm_bindgen(js_name = exportPng)]
    pub fn export_png(&self) -> Result<Option<String>, JsValue> {
        let file = self.core.export_png().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(file.map(|f| serde_json::to_string(&f).unwrap_or_default()))
    }

    // --- Queries ---

    pub fn selected(&self) -> String {
        serde_json::to_string(&self.core.selected()).unwrap_or_default()
    }

    pub fn hovered(&self) -> String {
        self.core.hovered().unwrap_or_default().to_string()
    }

    pub fn zoom(&self) -> f64 {
        self.core.viewport().zoom()
    }

    #[wasm_bindgen(js_name = showMenu)]
    pub fn show_menu(&self) -> bool {
        self.core.config().show_menu
    }

    #[wasm_bindgen(js_name = menuWidth)]
    pub fn menu_width(&self) -> String {
        self.core.config().menu_width.clone()
    }

    fn advance(&mut self) -> Vec<Action> {
        self.core.tick(js_sys::Date::now())
    }

    fn with_clock(&mut self, command: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> String {
        encode(&clocked(&mut self.core, js_sys::Date::now(), command))
    }
}

/// Run timers due by `now_ms`, then `command`, so timers the command arms
/// start from the current time.
fn clocked(core: &mut EngineCore, now_ms: f64, command: impl FnOnce(&mut EngineCore) -> Vec<Action>) -> Vec<Action> {
    let mut actions = core.tick(now_ms);
    actions.extend(command(core));
    actions
}

fn parse_batch_command(raw: &str) -> Option<BatchCommand> {
    match serde_json::from_str(raw) {
        Ok(cmd) => Some(cmd),
        Err(err) => {
            tracing::warn!(%err, "unusable batch command");
            None
        }
    }
}

fn strings(values: &Array) -> Vec<String> {
    values.iter().map(|v| v.as_string().unwrap_or_default()).collect()
}

fn encode(actions: &[Action]) -> String {
    serde_json::to_string(actions).unwrap_or_else(|_| "[]".to_string())
}
