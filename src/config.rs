//! Widget configuration parsed from the host's JSON payload.
//!
//! Hosts built on data frames send tables column-wise (`{"id": [..], ..}`),
//! collapse single-element arrays to scalars, and send `null` for anything
//! unset. All of that is normalized here: scalars become one-element lists,
//! `null` and missing fields take their defaults, and out-of-range numbers fall
//! back to defaults with a warning. Only malformed JSON is an error.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::Value;

use crate::consts::{
    DBLCLICK_TIMEOUT_MS, HOVER_TIMEOUT_MS, STRUCTURE_SHAPES, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
use crate::index::{Role, RoleRow};
use crate::overlay::HighlightStyle;
use crate::styling::BatchRow;
use crate::viewport::ZoomConfig;

pub const DEFAULT_MENU_WIDTH: &str = "30px";
pub const DEFAULT_PNG_SCALE: f64 = 1.0;
pub const DEFAULT_SELECTION_COLOR: &str = "orange";
pub const DEFAULT_SELECTION_OPACITY: f64 = 0.5;
pub const DEFAULT_SELECTION_WIDTH: f64 = 2.0;
pub const DEFAULT_HOVER_BUTTON_COLOR: &str = "yellow";
pub const DEFAULT_HOVER_SELECTABLE_COLOR: &str = "grey";
pub const DEFAULT_HOVER_OPACITY: f64 = 0.5;
pub const DEFAULT_HOVER_WIDTH: f64 = 4.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid widget configuration: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Scalar-or-list ──────────────────────────────────────────────

/// A value the host may send either alone or as a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Normalize an optional scalar-or-list into a list (`None` becomes empty).
#[must_use]
pub fn one_or_many<T>(value: Option<OneOrMany<T>>) -> Vec<T> {
    value.map(OneOrMany::into_vec).unwrap_or_default()
}

// ── Role tables ─────────────────────────────────────────────────

/// Element roles and titles, in row form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawRoleTable")]
pub struct RoleTable {
    pub rows: Vec<RoleRow>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRoleTable {
    Rows(Vec<RawRoleRow>),
    Columns(RoleColumns),
}

#[derive(Debug, Deserialize)]
struct RawRoleRow {
    id: Value,
    #[serde(default, alias = "ui_type", alias = "type")]
    role: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RoleColumns {
    id: Option<OneOrMany<Value>>,
    #[serde(alias = "ui_type", alias = "type")]
    role: Option<OneOrMany<Option<String>>>,
    title: Option<OneOrMany<Option<String>>>,
}

impl From<RawRoleTable> for RoleTable {
    fn from(raw: RawRoleTable) -> Self {
        let rows = match raw {
            RawRoleTable::Rows(rows) => rows
                .into_iter()
                .filter_map(|r| Some(role_row(cell_text(&r.id)?, r.role.as_deref(), r.title)))
                .collect(),
            RawRoleTable::Columns(cols) => {
                let ids = one_or_many(cols.id);
                let roles = one_or_many(cols.role);
                let titles = one_or_many(cols.title);
                ids.iter()
                    .enumerate()
                    .filter_map(|(i, id)| {
                        let role = recycle(&roles, i).cloned().flatten();
                        let title = recycle(&titles, i).cloned().flatten();
                        Some(role_row(cell_text(id)?, role.as_deref(), title))
                    })
                    .collect()
            }
        };
        Self { rows }
    }
}

fn role_row(id: String, role: Option<&str>, title: Option<String>) -> RoleRow {
    RoleRow { id, role: role.map_or(Role::None, Role::from_name), title: title.filter(|t| !t.is_empty()) }
}

// ── Style / attribute batches ───────────────────────────────────

/// Style or attribute batch rows. Rows without an `id` column target the
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBatchTable")]
pub struct BatchTable {
    pub rows: Vec<BatchRow>,
}

impl BatchTable {
    /// Whether the table names elements (as opposed to targeting the selection).
    #[must_use]
    pub fn has_ids(&self) -> bool {
        self.rows.iter().any(|r| r.id.is_some())
    }

    /// Fields of every row, in order, for selection batches.
    #[must_use]
    pub fn fields(&self) -> Vec<(String, String)> {
        self.rows.iter().flat_map(|r| r.fields.iter().cloned()).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBatchTable {
    Rows(Vec<IndexMap<String, Value>>),
    Columns(IndexMap<String, OneOrMany<Value>>),
}

impl From<RawBatchTable> for BatchTable {
    fn from(raw: RawBatchTable) -> Self {
        let rows: Vec<BatchRow> = match raw {
            RawBatchTable::Rows(rows) => rows.iter().map(batch_row).collect(),
            RawBatchTable::Columns(cols) => {
                let cols: Vec<(String, Vec<Value>)> = cols.into_iter().map(|(k, v)| (k, v.into_vec())).collect();
                let len = cols.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
                (0..len)
                    .map(|i| {
                        let row: IndexMap<String, Value> = cols
                            .iter()
                            .filter_map(|(k, v)| recycle(v, i).map(|cell| (k.clone(), cell.clone())))
                            .collect();
                        batch_row(&row)
                    })
                    .collect()
            }
        };

        let mut seen = IndexSet::new();
        let rows = rows
            .into_iter()
            .filter(|row| match &row.id {
                Some(id) if !seen.insert(id.clone()) => {
                    tracing::warn!(id = %id, "duplicate id in batch table; keeping the first row");
                    false
                }
                _ => true,
            })
            .collect();
        Self { rows }
    }
}

fn batch_row(cells: &IndexMap<String, Value>) -> BatchRow {
    let mut row = BatchRow::default();
    for (name, cell) in cells {
        let Some(text) = cell_text(cell) else {
            continue;
        };
        if name == "id" {
            row.id = Some(text);
        } else {
            row.fields.push((name.clone(), text));
        }
    }
    row
}

/// Render a table cell as text. `null` and nested values have no text.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Column cell `i`, recycling single-value columns across all rows.
fn recycle<T>(column: &[T], i: usize) -> Option<&T> {
    if column.len() == 1 { column.first() } else { column.get(i) }
}

// ── Hover colors ────────────────────────────────────────────────

/// Hover highlight color per role. A role without a color is still hovered
/// (notified, tooltip) but not highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HoverColors {
    pub button: Option<String>,
    pub selectable: Option<String>,
    pub none: Option<String>,
}

impl Default for HoverColors {
    fn default() -> Self {
        Self {
            button: Some(DEFAULT_HOVER_BUTTON_COLOR.to_string()),
            selectable: Some(DEFAULT_HOVER_SELECTABLE_COLOR.to_string()),
            none: None,
        }
    }
}

impl HoverColors {
    #[must_use]
    pub fn for_role(&self, role: Role) -> Option<&str> {
        match role {
            Role::Button => self.button.as_deref(),
            Role::Selectable => self.selectable.as_deref(),
            Role::None => self.none.as_deref(),
        }
        .filter(|c| !c.is_empty())
    }
}

// ── Widget configuration ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub svg_markup: String,
    pub role_table: RoleTable,
    pub style_batches: BatchTable,
    pub attribute_batches: BatchTable,
    pub show_menu: bool,
    pub menu_width: String,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub clip: bool,
    pub default_png_scale: f64,
    pub selection_color: String,
    pub selection_opacity: f64,
    pub selection_width: f64,
    pub hover_color: HoverColors,
    pub hover_opacity: f64,
    pub hover_width: f64,
    pub structure_shape_tags: Vec<String>,
    pub dblclick_timeout_ms: f64,
    pub hover_timeout_ms: f64,
    pub sanitize_attributes: bool,
    pub show_tooltips: bool,
    /// Ids selected right after initialization.
    pub selected: Vec<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl WidgetConfig {
    /// Parse the host's JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the payload is not valid JSON or a
    /// field has an unusable shape (an object where a number belongs, say).
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(raw)?;
        Ok(raw.into())
    }

    /// Configuration for `markup` with every other option at its default.
    #[must_use]
    pub fn with_markup(markup: impl Into<String>) -> Self {
        Self { svg_markup: markup.into(), ..Self::default() }
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomConfig {
        ZoomConfig { min: self.zoom_min, max: self.zoom_max, step: self.zoom_step, clip: self.clip }
    }

    #[must_use]
    pub fn selection_style(&self) -> HighlightStyle {
        HighlightStyle {
            color: self.selection_color.clone(),
            opacity: self.selection_opacity,
            width_delta: self.selection_width,
        }
    }

    /// Hover highlight for an element of `role`, if that role has a color.
    #[must_use]
    pub fn hover_style(&self, role: Role) -> Option<HighlightStyle> {
        self.hover_color.for_role(role).map(|color| HighlightStyle {
            color: color.to_string(),
            opacity: self.hover_opacity,
            width_delta: self.hover_width,
        })
    }
}

/// Wire shape: every field optional so that `null` and absence both mean
/// "use the default".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    #[serde(alias = "svg_txt")]
    svg_markup: Option<String>,
    #[serde(alias = "ui_elements")]
    role_table: Option<RoleTable>,
    #[serde(alias = "element_styles")]
    style_batches: Option<BatchTable>,
    #[serde(alias = "element_attributes")]
    attribute_batches: Option<BatchTable>,
    show_menu: Option<bool>,
    menu_width: Option<String>,
    zoom_min: Option<f64>,
    zoom_max: Option<f64>,
    zoom_step: Option<f64>,
    clip: Option<bool>,
    default_png_scale: Option<f64>,
    selection_color: Option<String>,
    selection_opacity: Option<f64>,
    selection_width: Option<f64>,
    hover_color: Option<HoverColors>,
    hover_opacity: Option<f64>,
    hover_width: Option<f64>,
    #[serde(alias = "structure_shapes")]
    structure_shape_tags: Option<OneOrMany<String>>,
    #[serde(alias = "dblclick_timeout")]
    dblclick_timeout_ms: Option<f64>,
    #[serde(alias = "hover_timeout")]
    hover_timeout_ms: Option<f64>,
    sanitize_attributes: Option<bool>,
    show_tooltips: Option<bool>,
    selected: Option<OneOrMany<String>>,
}

impl From<RawConfig> for WidgetConfig {
    fn from(raw: RawConfig) -> Self {
        let min = checked("zoom_min", raw.zoom_min, ZOOM_MIN, |v| v > 0.0);
        let max = checked("zoom_max", raw.zoom_max, ZOOM_MAX, |v| v > 0.0);
        let (zoom_min, zoom_max) = if min <= 1.0 && 1.0 <= max {
            (min, max)
        } else {
            tracing::warn!(min, max, "zoom range must contain 1; using defaults");
            (ZOOM_MIN, ZOOM_MAX)
        };

        let mut structure_shape_tags = one_or_many(raw.structure_shape_tags);
        if structure_shape_tags.is_empty() {
            structure_shape_tags = STRUCTURE_SHAPES.iter().map(|s| (*s).to_string()).collect();
        }

        Self {
            svg_markup: raw.svg_markup.unwrap_or_default(),
            role_table: raw.role_table.unwrap_or_default(),
            style_batches: raw.style_batches.unwrap_or_default(),
            attribute_batches: raw.attribute_batches.unwrap_or_default(),
            show_menu: raw.show_menu.unwrap_or(true),
            menu_width: raw.menu_width.unwrap_or_else(|| DEFAULT_MENU_WIDTH.to_string()),
            zoom_min,
            zoom_max,
            zoom_step: checked("zoom_step", raw.zoom_step, ZOOM_STEP, |v| v > 1.0),
            clip: raw.clip.unwrap_or(false),
            default_png_scale: checked("default_png_scale", raw.default_png_scale, DEFAULT_PNG_SCALE, |v| v > 0.0),
            selection_color: raw.selection_color.unwrap_or_else(|| DEFAULT_SELECTION_COLOR.to_string()),
            selection_opacity: checked("selection_opacity", raw.selection_opacity, DEFAULT_SELECTION_OPACITY, unit),
            selection_width: checked("selection_width", raw.selection_width, DEFAULT_SELECTION_WIDTH, |v| v >= 0.0),
            hover_color: raw.hover_color.unwrap_or_default(),
            hover_opacity: checked("hover_opacity", raw.hover_opacity, DEFAULT_HOVER_OPACITY, unit),
            hover_width: checked("hover_width", raw.hover_width, DEFAULT_HOVER_WIDTH, |v| v >= 0.0),
            structure_shape_tags,
            dblclick_timeout_ms: checked("dblclick_timeout", raw.dblclick_timeout_ms, DBLCLICK_TIMEOUT_MS, |v| v > 0.0),
            hover_timeout_ms: checked("hover_timeout", raw.hover_timeout_ms, HOVER_TIMEOUT_MS, |v| v > 0.0),
            sanitize_attributes: raw.sanitize_attributes.unwrap_or(true),
            show_tooltips: raw.show_tooltips.unwrap_or(true),
            selected: one_or_many(raw.selected),
        }
    }
}

fn unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

/// `value` if present, finite and accepted by `valid`; otherwise `default`.
fn checked(name: &str, value: Option<f64>, default: f64, valid: impl Fn(f64) -> bool) -> f64 {
    match value {
        None => default,
        Some(v) if v.is_finite() && valid(v) => v,
        Some(v) => {
            tracing::warn!(option = name, value = v, default, "out-of-range option; using default");
            default
        }
    }
}
