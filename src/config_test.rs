#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn parse(value: &serde_json::Value) -> WidgetConfig {
    WidgetConfig::from_json(&value.to_string()).unwrap()
}

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn empty_object_gives_defaults() {
    let cfg = parse(&json!({}));
    assert_eq!(cfg, WidgetConfig::default());
    assert_eq!(cfg.svg_markup, "");
    assert!(cfg.show_menu);
    assert_eq!(cfg.menu_width, DEFAULT_MENU_WIDTH);
    assert_eq!((cfg.zoom_min, cfg.zoom_max, cfg.zoom_step), (ZOOM_MIN, ZOOM_MAX, ZOOM_STEP));
    assert!(!cfg.clip);
    assert_eq!(cfg.default_png_scale, DEFAULT_PNG_SCALE);
    assert_eq!(cfg.dblclick_timeout_ms, DBLCLICK_TIMEOUT_MS);
    assert_eq!(cfg.hover_timeout_ms, HOVER_TIMEOUT_MS);
    assert!(cfg.sanitize_attributes);
    assert!(cfg.show_tooltips);
    assert_eq!(cfg.structure_shape_tags.len(), STRUCTURE_SHAPES.len());
    assert!(cfg.selected.is_empty());
}

#[test]
fn nulls_mean_defaults() {
    let cfg = parse(&json!({"show_menu": null, "zoom_min": null, "ui_elements": null, "selected": null}));
    assert_eq!(cfg, WidgetConfig::default());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(WidgetConfig::from_json("{not json"), Err(ConfigError::Json(_))));
}

#[test]
fn with_markup_keeps_other_defaults() {
    let cfg = WidgetConfig::with_markup("<svg/>");
    assert_eq!(cfg.svg_markup, "<svg/>");
    assert_eq!(cfg.selection_color, DEFAULT_SELECTION_COLOR);
}

// =============================================================
// Aliases and scalars
// =============================================================

#[test]
fn host_field_names_are_accepted() {
    let cfg = parse(&json!({
        "svg_txt": "<svg/>",
        "structure_shapes": "rect",
        "dblclick_timeout": 300,
        "hover_timeout": 150,
    }));
    assert_eq!(cfg.svg_markup, "<svg/>");
    assert_eq!(cfg.structure_shape_tags, vec!["rect"]);
    assert_eq!(cfg.dblclick_timeout_ms, 300.0);
    assert_eq!(cfg.hover_timeout_ms, 150.0);
}

#[test]
fn selected_accepts_scalar_or_list() {
    assert_eq!(parse(&json!({"selected": "A"})).selected, vec!["A"]);
    assert_eq!(parse(&json!({"selected": ["A", "B"]})).selected, vec!["A", "B"]);
}

#[test]
fn one_or_many_normalizes() {
    assert_eq!(one_or_many::<i32>(None), Vec::<i32>::new());
    assert_eq!(one_or_many(Some(OneOrMany::One(3))), vec![3]);
    assert_eq!(one_or_many(Some(OneOrMany::Many(vec![1, 2]))), vec![1, 2]);
}

// =============================================================
// Validation
// =============================================================

#[test]
fn out_of_range_numbers_fall_back() {
    let cfg = parse(&json!({
        "zoom_step": 0.9,
        "default_png_scale": -2,
        "selection_opacity": 1.5,
        "hover_width": -1,
        "dblclick_timeout": 0,
    }));
    assert_eq!(cfg.zoom_step, ZOOM_STEP);
    assert_eq!(cfg.default_png_scale, DEFAULT_PNG_SCALE);
    assert_eq!(cfg.selection_opacity, DEFAULT_SELECTION_OPACITY);
    assert_eq!(cfg.hover_width, DEFAULT_HOVER_WIDTH);
    assert_eq!(cfg.dblclick_timeout_ms, DBLCLICK_TIMEOUT_MS);
}

#[test]
fn zoom_range_must_contain_one() {
    let cfg = parse(&json!({"zoom_min": 2, "zoom_max": 10}));
    assert_eq!((cfg.zoom_min, cfg.zoom_max), (ZOOM_MIN, ZOOM_MAX));
    let cfg = parse(&json!({"zoom_min": 0.25, "zoom_max": 4}));
    assert_eq!((cfg.zoom_min, cfg.zoom_max), (0.25, 4.0));
}

#[test]
fn empty_structure_shapes_fall_back() {
    let cfg = parse(&json!({"structure_shapes": []}));
    assert_eq!(cfg.structure_shape_tags.len(), STRUCTURE_SHAPES.len());
}

#[test]
fn zoom_config_mirrors_fields() {
    let cfg = parse(&json!({"clip": true, "zoom_step": 1.5}));
    assert_eq!(cfg.zoom(), ZoomConfig { min: ZOOM_MIN, max: ZOOM_MAX, step: 1.5, clip: true });
}

// =============================================================
// Role tables
// =============================================================

#[test]
fn role_table_in_row_form() {
    let cfg = parse(&json!({"ui_elements": [
        {"id": "A", "ui_type": "selectable", "title": "Tank"},
        {"id": 7, "ui_type": "button"},
        {"id": "C", "ui_type": "mystery", "title": ""},
        {"id": null, "ui_type": "button"},
    ]}));
    assert_eq!(cfg.role_table.rows, vec![
        RoleRow::new("A", Role::Selectable).with_title("Tank"),
        RoleRow::new("7", Role::Button),
        RoleRow::new("C", Role::None),
    ]);
}

#[test]
fn role_table_in_column_form_recycles_scalars() {
    let cfg = parse(&json!({"ui_elements": {"id": ["A", "B"], "ui_type": "selectable", "title": ["a", null]}}));
    assert_eq!(cfg.role_table.rows, vec![
        RoleRow::new("A", Role::Selectable).with_title("a"),
        RoleRow::new("B", Role::Selectable),
    ]);
}

#[test]
fn role_table_single_row_columns() {
    let table: RoleTable = serde_json::from_value(json!({"id": "A", "role": "button"})).unwrap();
    assert_eq!(table.rows, vec![RoleRow::new("A", Role::Button)]);
}

// =============================================================
// Batch tables
// =============================================================

#[test]
fn batch_table_in_row_form() {
    let table: BatchTable =
        serde_json::from_value(json!([{"id": "A", "fill": "red", "stroke-width": 2}, {"id": "B", "fill": null}]))
            .unwrap();
    assert_eq!(table.rows, vec![
        BatchRow { id: Some("A".to_string()), fields: fields(&[("fill", "red"), ("stroke-width", "2")]) },
        BatchRow { id: Some("B".to_string()), fields: vec![] },
    ]);
    assert!(table.has_ids());
}

#[test]
fn batch_table_in_column_form() {
    let table: BatchTable = serde_json::from_value(json!({"id": ["A", "B"], "fill": "red"})).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[1], BatchRow { id: Some("B".to_string()), fields: fields(&[("fill", "red")]) });
}

#[test]
fn batch_table_without_ids_targets_selection() {
    let table: BatchTable = serde_json::from_value(json!({"fill": "red", "opacity": 0.5})).unwrap();
    assert!(!table.has_ids());
    assert_eq!(table.fields(), fields(&[("fill", "red"), ("opacity", "0.5")]));
}

#[test]
fn batch_table_keeps_first_duplicate_id() {
    let table: BatchTable =
        serde_json::from_value(json!([{"id": "A", "fill": "red"}, {"id": "A", "fill": "blue"}])).unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].fields, fields(&[("fill", "red")]));
}

// =============================================================
// Highlight styles
// =============================================================

#[test]
fn selection_style_from_config() {
    let cfg = parse(&json!({"selection_color": "red", "selection_opacity": 0.8, "selection_width": 3}));
    assert_eq!(cfg.selection_style(), HighlightStyle { color: "red".to_string(), opacity: 0.8, width_delta: 3.0 });
}

#[test]
fn hover_style_per_role() {
    let cfg = WidgetConfig::default();
    assert_eq!(cfg.hover_style(Role::Button).map(|s| s.color), Some(DEFAULT_HOVER_BUTTON_COLOR.to_string()));
    assert_eq!(cfg.hover_style(Role::Selectable).map(|s| s.color), Some(DEFAULT_HOVER_SELECTABLE_COLOR.to_string()));
    assert_eq!(cfg.hover_style(Role::None), None);
}

#[test]
fn empty_hover_color_disables_highlight() {
    let cfg = parse(&json!({"hover_color": {"button": "", "selectable": "blue", "none": "pink"}}));
    assert_eq!(cfg.hover_style(Role::Button), None);
    assert_eq!(cfg.hover_style(Role::None).map(|s| s.width_delta), Some(DEFAULT_HOVER_WIDTH));
}
