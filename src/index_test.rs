#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn rows() -> Vec<RoleRow> {
    vec![
        RoleRow::new("A", Role::Selectable).with_title("Group A"),
        RoleRow::new("B", Role::Selectable),
        RoleRow::new("C", Role::Selectable),
        RoleRow::new("btn", Role::Button).with_title(""),
        RoleRow::new("label", Role::None).with_title("Just a label"),
    ]
}

fn nested_doc() -> SvgDoc {
    SvgDoc::parse(r#"<svg><g id="A"><rect id="B"/><g><rect id="C"/><rect id="D"/></g></g><rect id="btn"/></svg>"#)
        .unwrap()
}

// =============================================================
// Role names
// =============================================================

#[test]
fn role_from_name() {
    assert_eq!(Role::from_name("selectable"), Role::Selectable);
    assert_eq!(Role::from_name("button"), Role::Button);
    assert_eq!(Role::from_name("none"), Role::None);
    assert_eq!(Role::from_name("Button"), Role::None);
}

#[test]
fn role_deserializes_unknown_as_none() {
    let role: Role = serde_json::from_str(r#""clickable""#).unwrap();
    assert_eq!(role, Role::None);
    let role: Role = serde_json::from_str(r#""button""#).unwrap();
    assert_eq!(role, Role::Button);
}

// =============================================================
// Classification
// =============================================================

#[test]
fn classify_registers_every_row_in_order() {
    let index = ElementIndex::classify(&rows());
    assert_eq!(index.len(), 5);
    assert_eq!(index.ids().collect::<Vec<_>>(), vec!["A", "B", "C", "btn", "label"]);
    assert_eq!(index.selectable().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    assert_eq!(index.buttons().collect::<Vec<_>>(), vec!["btn"]);
}

#[test]
fn classify_keeps_first_duplicate() {
    let index = ElementIndex::classify(&[RoleRow::new("x", Role::None), RoleRow::new("x", Role::Selectable)]);
    assert_eq!(index.role("x"), Some(Role::None));
    assert_eq!(index.len(), 1);
}

#[test]
fn classify_promotes_dual_role_to_button() {
    let index = ElementIndex::classify(&[RoleRow::new("x", Role::Selectable), RoleRow::new("x", Role::Button)]);
    assert!(index.is_button("x"));
    assert!(!index.is_selectable("x"));
}

#[test]
fn title_ignores_empty_strings() {
    let index = ElementIndex::classify(&rows());
    assert_eq!(index.title("A"), Some("Group A"));
    assert_eq!(index.title("btn"), None);
    assert_eq!(index.title("B"), None);
    assert_eq!(index.title("missing"), None);
}

// =============================================================
// Mutation
// =============================================================

#[test]
fn insert_refuses_existing_ids() {
    let mut index = ElementIndex::classify(&rows());
    assert!(!index.insert(&RoleRow::new("A", Role::Button)));
    assert!(index.is_selectable("A"));
    assert!(index.insert(&RoleRow::new("E", Role::Button)));
    assert!(index.is_button("E"));
}

#[test]
fn upsert_replaces_role_and_title() {
    let mut index = ElementIndex::classify(&rows());
    index.upsert(&RoleRow::new("A", Role::Button));
    assert!(index.is_button("A"));
    assert_eq!(index.title("A"), None);
}

#[test]
fn remove_forgets_the_id() {
    let mut index = ElementIndex::classify(&rows());
    assert!(index.remove("B"));
    assert!(!index.remove("B"));
    assert!(!index.contains("B"));
    assert_eq!(index.role("B"), None);
}

#[test]
fn empty_index() {
    let index = ElementIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.role("A"), None);
}

// =============================================================
// Structure
// =============================================================

#[test]
fn ancestors_of_known_and_unknown_ids() {
    let doc = nested_doc();
    assert_eq!(ElementIndex::ancestors_of(&doc, "C"), vec!["C", "", "A", ""]);
    assert!(ElementIndex::ancestors_of(&doc, "nope").is_empty());
}

#[test]
fn descendants_of_includes_self() {
    let doc = nested_doc();
    assert_eq!(ElementIndex::descendants_of(&doc, "A"), vec!["A", "B", "C", "D"]);
    assert!(ElementIndex::descendants_of(&doc, "nope").is_empty());
}

#[test]
fn selectable_group_collects_nested_selectables_only() {
    let doc = nested_doc();
    let index = ElementIndex::classify(&rows());
    assert_eq!(index.selectable_group(&doc, "A"), vec!["A", "B", "C"]);
    assert_eq!(index.selectable_group(&doc, "B"), vec!["B"]);
}
