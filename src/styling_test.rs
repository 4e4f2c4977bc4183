#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::STRUCTURE_SHAPES;
use crate::index::{Role, RoleRow};

// =============================================================
// Helpers
// =============================================================

fn doc() -> SvgDoc {
    SvgDoc::parse(concat!(
        r#"<svg><g id="tank"><rect id="body" fill="white"/><g id="valve"><circle id="knob"/></g>"#,
        r#"<text id="label">T1</text></g><rect id="other"/></svg>"#,
    ))
    .unwrap()
}

fn shapes() -> Vec<String> {
    STRUCTURE_SHAPES.iter().map(|s| (*s).to_string()).collect()
}

fn row(id: &str, fields: &[(&str, &str)]) -> BatchRow {
    BatchRow {
        id: Some(id.to_string()),
        fields: fields.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
    }
}

fn node(doc: &SvgDoc, id: &str) -> NodeId {
    doc.find_by_id(id).unwrap()
}

// =============================================================
// Element batches
// =============================================================

#[test]
fn style_reaches_targeted_descendants_only() {
    let mut doc = doc();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    let writes = apply(&mut doc, &[row("tank", &[("fill", "red")])], opts, Target::Style);

    assert_eq!(writes, 2);
    assert_eq!(doc.style(node(&doc, "body"), "fill").as_deref(), Some("red"));
    assert_eq!(doc.style(node(&doc, "knob"), "fill").as_deref(), Some("red"));
    assert_eq!(doc.style(node(&doc, "label"), "fill"), None);
    assert_eq!(doc.style(node(&doc, "tank"), "fill"), None);
    assert_eq!(doc.style(node(&doc, "other"), "fill"), None);
}

#[test]
fn ignored_subtrees_are_skipped() {
    let mut doc = doc();
    let tags = shapes();
    let ignore = vec!["valve".to_string()];
    let opts = ApplyOptions { to_ignore: &ignore, targeted_tags: &tags, append: false };
    apply(&mut doc, &[row("tank", &[("fill", "red")])], opts, Target::Style);

    assert_eq!(doc.style(node(&doc, "body"), "fill").as_deref(), Some("red"));
    assert_eq!(doc.style(node(&doc, "knob"), "fill"), None);
}

#[test]
fn custom_targeted_tags() {
    let mut doc = doc();
    let tags = vec!["text".to_string(), "g".to_string()];
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    let writes = apply(&mut doc, &[row("tank", &[("font-weight", "bold")])], opts, Target::Style);
    assert_eq!(writes, 3);
    assert_eq!(doc.style(node(&doc, "label"), "font-weight").as_deref(), Some("bold"));
    assert_eq!(doc.style(node(&doc, "body"), "font-weight"), None);
}

#[test]
fn attributes_are_written_as_attributes() {
    let mut doc = doc();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    apply(&mut doc, &[row("body", &[("fill", "blue"), ("rx", "4")])], opts, Target::Attribute);

    let body = node(&doc, "body");
    assert_eq!(doc.attr(body, "fill"), Some("blue"));
    assert_eq!(doc.attr(body, "rx"), Some("4"));
    assert_eq!(doc.attr(body, "style"), None);
}

#[test]
fn append_concatenates_existing_values() {
    let mut doc = doc();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: true };
    apply(&mut doc, &[row("body", &[("fill", "-x"), ("class", "hot")])], opts, Target::Attribute);

    let body = node(&doc, "body");
    assert_eq!(doc.attr(body, "fill"), Some("white-x"));
    assert_eq!(doc.attr(body, "class"), Some("hot"));
}

#[test]
fn id_attribute_is_never_rewritten() {
    let mut doc = doc();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    let writes = apply(&mut doc, &[row("body", &[("id", "renamed")])], opts, Target::Attribute);
    assert_eq!(writes, 0);
    assert_eq!(doc.attr(node(&doc, "body"), "id"), Some("body"));
}

#[test]
fn unknown_and_missing_ids_are_skipped() {
    let mut doc = doc();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    let rows = vec![row("ghost", &[("fill", "red")]), BatchRow { id: None, fields: vec![] }];
    assert_eq!(apply(&mut doc, &rows, opts, Target::Style), 0);
}

// =============================================================
// Selection batches
// =============================================================

#[test]
fn selection_batch_spares_unselected_selectables() {
    let mut doc = doc();
    let index = ElementIndex::classify(&[
        RoleRow::new("tank", Role::Selectable),
        RoleRow::new("valve", Role::Selectable),
        RoleRow::new("other", Role::Selectable),
    ]);
    let selected: IndexSet<String> = ["tank".to_string()].into_iter().collect();
    let tags = shapes();
    let opts = ApplyOptions { to_ignore: &[], targeted_tags: &tags, append: false };
    let fields = vec![("stroke".to_string(), "black".to_string())];

    let writes = apply_to_selection(&mut doc, &index, &selected, &fields, opts, Target::Style);
    assert_eq!(writes, 1);
    assert_eq!(doc.style(node(&doc, "body"), "stroke").as_deref(), Some("black"));
    assert_eq!(doc.style(node(&doc, "knob"), "stroke"), None);
    assert_eq!(doc.style(node(&doc, "other"), "stroke"), None);
}
