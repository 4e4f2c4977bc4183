#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

const SAMPLE: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 10 10">"#,
    r#"<g id="main"><g id="grp"><rect id="a" style="fill: red" stroke-width="2"/><g><circle id="b"/></g></g>"#,
    r##"<use id="u" xlink:href="#a"/></g>"##,
    "</svg>",
);

fn sample() -> SvgDoc {
    SvgDoc::parse(SAMPLE).unwrap()
}

fn node(doc: &SvgDoc, id: &str) -> NodeId {
    doc.find_by_id(id).unwrap()
}

fn plain(doc: &SvgDoc) -> String {
    doc.to_markup(&SerializeOptions::default())
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_rejects_malformed_markup() {
    assert!(matches!(SvgDoc::parse("<svg><g></svg>"), Err(DocError::Parse(_))));
}

#[test]
fn parse_rejects_non_svg_root() {
    assert!(matches!(SvgDoc::parse("<html/>"), Err(DocError::NotSvg(tag)) if tag == "html"));
}

#[test]
fn parse_adds_svg_namespace_when_missing() {
    let doc = SvgDoc::parse(r#"<svg><rect id="r"/></svg>"#).unwrap();
    assert_eq!(plain(&doc), r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="r"/></svg>"#);
}

#[test]
fn parse_keeps_prefixed_attributes() {
    let doc = sample();
    assert_eq!(doc.attr(node(&doc, "u"), "xlink:href"), Some("#a"));
    assert!(plain(&doc).contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
}

#[test]
fn parse_fragment_resolves_xlink() {
    let mut doc = sample();
    let frag = doc.parse_fragment(r##"<use xlink:href="#b"/>"##).unwrap();
    assert_eq!(doc.attr(frag, "xlink:href"), Some("#b"));
}

#[test]
fn parse_fragment_without_element_fails() {
    let mut doc = sample();
    assert!(matches!(doc.parse_fragment("just text"), Err(DocError::EmptyFragment)));
}

// =============================================================
// Lookup
// =============================================================

#[test]
fn find_by_id_and_contains_id() {
    let doc = sample();
    assert_eq!(doc.tag(node(&doc, "a")), Some("rect"));
    assert!(doc.contains_id("b"));
    assert!(!doc.contains_id("missing"));
}

#[test]
fn first_by_tag_skips_root() {
    let doc = sample();
    assert_eq!(doc.first_by_tag("g"), Some(node(&doc, "main")));
    assert_eq!(doc.first_by_tag("svg"), None);
}

#[test]
fn ancestor_ids_are_leaf_first_with_blanks() {
    let doc = sample();
    let chain = doc.ancestor_ids(node(&doc, "b"));
    assert_eq!(chain, vec!["b", "", "grp", "main", ""]);
}

#[test]
fn descendant_ids_in_pre_order() {
    let doc = sample();
    assert_eq!(doc.descendant_ids(node(&doc, "grp")), vec!["grp", "a", "b"]);
}

#[test]
fn child_elements_skip_text() {
    let doc = SvgDoc::parse("<svg>\n  <g id=\"x\"/>\n</svg>").unwrap();
    let kids = doc.child_elements(doc.root());
    assert_eq!(kids, vec![node(&doc, "x")]);
    assert!(doc.children(doc.root()).len() > kids.len());
}

// =============================================================
// Attributes and styles
// =============================================================

#[test]
fn set_attr_replaces_in_place() {
    let mut doc = sample();
    let a = node(&doc, "a");
    doc.set_attr(a, "style", "fill: blue");
    let el = doc.element(a).unwrap();
    assert_eq!(el.attrs[1], ("style".to_string(), "fill: blue".to_string()));
}

#[test]
fn remove_attr_returns_old_value() {
    let mut doc = sample();
    let a = node(&doc, "a");
    assert_eq!(doc.remove_attr(a, "stroke-width"), Some("2".to_string()));
    assert_eq!(doc.attr(a, "stroke-width"), None);
}

#[test]
fn set_style_adds_and_replaces_properties() {
    let mut doc = sample();
    let a = node(&doc, "a");
    doc.set_style(a, "stroke", "black");
    doc.set_style(a, "fill", "green");
    assert_eq!(doc.attr(a, "style"), Some("fill: green; stroke: black"));
}

#[test]
fn presentation_prefers_inline_style() {
    let mut doc = sample();
    let a = node(&doc, "a");
    assert_eq!(doc.presentation(a, "stroke-width").as_deref(), Some("2"));
    doc.set_style(a, "stroke-width", "5");
    assert_eq!(doc.presentation(a, "stroke-width").as_deref(), Some("5"));
}

#[test]
fn parse_style_tolerates_noise() {
    let decls = parse_style(" fill : red ;; :x; stroke:blue;");
    assert_eq!(decls, vec![("fill".to_string(), "red".to_string()), ("stroke".to_string(), "blue".to_string())]);
}

// =============================================================
// Structure
// =============================================================

#[test]
fn attach_registers_fragment_ids() {
    let mut doc = sample();
    let frag = doc.parse_fragment(r#"<g id="new"><rect id="inner"/></g>"#).unwrap();
    assert!(!doc.contains_id("new"));
    assert!(doc.attach(node(&doc, "main"), frag));
    assert!(doc.contains_id("new"));
    assert!(doc.contains_id("inner"));
}

#[test]
fn attach_does_not_shadow_existing_ids() {
    let mut doc = sample();
    let original = node(&doc, "a");
    let frag = doc.parse_fragment(r#"<rect id="a"/>"#).unwrap();
    doc.attach(doc.root(), frag);
    assert_eq!(doc.find_by_id("a"), Some(original));
}

#[test]
fn remove_subtree_drops_ids() {
    let mut doc = sample();
    let grp = node(&doc, "grp");
    let dropped = doc.remove_subtree(grp);
    assert_eq!(dropped, vec!["grp", "a", "b"]);
    assert!(!doc.contains_id("a"));
    assert!(!plain(&doc).contains("grp"));
}

#[test]
fn root_cannot_be_removed() {
    let mut doc = sample();
    assert!(doc.remove_subtree(doc.root()).is_empty());
}

#[test]
fn clone_subtree_is_detached_and_unindexed() {
    let mut doc = sample();
    let grp = node(&doc, "grp");
    let copy = doc.clone_subtree(grp).unwrap();
    assert_ne!(copy, grp);
    assert_eq!(doc.parent(copy), None);
    assert_eq!(doc.descendant_ids(copy), vec!["grp", "a", "b"]);
    doc.append_child(doc.root(), copy);
    assert_eq!(doc.find_by_id("grp"), Some(grp));
}

#[test]
fn removed_slots_are_reused() {
    let mut doc = sample();
    let grp = node(&doc, "grp");
    let cycle = |doc: &mut SvgDoc| {
        let copy = doc.clone_subtree(grp).unwrap();
        doc.append_child(doc.root(), copy);
        doc.remove_subtree(copy);
    };
    cycle(&mut doc);
    let warmed = doc.arena_len();

    for _ in 0..50 {
        cycle(&mut doc);
    }
    assert_eq!(doc.arena_len(), warmed);
    assert_eq!(doc.find_by_id("grp"), Some(grp));
    assert_eq!(doc.descendant_ids(grp), vec!["grp", "a", "b"]);
}

#[test]
fn create_element_appends_to_parent() {
    let mut doc = sample();
    let g = doc.create_element(doc.root(), "g").unwrap();
    assert_eq!(doc.children(doc.root()).last(), Some(&g));
    assert_eq!(doc.tag(g), Some("g"));
}

#[test]
fn reorder_moves_among_siblings() {
    let mut doc = SvgDoc::parse(r#"<svg><rect id="a"/><rect id="b"/><rect id="c"/></svg>"#).unwrap();
    let ids = |doc: &SvgDoc| -> Vec<String> {
        doc.child_elements(doc.root()).iter().map(|&n| doc.attr(n, "id").unwrap_or_default().to_string()).collect()
    };

    assert!(doc.reorder(node(&doc, "a"), Order::Front));
    assert_eq!(ids(&doc), vec!["b", "c", "a"]);
    assert!(doc.reorder(node(&doc, "a"), Order::Back));
    assert_eq!(ids(&doc), vec!["a", "b", "c"]);
    assert!(doc.reorder(node(&doc, "a"), Order::Forward));
    assert_eq!(ids(&doc), vec!["b", "a", "c"]);
    assert!(doc.reorder(node(&doc, "a"), Order::Backward));
    assert_eq!(ids(&doc), vec!["a", "b", "c"]);
}

#[test]
fn reorder_steps_over_whitespace_between_elements() {
    let mut doc = SvgDoc::parse("<svg>\n  <rect id=\"a\"/>\n  <rect id=\"b\"/>\n  <rect id=\"c\"/>\n</svg>").unwrap();
    let ids = |doc: &SvgDoc| -> Vec<String> {
        doc.child_elements(doc.root()).iter().map(|&n| doc.attr(n, "id").unwrap_or_default().to_string()).collect()
    };

    assert!(doc.reorder(node(&doc, "a"), Order::Forward));
    assert_eq!(ids(&doc), vec!["b", "a", "c"]);
    assert!(doc.reorder(node(&doc, "c"), Order::Backward));
    assert_eq!(ids(&doc), vec!["b", "c", "a"]);
}

#[test]
fn reorder_with_only_text_beside_is_a_no_op() {
    let mut doc = SvgDoc::parse("<svg>\n  <rect id=\"a\"/>\n  <rect id=\"b\"/>\n</svg>").unwrap();
    assert!(!doc.reorder(node(&doc, "b"), Order::Forward));
    assert!(!doc.reorder(node(&doc, "a"), Order::Backward));
}

#[test]
fn reorder_at_the_edge_is_a_no_op() {
    let mut doc = SvgDoc::parse(r#"<svg><rect id="a"/><rect id="b"/></svg>"#).unwrap();
    assert!(!doc.reorder(node(&doc, "b"), Order::Front));
    assert!(!doc.reorder(node(&doc, "a"), Order::Backward));
    assert!(!doc.reorder(doc.root(), Order::Front));
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn root_overrides_set_and_drop_attributes() {
    let doc = sample();
    let opts = SerializeOptions {
        root_attrs: vec![("viewBox".to_string(), None), ("width".to_string(), Some("100%".to_string()))],
        ..SerializeOptions::default()
    };
    let out = doc.to_markup(&opts);
    assert!(!out.contains("viewBox"));
    assert!(out.starts_with("<svg") && out.contains(r#"width="100%""#));
}

#[test]
fn skipped_subtrees_are_left_out() {
    let doc = sample();
    let opts = SerializeOptions { skip: vec![node(&doc, "grp")], ..SerializeOptions::default() };
    let out = doc.to_markup(&opts);
    assert!(!out.contains(r#"id="a""#));
    assert!(out.contains(r#"id="u""#));
}

#[test]
fn sanitize_escapes_angle_brackets_in_attributes() {
    let doc = SvgDoc::parse(r#"<svg><rect id="r" data-x="&lt;b&gt;"/></svg>"#).unwrap();
    let raw = doc.to_markup(&SerializeOptions::default());
    assert!(raw.contains(r#"data-x="<b>""#));
    let safe = doc.to_markup(&SerializeOptions { sanitize_attributes: true, ..SerializeOptions::default() });
    assert!(safe.contains(r#"data-x="&lt;b&gt;""#));
}

#[test]
fn text_content_is_escaped() {
    let doc = SvgDoc::parse("<svg><text id=\"t\">a &amp; b</text></svg>").unwrap();
    assert!(plain(&doc).contains("<text id=\"t\">a &amp; b</text>"));
}

#[test]
fn markup_round_trips_through_parse() {
    let doc = sample();
    let again = SvgDoc::parse(&plain(&doc)).unwrap();
    assert_eq!(again.descendant_ids(again.root()), doc.descendant_ids(doc.root()));
    assert_eq!(again.attr(node(&again, "u"), "xlink:href"), Some("#a"));
    assert_eq!(again.attr(node(&again, "a"), "style"), Some("fill: red"));
}
