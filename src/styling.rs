//! Batch styling and attribute updates.
//!
//! Each batch row names an element and a set of fields. The element and its
//! descendants are walked; subtrees rooted at an ignored id are skipped, and
//! fields are written only on nodes whose tag is targeted.

#[cfg(test)]
#[path = "styling_test.rs"]
mod styling_test;

use indexmap::IndexSet;

use crate::doc::{NodeId, SvgDoc};
use crate::index::ElementIndex;

/// Whether fields land in the inline `style` or as attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Style,
    Attribute,
}

/// One row of a style or attribute batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchRow {
    /// Element to start from. Rows without an id apply to the selection.
    pub id: Option<String>,
    /// `(name, value)` pairs, in column order.
    pub fields: Vec<(String, String)>,
}

/// How a batch is applied.
#[derive(Debug, Clone, Copy)]
pub struct ApplyOptions<'a> {
    pub to_ignore: &'a [String],
    pub targeted_tags: &'a [String],
    /// Concatenate with the existing value instead of replacing it.
    pub append: bool,
}

/// Apply every row that names an element. Returns the number of writes.
pub fn apply(doc: &mut SvgDoc, rows: &[BatchRow], opts: ApplyOptions<'_>, target: Target) -> usize {
    let mut writes = 0;
    for row in rows {
        let Some(id) = row.id.as_deref() else {
            continue;
        };
        let Some(start) = doc.find_by_id(id) else {
            tracing::debug!(id, "batch row names an unknown element");
            continue;
        };
        writes += visit(doc, start, &row.fields, opts, target);
    }
    writes
}

/// Apply `fields` to every selected element, leaving unselected selectables
/// nested inside them untouched.
pub fn apply_to_selection(
    doc: &mut SvgDoc,
    index: &ElementIndex,
    selected: &IndexSet<String>,
    fields: &[(String, String)],
    opts: ApplyOptions<'_>,
    target: Target,
) -> usize {
    let mut to_ignore: Vec<String> = index.selectable().filter(|id| !selected.contains(*id)).map(str::to_string).collect();
    to_ignore.extend(opts.to_ignore.iter().cloned());
    let rows: Vec<BatchRow> =
        selected.iter().map(|id| BatchRow { id: Some(id.clone()), fields: fields.to_vec() }).collect();
    apply(doc, &rows, ApplyOptions { to_ignore: &to_ignore, ..opts }, target)
}

fn visit(doc: &mut SvgDoc, node: NodeId, fields: &[(String, String)], opts: ApplyOptions<'_>, target: Target) -> usize {
    if doc.element(node).is_none() {
        return 0;
    }
    if doc.attr(node, "id").is_some_and(|id| opts.to_ignore.iter().any(|i| i == id)) {
        return 0;
    }
    let mut writes = 0;
    if doc.tag(node).is_some_and(|tag| opts.targeted_tags.iter().any(|t| t == tag)) {
        for (name, value) in fields {
            if write_field(doc, node, name, value, opts.append, target) {
                writes += 1;
            }
        }
    }
    for child in doc.children(node).to_vec() {
        writes += visit(doc, child, fields, opts, target);
    }
    writes
}

fn write_field(doc: &mut SvgDoc, node: NodeId, name: &str, value: &str, append: bool, target: Target) -> bool {
    match target {
        Target::Style => {
            let value = match doc.style(node, name) {
                Some(existing) if append => format!("{existing}{value}"),
                _ => value.to_string(),
            };
            doc.set_style(node, name, &value)
        }
        Target::Attribute => {
            if name == "id" {
                tracing::warn!(node, "refusing to rewrite an element id through an attribute batch");
                return false;
            }
            let value = match doc.attr(node, name) {
                Some(existing) if append => format!("{existing}{value}"),
                _ => value.to_string(),
            };
            doc.set_attr(node, name, &value)
        }
    }
}
