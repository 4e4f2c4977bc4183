//! Document model: an owned, mutable SVG element tree.
//!
//! The markup handed to the widget is parsed once with `roxmltree` into an
//! arena of [`Node`]s addressed by [`NodeId`]. Everything the widget changes
//! (styles, attributes, overlay clones, ordering, added and removed elements)
//! is applied here, and the rendered markup is serialized back out of it.
//!
//! Ids are indexed only for nodes that belong to the live content. Clones made
//! for the overlay are never registered, so [`SvgDoc::find_by_id`] always
//! resolves to the real element.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::consts::{SVG_NS, XLINK_NS};

/// Index of a node in the document arena.
pub type NodeId = usize;

/// Error returned when markup cannot be turned into a document.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The markup is not well-formed XML.
    #[error("failed to parse SVG markup: {0}")]
    Parse(#[from] roxmltree::Error),
    /// The root element is not `<svg>`.
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
    /// A fragment contained no element.
    #[error("markup fragment has no element")]
    EmptyFragment,
}

/// An element: tag name (with prefix, if any) and ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Which way [`SvgDoc::reorder`] moves a node among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Last child: painted on top.
    Front,
    /// First child: painted underneath everything else.
    Back,
    /// Past the next element sibling.
    Forward,
    /// Behind the previous element sibling.
    Backward,
}

/// Attribute overrides applied to the root element while serializing.
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    /// `(name, Some(value))` sets an attribute, `(name, None)` drops it.
    pub root_attrs: Vec<(String, Option<String>)>,
    /// Subtrees left out of the output.
    pub skip: Vec<NodeId>,
    /// Also escape `<` and `>` inside attribute values.
    pub sanitize_attributes: bool,
}

/// Owned SVG tree.
#[derive(Debug, Clone)]
pub struct SvgDoc {
    nodes: Vec<Node>,
    /// Slots of removed subtrees, reused by later pushes.
    free: Vec<NodeId>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
}

impl SvgDoc {
    /// Parse a complete `<svg>` document.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Parse`] for malformed markup and [`DocError::NotSvg`]
    /// when the root element is something else.
    pub fn parse(markup: &str) -> Result<Self, DocError> {
        let parsed = roxmltree::Document::parse_with_options(markup, parse_options())?;
        let src_root = parsed.root_element();
        if src_root.tag_name().name() != "svg" {
            return Err(DocError::NotSvg(src_root.tag_name().name().to_string()));
        }

        let mut doc = Self { nodes: Vec::new(), free: Vec::new(), root: 0, ids: HashMap::new() };
        let root = doc.import(src_root, None);
        doc.root = root;

        // Namespace declarations are not attributes in roxmltree; put the
        // in-scope ones back on the root so the output stays self-contained.
        let mut decls: Vec<(String, String)> = Vec::new();
        for ns in src_root.namespaces() {
            match ns.name() {
                Some("xml") => {}
                Some(prefix) => decls.push((format!("xmlns:{prefix}"), ns.uri().to_string())),
                None => decls.push(("xmlns".to_string(), ns.uri().to_string())),
            }
        }
        if !decls.iter().any(|(k, _)| k == "xmlns") {
            decls.insert(0, ("xmlns".to_string(), SVG_NS.to_string()));
        }
        if let NodeKind::Element(el) = &mut doc.nodes[root].kind {
            decls.append(&mut el.attrs);
            el.attrs = decls;
        }

        doc.register_subtree(root);
        Ok(doc)
    }

    /// Parse a single-element fragment into a detached subtree.
    ///
    /// The fragment is read inside an `<svg>` wrapper that declares the SVG and
    /// XLink namespaces, so `xlink:href` and friends resolve. Ids in the
    /// fragment are not registered until the subtree is attached with
    /// [`SvgDoc::attach`].
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Parse`] for malformed markup and
    /// [`DocError::EmptyFragment`] when there is no element inside.
    pub fn parse_fragment(&mut self, markup: &str) -> Result<NodeId, DocError> {
        let wrapped = format!(r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}">{markup}</svg>"#);
        let parsed = roxmltree::Document::parse_with_options(&wrapped, parse_options())?;
        let Some(first) = parsed.root_element().children().find(roxmltree::Node::is_element) else {
            return Err(DocError::EmptyFragment);
        };
        Ok(self.import(first, None))
    }

    fn import(&mut self, src: roxmltree::Node<'_, '_>, parent: Option<NodeId>) -> NodeId {
        let kind = if src.is_element() {
            let attrs = src
                .attributes()
                .map(|a| (qualified(src, a.name(), a.namespace()), a.value().to_string()))
                .collect();
            NodeKind::Element(Element { tag: qualified(src, src.tag_name().name(), src.tag_name().namespace()), attrs })
        } else {
            NodeKind::Text(src.text().unwrap_or_default().to_string())
        };
        let id = self.push(Node { kind, parent, children: Vec::new() });
        for child in src.children().filter(|c| c.is_element() || c.is_text()) {
            let child_id = self.import(child, Some(id));
            self.nodes[id].children.push(child_id);
        }
        id
    }

    fn push(&mut self, node: Node) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot] = node;
            return slot;
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Blank the slots of a detached subtree and queue them for reuse.
    fn release(&mut self, id: NodeId) {
        for n in self.descendants(id) {
            self.nodes[n] = Node { kind: NodeKind::Text(String::new()), parent: None, children: Vec::new() };
            self.free.push(n);
        }
    }

    /// Arena slots allocated so far, free ones included.
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    // --- Lookup ---

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children only.
    #[must_use]
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).iter().copied().filter(|&c| self.element(c).is_some()).collect()
    }

    /// The live content element carrying `id`, if any.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// First element with the given tag in document order, below the root.
    #[must_use]
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().skip(1).find(|&n| self.tag(n) == Some(tag))
    }

    /// The node itself and its ancestors, leaf to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.nodes.get(id).map(|_| id);
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out
    }

    /// The node itself and all descendants, in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.nodes.get(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        out
    }

    /// Ids of the element and its element ancestors, leaf to root. Ancestors
    /// without an id contribute an empty string.
    #[must_use]
    pub fn ancestor_ids(&self, id: NodeId) -> Vec<String> {
        self.ancestors(id)
            .into_iter()
            .filter(|&n| self.element(n).is_some())
            .map(|n| self.attr(n, "id").unwrap_or_default().to_string())
            .collect()
    }

    /// Ids found in the subtree rooted at `id`, in pre-order, including the
    /// node's own id.
    #[must_use]
    pub fn descendant_ids(&self, id: NodeId) -> Vec<String> {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.attr(n, "id"))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    // --- Attributes ---

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Set an attribute, keeping its position if it already exists.
    ///
    /// Changing `id` here does not touch the id index.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        match el.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
        true
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_mut(id)?;
        let pos = el.attrs.iter().position(|(k, _)| k == name)?;
        Some(el.attrs.remove(pos).1)
    }

    /// Value of one property in the inline `style` attribute.
    #[must_use]
    pub fn style(&self, id: NodeId, property: &str) -> Option<String> {
        let raw = self.attr(id, "style")?;
        parse_style(raw).into_iter().find(|(k, _)| k == property).map(|(_, v)| v)
    }

    /// Set one property in the inline `style` attribute.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        let mut decls = self.attr(id, "style").map(parse_style).unwrap_or_default();
        match decls.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => decls.push((property.to_string(), value.to_string())),
        }
        let joined = decls.iter().map(|(k, v)| format!("{k}: {v}")).collect::<Vec<_>>().join("; ");
        self.set_attr(id, "style", &joined)
    }

    /// Effective presentation value: inline style first, then the attribute.
    #[must_use]
    pub fn presentation(&self, id: NodeId, property: &str) -> Option<String> {
        self.style(id, property).or_else(|| self.attr(id, property).map(str::to_string))
    }

    // --- Structure ---

    /// Append a detached subtree under `parent` and index its ids.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.append_child(parent, child) {
            return false;
        }
        self.register_subtree(child);
        true
    }

    /// Append a detached subtree under `parent` without indexing ids.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.element(parent).is_none() || self.nodes.get(child).is_none() || parent == child {
            return false;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    /// Create an empty element under `parent`.
    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.element(parent)?;
        let id = self.push(Node {
            kind: NodeKind::Element(Element { tag: tag.to_string(), attrs: Vec::new() }),
            parent: None,
            children: Vec::new(),
        });
        self.append_child(parent, id);
        Some(id)
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Detach a subtree, drop its ids from the index and free its slots. The
    /// removed node ids must not be used afterwards. Returns the ids that were
    /// removed from the index.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<String> {
        if self.nodes.get(id).is_none() || id == self.root {
            return Vec::new();
        }
        let mut dropped = Vec::new();
        for n in self.descendants(id) {
            let Some(key) = self.attr(n, "id").map(str::to_string) else {
                continue;
            };
            if self.ids.get(&key) == Some(&n) {
                self.ids.remove(&key);
                dropped.push(key);
            }
        }
        self.detach(id);
        self.release(id);
        dropped
    }

    /// Deep-copy a subtree. The copy is detached and its ids are not indexed.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?.clone();
        let copy = self.push(Node { kind: node.kind, parent: None, children: Vec::new() });
        for child in node.children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.nodes[child_copy].parent = Some(copy);
                self.nodes[copy].children.push(child_copy);
            }
        }
        Some(copy)
    }

    /// Move a node among its siblings. `Forward` and `Backward` step over
    /// text nodes to the next element sibling. Returns whether anything moved.
    pub fn reorder(&mut self, id: NodeId, order: Order) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let element_slots: Vec<usize> = self.nodes[parent]
            .children
            .iter()
            .enumerate()
            .filter(|&(_, &c)| self.element(c).is_some())
            .map(|(i, _)| i)
            .collect();
        let siblings = &mut self.nodes[parent].children;
        let Some(pos) = siblings.iter().position(|&c| c == id) else {
            return false;
        };
        let rank = element_slots.iter().position(|&i| i == pos);
        let last = siblings.len() - 1;
        match order {
            Order::Front if pos < last => {
                siblings.remove(pos);
                siblings.push(id);
            }
            Order::Back if pos > 0 => {
                siblings.remove(pos);
                siblings.insert(0, id);
            }
            Order::Forward => match rank.and_then(|r| element_slots.get(r + 1)) {
                Some(&next) => siblings.swap(pos, next),
                None => return false,
            },
            Order::Backward => match rank.and_then(|r| r.checked_sub(1)).and_then(|r| element_slots.get(r)) {
                Some(&prev) => siblings.swap(pos, prev),
                None => return false,
            },
            _ => return false,
        }
        true
    }

    fn register_subtree(&mut self, id: NodeId) {
        for n in self.descendants(id) {
            if let Some(key) = self.attr(n, "id").filter(|v| !v.is_empty()).map(str::to_string) {
                self.ids.entry(key).or_insert(n);
            }
        }
    }

    // --- Output ---

    /// Serialize the whole document.
    #[must_use]
    pub fn to_markup(&self, opts: &SerializeOptions) -> String {
        self.subtree_markup(self.root, opts)
    }

    /// Serialize one subtree. Root overrides apply only when `id` is the root.
    #[must_use]
    pub fn subtree_markup(&self, id: NodeId, opts: &SerializeOptions) -> String {
        let skip: HashSet<NodeId> = opts.skip.iter().copied().collect();
        let mut out = String::new();
        self.write_node(id, opts, &skip, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, opts: &SerializeOptions, skip: &HashSet<NodeId>, out: &mut String) {
        if skip.contains(&id) {
            return;
        }
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let el = match &node.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape_text(text));
                return;
            }
            NodeKind::Element(el) => el,
        };

        let mut attrs = el.attrs.clone();
        if id == self.root {
            for (name, value) in &opts.root_attrs {
                attrs.retain(|(k, _)| k != name);
                if let Some(value) = value {
                    attrs.push((name.clone(), value.clone()));
                }
            }
        }

        out.push('<');
        out.push_str(&el.tag);
        for (k, v) in &attrs {
            // Writing into a String cannot fail.
            write!(out, " {k}=\"{}\"", escape_attr(v, opts.sanitize_attributes)).unwrap_or_default();
        }
        if node.children.iter().all(|c| skip.contains(c)) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for &child in &node.children {
            self.write_node(child, opts, skip, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

fn parse_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions { allow_dtd: true, ..roxmltree::ParsingOptions::default() }
}

/// Rebuild `prefix:name` from a resolved namespace.
fn qualified(node: roxmltree::Node<'_, '_>, name: &str, namespace: Option<&str>) -> String {
    match namespace.and_then(|ns| node.lookup_prefix(ns)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{name}"),
        _ => name.to_string(),
    }
}

/// Split an inline style into `(property, value)` pairs, in order.
#[must_use]
pub fn parse_style(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim();
            (!k.is_empty()).then(|| (k.to_string(), v.trim().to_string()))
        })
        .collect()
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(raw: &str, sanitize: bool) -> String {
    let out = raw.replace('&', "&amp;").replace('"', "&quot;");
    if sanitize { out.replace('<', "&lt;").replace('>', "&gt;") } else { out }
}
