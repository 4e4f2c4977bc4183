//! Element roles: which ids are selectable, which are buttons, and their
//! tooltip titles.
//!
//! The index is the authority on roles; the document only answers structural
//! questions (who is an ancestor or descendant of whom).

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::doc::SvgDoc;

/// Interaction role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can be part of the selection.
    Selectable,
    /// Emits operate notifications when clicked.
    Button,
    /// Hoverable (and titled) but otherwise inert.
    #[default]
    #[serde(other)]
    None,
}

impl Role {
    /// Map a host role name; anything unrecognized is [`Role::None`].
    #[must_use]
    pub fn from_name(raw: &str) -> Self {
        match raw {
            "selectable" => Self::Selectable,
            "button" => Self::Button,
            _ => Self::None,
        }
    }
}

/// One row of a role table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    pub id: String,
    pub role: Role,
    pub title: Option<String>,
}

impl RoleRow {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role, title: None }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    role: Role,
    title: Option<String>,
}

/// Registered elements keyed by id, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    entries: IndexMap<String, Entry>,
}

impl ElementIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a role table.
    ///
    /// Later duplicates of an id are ignored, with one exception: an id listed
    /// as both selectable and button becomes a button.
    #[must_use]
    pub fn classify(rows: &[RoleRow]) -> Self {
        let mut index = Self::new();
        for row in rows {
            if index.insert(row) {
                continue;
            }
            if row.role == Role::Button && index.is_selectable(&row.id) {
                tracing::warn!(id = %row.id, "id is both selectable and button; treating it as a button");
                if let Some(entry) = index.entries.get_mut(&row.id) {
                    entry.role = Role::Button;
                }
            } else {
                tracing::warn!(id = %row.id, "duplicate id in role table; keeping the first row");
            }
        }
        index
    }

    /// Register a new id. Returns `false` (and changes nothing) if it exists.
    pub fn insert(&mut self, row: &RoleRow) -> bool {
        if self.entries.contains_key(&row.id) {
            return false;
        }
        self.entries.insert(row.id.clone(), Entry { role: row.role, title: row.title.clone() });
        true
    }

    /// Register or replace an id.
    pub fn upsert(&mut self, row: &RoleRow) {
        self.entries.insert(row.id.clone(), Entry { role: row.role, title: row.title.clone() });
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.shift_remove(id).is_some()
    }

    // --- Queries ---

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn role(&self, id: &str) -> Option<Role> {
        self.entries.get(id).map(|e| e.role)
    }

    #[must_use]
    pub fn is_selectable(&self, id: &str) -> bool {
        self.role(id) == Some(Role::Selectable)
    }

    #[must_use]
    pub fn is_button(&self, id: &str) -> bool {
        self.role(id) == Some(Role::Button)
    }

    /// Tooltip title, if one is set and non-empty.
    #[must_use]
    pub fn title(&self, id: &str) -> Option<&str> {
        self.entries.get(id).and_then(|e| e.title.as_deref()).filter(|t| !t.is_empty())
    }

    pub fn selectable(&self) -> impl Iterator<Item = &str> {
        self.ids_with(Role::Selectable)
    }

    pub fn buttons(&self) -> impl Iterator<Item = &str> {
        self.ids_with(Role::Button)
    }

    fn ids_with(&self, role: Role) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(move |(_, e)| e.role == role).map(|(id, _)| id.as_str())
    }

    /// Every registered id, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // --- Structure ---

    /// Ids on the path from the element `id` up to the root, leaf first.
    /// Unknown ids yield an empty chain.
    #[must_use]
    pub fn ancestors_of(doc: &SvgDoc, id: &str) -> Vec<String> {
        doc.find_by_id(id).map(|n| doc.ancestor_ids(n)).unwrap_or_default()
    }

    /// Ids inside the element `id`, including its own, in pre-order.
    #[must_use]
    pub fn descendants_of(doc: &SvgDoc, id: &str) -> Vec<String> {
        doc.find_by_id(id).map(|n| doc.descendant_ids(n)).unwrap_or_default()
    }

    /// `id` followed by every selectable id nested inside it.
    #[must_use]
    pub fn selectable_group(&self, doc: &SvgDoc, id: &str) -> Vec<String> {
        let mut group = vec![id.to_string()];
        for inner in Self::descendants_of(doc, id) {
            if inner != id && self.is_selectable(&inner) && !group.contains(&inner) {
                group.push(inner);
            }
        }
        group
    }
}
