#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::index::{ElementIndex, Role};

/// What a pointer target chain resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: String,
    pub role: Role,
}

/// Nearest registered element in `chain` (leaf first), whatever its role.
///
/// Used for hover. Dual-role ids are already resolved to buttons by
/// [`ElementIndex::classify`].
#[must_use]
pub fn hover_target(chain: &[String], index: &ElementIndex) -> Option<Hit> {
    chain
        .iter()
        .filter(|id| !id.is_empty())
        .find_map(|id| index.role(id).map(|role| Hit { id: id.clone(), role }))
}

/// Nearest selectable element in `chain`.
#[must_use]
pub fn selectable_target(chain: &[String], index: &ElementIndex) -> Option<String> {
    chain.iter().find(|id| index.is_selectable(id)).cloned()
}

/// Nearest button in `chain`.
#[must_use]
pub fn button_target(chain: &[String], index: &ElementIndex) -> Option<String> {
    chain.iter().find(|id| index.is_button(id)).cloned()
}
