//! Per-property storage on an entity.

use crate::model::{LanguageMap, Slot};

/// The values of one declared property, plus its natural-language map.
///
/// Functional properties hold at most one slot; the entity accessors and the
/// codec enforce that. `language_map` is None when no map is configured,
/// which is distinct from a configured empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Property {
    pub(crate) slots: Vec<Slot>,
    pub(crate) language_map: Option<LanguageMap>,
}

impl Property {
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn first(&self) -> Option<&Slot> {
        self.slots.first()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when there are no values and no language map.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.language_map.is_none()
    }

    pub fn language_map(&self) -> Option<&LanguageMap> {
        self.language_map.as_ref()
    }
}
