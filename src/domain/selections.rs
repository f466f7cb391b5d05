use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Chosen option ids per category.
///
/// There is no `Deserialize`: the only way in is [`Selections::toggle`], which
/// keeps single-select categories at one option at most.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selections {
    by_category: BTreeMap<String, BTreeSet<String>>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-select flips membership. Single-select replaces the current
    /// choice, and toggling the chosen option again clears the category.
    pub fn toggle(&mut self, category_id: &str, option_id: &str, multi_select: bool) {
        let current = self.by_category.entry(category_id.to_string()).or_default();

        if multi_select {
            if !current.remove(option_id) {
                current.insert(option_id.to_string());
            }
        } else {
            let was_chosen = current.contains(option_id);
            current.clear();
            if !was_chosen {
                current.insert(option_id.to_string());
            }
        }

        if current.is_empty() {
            self.by_category.remove(category_id);
        }
    }

    /// Copy with one toggle applied.
    pub fn with_toggled(&self, category_id: &str, option_id: &str, multi_select: bool) -> Self {
        let mut next = self.clone();
        next.toggle(category_id, option_id, multi_select);
        next
    }

    pub fn is_selected(&self, category_id: &str, option_id: &str) -> bool {
        self.by_category
            .get(category_id)
            .is_some_and(|ids| ids.contains(option_id))
    }

    pub fn selected(&self, category_id: &str) -> impl Iterator<Item = &str> {
        self.by_category
            .get(category_id)
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    pub fn total_selected(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_selected() == 0
    }

    pub fn clear(&mut self) {
        self.by_category.clear();
    }
}
