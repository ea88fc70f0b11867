//! Row selection state.
//!
//! Selection tracks rows by [`RowKey`], so it stays stable when the
//! displayed sequence is re-filtered, re-sorted or regrouped. Rows that
//! disappear from the filtered set keep their selection.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::model::RowKey;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Selection is disabled.
    None,
    /// At most one row.
    Single,
    /// Any number of rows.
    #[default]
    Multiple,
}

/// Key-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    selected: BTreeSet<RowKey>,
}

impl Selection {
    /// Create an empty selection in the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the mode. Switching to `None` clears the selection and
    /// switching to `Single` keeps only the first key.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        match mode {
            SelectionMode::None => self.selected.clear(),
            SelectionMode::Single => {
                if let Some(first) = self.selected.pop_first() {
                    self.selected.clear();
                    self.selected.insert(first);
                }
            }
            SelectionMode::Multiple => {}
        }
    }

    /// Selected keys, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter()
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection. Returns whether anything was selected.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.selected.is_empty();
        self.selected.clear();
        had_any
    }

    /// Toggle one key. Returns `true` when the selection changed.
    ///
    /// In `Single` mode selecting a key replaces the previous one; in `None`
    /// mode nothing happens.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        match self.mode {
            SelectionMode::None => {
                log::warn!("ignoring selection of {} in selection mode none", key);
                false
            }
            SelectionMode::Single => {
                if self.selected.remove(&key) {
                    return true;
                }
                self.selected.clear();
                self.selected.insert(key);
                true
            }
            SelectionMode::Multiple => {
                if !self.selected.remove(&key) {
                    self.selected.insert(key);
                }
                true
            }
        }
    }

    /// Whether the selection holds exactly the distinct `keys`. Repeated
    /// keys count once.
    pub fn equals<'a>(&self, keys: impl IntoIterator<Item = &'a RowKey>) -> bool {
        let mut seen = BTreeSet::new();
        for key in keys {
            if !self.selected.contains(key) {
                return false;
            }
            seen.insert(key);
        }
        seen.len() == self.selected.len()
    }

    /// Replace the selection with `keys`. Returns `true` when the selection
    /// changed.
    ///
    /// Only `Multiple` mode accepts more than one key.
    pub fn replace(&mut self, keys: impl IntoIterator<Item = RowKey>) -> bool {
        let keys: BTreeSet<RowKey> = match self.mode {
            SelectionMode::None => {
                log::warn!("ignoring bulk selection in selection mode none");
                return false;
            }
            SelectionMode::Single => keys.into_iter().take(1).collect(),
            SelectionMode::Multiple => keys.into_iter().collect(),
        };
        if keys == self.selected {
            return false;
        }
        self.selected = keys;
        true
    }
}
