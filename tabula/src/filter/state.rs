//! Draft values for filters that have not been applied yet.

use std::collections::HashMap;

/// Draft bounds of a range filter. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DraftRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DraftRange {
    /// Whether at least one bound is set.
    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Per-key drafts the user is composing in the filter editor.
///
/// Nothing here is validated; the editor decides what may be applied.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    values: HashMap<String, String>,
    ranges: HashMap<String, DraftRange>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite the scalar draft for `key`.
    pub fn update_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Set or overwrite the range draft for `key`.
    pub fn update_range(&mut self, key: &str, min: Option<f64>, max: Option<f64>) {
        self.ranges.insert(key.to_string(), DraftRange { min, max });
    }

    /// Scalar draft for `key`, empty when none.
    pub fn value(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Range draft for `key`, unbounded when none.
    pub fn range(&self, key: &str) -> DraftRange {
        self.ranges.get(key).copied().unwrap_or_default()
    }

    /// Whether any draft exists for `key`.
    pub fn has_draft(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.ranges.contains_key(key)
    }

    /// Drop both drafts for `key`.
    pub fn clear(&mut self, key: &str) {
        self.values.remove(key);
        self.ranges.remove(key);
    }

    /// Drop every draft.
    pub fn clear_all(&mut self) {
        self.values.clear();
        self.ranges.clear();
    }

    /// Whether the store holds no drafts at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.ranges.is_empty()
    }
}
