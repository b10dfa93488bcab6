//! Filter descriptors, committed filters and per-kind matching.

mod format;
mod state;

pub use format::format_chip;
pub use state::{DraftRange, FilterState};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::value::Value;

// =============================================================================
// Descriptors
// =============================================================================

/// One choice of a select filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value stored in the active filter and compared against cells.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Kind of a filter, with exactly the options its editor needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// Free text, case-insensitive substring match.
    Text { placeholder: Option<String> },
    /// One of a fixed set of choices, exact match.
    Select { options: Vec<SelectOption> },
    /// A single number, exact match.
    Number {
        min: Option<f64>,
        max: Option<f64>,
        placeholder: Option<String>,
    },
    /// A calendar day.
    Date,
    /// Inclusive numeric range, either bound optional.
    Range { min: Option<f64>, max: Option<f64> },
    /// Yes/no. Formatted in chips; has no editor yet.
    Boolean,
}

impl FilterKind {
    /// The tag of this kind.
    pub fn tag(&self) -> FilterKindTag {
        match self {
            FilterKind::Text { .. } => FilterKindTag::Text,
            FilterKind::Select { .. } => FilterKindTag::Select,
            FilterKind::Number { .. } => FilterKindTag::Number,
            FilterKind::Date => FilterKindTag::Date,
            FilterKind::Range { .. } => FilterKindTag::Range,
            FilterKind::Boolean => FilterKindTag::Boolean,
        }
    }
}

/// Kind without options, carried by committed filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKindTag {
    Text,
    Select,
    Number,
    Date,
    Range,
    Boolean,
}

/// A filter the user can pick in the advanced filter editor.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    /// Column id (or record field) the filter applies to. Unique per table.
    pub key: String,
    /// Label shown in the picker and on chips.
    pub label: String,
    pub kind: FilterKind,
}

impl FilterDescriptor {
    /// Free-text filter.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Text { placeholder: None })
    }

    /// Select filter over `options`.
    pub fn select(
        key: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = SelectOption>,
    ) -> Self {
        Self::new(
            key,
            label,
            FilterKind::Select {
                options: options.into_iter().collect(),
            },
        )
    }

    /// Single-number filter.
    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(
            key,
            label,
            FilterKind::Number {
                min: None,
                max: None,
                placeholder: None,
            },
        )
    }

    /// Date filter.
    pub fn date(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Date)
    }

    /// Range filter with optional input bounds.
    pub fn range(
        key: impl Into<String>,
        label: impl Into<String>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        Self::new(key, label, FilterKind::Range { min, max })
    }

    /// Boolean filter.
    pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Boolean)
    }

    /// Descriptor with an explicit kind.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }

    /// Set the input placeholder (text and number kinds).
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            FilterKind::Text { placeholder } | FilterKind::Number { placeholder, .. } => {
                *placeholder = Some(text.into());
            }
            _ => {}
        }
        self
    }

    /// Label of a select option, if this is a select filter that has it.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        match &self.kind {
            FilterKind::Select { options } => options
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.label.as_str()),
            _ => None,
        }
    }
}

// =============================================================================
// Active filters
// =============================================================================

/// Committed filter value; the variant is the filter's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    Select(String),
    Number(f64),
    Date(NaiveDate),
    Range { min: Option<f64>, max: Option<f64> },
    Boolean(bool),
}

impl FilterValue {
    pub fn kind(&self) -> FilterKindTag {
        match self {
            FilterValue::Text(_) => FilterKindTag::Text,
            FilterValue::Select(_) => FilterKindTag::Select,
            FilterValue::Number(_) => FilterKindTag::Number,
            FilterValue::Date(_) => FilterKindTag::Date,
            FilterValue::Range { .. } => FilterKindTag::Range,
            FilterValue::Boolean(_) => FilterKindTag::Boolean,
        }
    }

    /// Whether a cell value satisfies this filter.
    ///
    /// | kind | rule |
    /// |------|------|
    /// | text | case-insensitive substring of the cell text |
    /// | select | cell text equals the option value |
    /// | number | numeric equality |
    /// | date | same calendar day |
    /// | range | `min <= cell <= max`, missing bounds are open |
    /// | boolean | equality |
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            FilterValue::Text(needle) => cell
                .to_string()
                .to_lowercase()
                .contains(&needle.trim().to_lowercase()),
            FilterValue::Select(value) => cell.to_string() == *value,
            FilterValue::Number(n) => cell.as_f64().is_some_and(|v| v == *n),
            FilterValue::Date(date) => cell.as_date() == Some(*date),
            FilterValue::Range { min, max } => {
                if min.is_none() && max.is_none() {
                    return true;
                }
                let Some(v) = cell.as_f64() else {
                    return false;
                };
                min.is_none_or(|min| v >= min) && max.is_none_or(|max| v <= max)
            }
            FilterValue::Boolean(b) => cell.as_bool() == Some(*b),
        }
    }
}

/// A filter currently narrowing the table.
///
/// The list of active filters belongs to the caller; the table only reads
/// it and proposes changes through its callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub key: String,
    pub label: String,
    pub value: FilterValue,
}

impl ActiveFilter {
    pub fn new(key: impl Into<String>, label: impl Into<String>, value: FilterValue) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value,
        }
    }

    pub fn kind(&self) -> FilterKindTag {
        self.value.kind()
    }
}

/// `filters` with `filter` replacing the entry of the same key in place,
/// or appended when the key is new.
pub fn with_filter(filters: &[ActiveFilter], filter: ActiveFilter) -> Vec<ActiveFilter> {
    let mut next = filters.to_vec();
    match next.iter_mut().find(|f| f.key == filter.key) {
        Some(existing) => *existing = filter,
        None => next.push(filter),
    }
    next
}

/// `filters` without the entry for `key`.
pub fn without_filter(filters: &[ActiveFilter], key: &str) -> Vec<ActiveFilter> {
    filters.iter().filter(|f| f.key != key).cloned().collect()
}
