//! Kind-specific filter editors.

use chrono::NaiveDate;

use crate::filter::{
    ActiveFilter, FilterDescriptor, FilterKind, FilterKindTag, FilterState, FilterValue,
    SelectOption,
};
use crate::labels::Labels;

use super::ActionView;

/// When an editor commits its value.
///
/// | kind | policy |
/// |------|--------|
/// | text, number, range | `Explicit`: the user composes a draft, then presses Apply |
/// | select, date | `Immediate`: picking a value applies it |
/// | boolean | `Unsupported`: no editor |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPolicy {
    Explicit,
    Immediate,
    Unsupported,
}

impl ApplyPolicy {
    pub fn for_kind(kind: FilterKindTag) -> Self {
        match kind {
            FilterKindTag::Text | FilterKindTag::Number | FilterKindTag::Range => {
                ApplyPolicy::Explicit
            }
            FilterKindTag::Select | FilterKindTag::Date => ApplyPolicy::Immediate,
            FilterKindTag::Boolean => ApplyPolicy::Unsupported,
        }
    }
}

/// The input widget of an editor and its current content.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorControl {
    Text {
        value: String,
        placeholder: String,
    },
    Number {
        value: String,
        placeholder: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
        min_label: String,
        max_label: String,
        bounds: (Option<f64>, Option<f64>),
    },
    Select {
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    Date {
        value: Option<NaiveDate>,
    },
}

/// Editor for the filter picked in the advanced filter selector.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEditorView {
    pub key: String,
    pub label: String,
    pub policy: ApplyPolicy,
    pub control: EditorControl,
    /// Present for explicit-apply editors.
    pub apply: Option<ActionView>,
    /// Present once the draft holds something to clear.
    pub clear: Option<ActionView>,
}

/// Build the editor view, or `None` for kinds without an editor.
pub(crate) fn editor_view(
    descriptor: &FilterDescriptor,
    active: Option<&ActiveFilter>,
    drafts: &FilterState,
    labels: &Labels,
) -> Option<FilterEditorView> {
    let key = descriptor.key.as_str();
    let policy = ApplyPolicy::for_kind(descriptor.kind.tag());

    let (control, can_apply, has_draft) = match &descriptor.kind {
        FilterKind::Text { placeholder } => {
            let value = drafts.value(key);
            let filled = !value.trim().is_empty();
            let control = EditorControl::Text {
                value,
                placeholder: placeholder.clone().unwrap_or_default(),
            };
            (control, filled, filled)
        }
        FilterKind::Number {
            min,
            max,
            placeholder,
        } => {
            let value = drafts.value(key);
            let parses = parse_number(&value, *min, *max).is_some();
            let filled = !value.trim().is_empty();
            let control = EditorControl::Number {
                value,
                placeholder: placeholder.clone().unwrap_or_default(),
                min: *min,
                max: *max,
            };
            (control, parses, filled)
        }
        FilterKind::Range { min, max } => {
            let draft = drafts.range(key);
            let control = EditorControl::Range {
                min: draft.min,
                max: draft.max,
                min_label: labels.range_min.clone(),
                max_label: labels.range_max.clone(),
                bounds: (*min, *max),
            };
            (control, draft.is_set(), draft.is_set())
        }
        FilterKind::Select { options } => {
            let selected = active.and_then(|f| match &f.value {
                FilterValue::Select(v) => Some(v.clone()),
                _ => None,
            });
            let control = EditorControl::Select {
                options: options.clone(),
                selected,
            };
            (control, false, false)
        }
        FilterKind::Date => {
            let value = active.and_then(|f| match f.value {
                FilterValue::Date(d) => Some(d),
                _ => None,
            });
            (EditorControl::Date { value }, false, false)
        }
        FilterKind::Boolean => return None,
    };

    let explicit = policy == ApplyPolicy::Explicit;
    Some(FilterEditorView {
        key: descriptor.key.clone(),
        label: descriptor.label.clone(),
        policy,
        control,
        apply: explicit.then(|| ActionView::new(&labels.apply, can_apply)),
        clear: (explicit && has_draft).then(|| ActionView::new(&labels.clear, true)),
    })
}

/// Turn the draft of an explicit-apply editor into a filter.
///
/// Returns `None` when there is nothing applicable: blank text, an
/// unparsable number, or a range with no bound.
pub(crate) fn draft_filter(descriptor: &FilterDescriptor, drafts: &FilterState) -> Option<ActiveFilter> {
    let key = descriptor.key.as_str();
    let value = match &descriptor.kind {
        FilterKind::Text { .. } => {
            let text = drafts.value(key);
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            FilterValue::Text(text.to_string())
        }
        FilterKind::Number { min, max, .. } => {
            FilterValue::Number(parse_number(&drafts.value(key), *min, *max)?)
        }
        FilterKind::Range { .. } => {
            let range = drafts.range(key);
            if !range.is_set() {
                return None;
            }
            FilterValue::Range {
                min: range.min,
                max: range.max,
            }
        }
        _ => return None,
    };

    Some(ActiveFilter::new(key, descriptor.label.clone(), value))
}

/// Prefill the draft of a reopened editor from its applied value.
pub(crate) fn seed_draft(active: &ActiveFilter, drafts: &mut FilterState) {
    if drafts.has_draft(&active.key) {
        return;
    }
    match &active.value {
        FilterValue::Text(text) => drafts.update_value(&active.key, text.clone()),
        FilterValue::Number(n) => drafts.update_value(&active.key, n.to_string()),
        FilterValue::Range { min, max } => drafts.update_range(&active.key, *min, *max),
        _ => {}
    }
}

fn parse_number(text: &str, min: Option<f64>, max: Option<f64>) -> Option<f64> {
    let n: f64 = text.trim().parse().ok()?;
    let in_bounds = min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max);
    (n.is_finite() && in_bounds).then_some(n)
}
