//! Chip text for committed filters.

use crate::labels::Labels;

use super::{ActiveFilter, FilterDescriptor, FilterValue};

/// Text shown on an active filter's chip.
///
/// Ranges render as `≥min - ≤max` with open bounds left out, select values
/// resolve to their option label, booleans use the localized yes/no, and
/// everything else shows its raw value.
pub fn format_chip(
    filter: &ActiveFilter,
    descriptor: Option<&FilterDescriptor>,
    labels: &Labels,
) -> String {
    match &filter.value {
        FilterValue::Range { min, max } => {
            let parts: Vec<String> = [
                min.map(|min| format!("≥{}", min)),
                max.map(|max| format!("≤{}", max)),
            ]
            .into_iter()
            .flatten()
            .collect();
            parts.join(" - ")
        }
        FilterValue::Select(value) => descriptor
            .and_then(|d| d.option_label(value))
            .unwrap_or(value.as_str())
            .to_string(),
        FilterValue::Boolean(true) => labels.yes.clone(),
        FilterValue::Boolean(false) => labels.no.clone(),
        FilterValue::Text(text) => text.clone(),
        FilterValue::Number(n) => n.to_string(),
        FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
    }
}
