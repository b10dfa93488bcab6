//! Entity forms shown inside the create and edit modals.

use std::marker::PhantomData;

use chrono::NaiveDate;
use tabula::{Node, Value};
use thiserror::Error;

use crate::models::{Entity, FieldKind, FieldSpec, Fields, Id};

// =============================================================================
// Validation results
// =============================================================================

/// Information about a single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name.
    pub field_name: String,
    /// Id of the input node (for focusing).
    pub widget_id: String,
    /// Error message.
    pub message: String,
}

/// Result of validating a form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// All fields passed validation.
    #[default]
    Valid,
    /// One or more fields failed validation.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid => &[],
            Self::Invalid(errors) => errors,
        }
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Get the widget ID of the first invalid field (for focusing).
    pub fn first_invalid_widget(&self) -> Option<&str> {
        self.first_error().map(|e| e.widget_id.as_str())
    }

    /// Error message for one field.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field_name == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Id of the input node of a field.
pub fn widget_id(field: &str) -> String {
    format!("field-{}", field)
}

// =============================================================================
// Field parsing
// =============================================================================

const YES: &[&str] = &["yes", "y", "true", "si", "sí"];
const NO: &[&str] = &["no", "n", "false"];

/// Parse one raw input. Blank optional fields yield `None`.
fn parse_field(spec: &FieldSpec, raw: &str) -> Result<Option<Value>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return match (spec.required, spec.kind) {
            (_, FieldKind::Flag) => Ok(Some(Value::Bool(false))),
            (true, _) => Err(format!("{} is required", spec.label)),
            (false, _) => Ok(None),
        };
    }

    let value = match spec.kind {
        FieldKind::Text => Value::from(raw),
        FieldKind::Email => {
            if !email_address::EmailAddress::is_valid(raw) {
                return Err("Invalid e-mail address".to_string());
            }
            Value::from(raw)
        }
        FieldKind::Integer { min, max } => {
            let n: i64 = raw
                .parse()
                .map_err(|_| format!("{} must be a whole number", spec.label))?;
            if n < min || n > max {
                return Err(if max == i64::MAX {
                    format!("{} must be at least {}", spec.label, min)
                } else {
                    format!("{} must be between {} and {}", spec.label, min, max)
                });
            }
            Value::Int(n)
        }
        FieldKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", spec.label))?,
        FieldKind::Choice(choices) => {
            let lower = raw.to_lowercase();
            let Some((value, _)) = choices
                .iter()
                .find(|(v, l)| v.to_lowercase() == lower || l.to_lowercase() == lower)
            else {
                let names: Vec<&str> = choices.iter().map(|(v, _)| *v).collect();
                return Err(format!("{} must be one of: {}", spec.label, names.join(", ")));
            };
            Value::from(*value)
        }
        FieldKind::Flag => {
            let lower = raw.to_lowercase();
            if YES.contains(&lower.as_str()) {
                Value::Bool(true)
            } else if NO.contains(&lower.as_str()) {
                Value::Bool(false)
            } else {
                return Err(format!("{} must be yes or no", spec.label));
            }
        }
    };
    Ok(Some(value))
}

/// Form text of a stored value.
fn raw_value(spec: &FieldSpec, value: &Value) -> String {
    match (spec.kind, value) {
        (FieldKind::Flag, Value::Bool(true)) => "yes".to_string(),
        (FieldKind::Flag, _) => "no".to_string(),
        _ => value.to_string(),
    }
}

fn hint(spec: &FieldSpec) -> String {
    match spec.kind {
        FieldKind::Text => String::new(),
        FieldKind::Email => "name@campus.edu".to_string(),
        FieldKind::Integer { min, max } if max == i64::MAX => format!(">= {}", min),
        FieldKind::Integer { min, max } => format!("{}-{}", min, max),
        FieldKind::Date => "YYYY-MM-DD".to_string(),
        FieldKind::Choice(choices) => {
            let names: Vec<&str> = choices.iter().map(|(v, _)| *v).collect();
            names.join(" | ")
        }
        FieldKind::Flag => "yes | no".to_string(),
    }
}

// =============================================================================
// Form
// =============================================================================

/// A create or edit form for one entity type.
#[derive(Debug, Clone)]
pub struct Form<E> {
    /// Id of the record being edited; `None` when creating.
    id: Option<Id>,
    values: Vec<String>,
    result: ValidationResult,
    /// Form-level message, e.g. a backend rejection.
    notice: Option<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Form<E> {
    /// Empty form for a new record.
    pub fn create() -> Self {
        Self {
            id: None,
            values: E::fields().iter().map(|_| String::new()).collect(),
            result: ValidationResult::Valid,
            notice: None,
            _entity: PhantomData,
        }
    }

    /// Form prefilled with an existing record.
    pub fn edit(record: &E) -> Self {
        Self {
            id: Some(record.key()),
            values: E::fields()
                .iter()
                .map(|spec| raw_value(spec, &record.field(spec.name)))
                .collect(),
            result: ValidationResult::Valid,
            notice: None,
            _entity: PhantomData,
        }
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    fn position(&self, field: &str) -> Option<usize> {
        E::fields().iter().position(|spec| spec.name == field)
    }

    /// Current raw input of a field.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.position(field).map(|i| self.values[i].as_str())
    }

    /// Replace the raw input of a field. Clears that field's error.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        let Some(index) = self.position(field) else {
            return Err(FormError::UnknownField(field.to_string()));
        };
        self.values[index] = value.into();
        if let ValidationResult::Invalid(errors) = &mut self.result {
            errors.retain(|e| e.field_name != field);
            if errors.is_empty() {
                self.result = ValidationResult::Valid;
            }
        }
        Ok(())
    }

    /// Errors of the last [`record`](Self::record) call.
    pub fn validation(&self) -> &ValidationResult {
        &self.result
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Check every field and collect the parsed values.
    pub fn validate(&self) -> Result<Fields, ValidationResult> {
        let mut fields = Fields::new();
        let mut errors = Vec::new();

        for (spec, raw) in E::fields().iter().zip(&self.values) {
            match parse_field(spec, raw) {
                Ok(Some(value)) => fields.insert(spec.name, value),
                Ok(None) => {}
                Err(message) => errors.push(FieldError {
                    field_name: spec.name.to_string(),
                    widget_id: widget_id(spec.name),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationResult::Invalid(errors))
        }
    }

    /// Validate and build the record, remembering any errors for display.
    pub fn record(&mut self) -> Option<E> {
        self.notice = None;
        match self.validate() {
            Ok(fields) => {
                self.result = ValidationResult::Valid;
                Some(E::build(self.id.unwrap_or_default(), &fields))
            }
            Err(result) => {
                self.result = result;
                None
            }
        }
    }

    /// Modal body for this form.
    pub fn view(&self) -> Node {
        let rows = E::fields().iter().zip(&self.values).map(|(spec, raw)| {
            let label = if spec.required {
                format!("{} *", spec.label)
            } else {
                spec.label.to_string()
            };
            let mut row = Node::row()
                .child(Node::text(label))
                .child(Node::input(raw.as_str(), hint(spec)).id(widget_id(spec.name)));
            if let Some(message) = self.result.error_for(spec.name) {
                row = row.child(Node::text(format!("! {}", message)));
            }
            row
        });

        let mut body = Node::col().id(format!("{}-form", E::NAME)).children(rows);
        if let Some(notice) = &self.notice {
            body = body.child(Node::text(format!("! {}", notice)).id("notice"));
        }
        body.child(
            Node::row()
                .child(Node::button("Save", true).id("submit"))
                .child(Node::button("Cancel", true).id("cancel")),
        )
    }
}

/// Modal body confirming the deletion of `records`.
pub fn delete_view<E: Entity>(records: &[E], notice: Option<&str>) -> Node {
    let question = match records {
        [one] => format!("Delete {}?", one.display_name()),
        many => format!("Delete {} {}?", many.len(), E::NAME),
    };
    let mut body = Node::col()
        .id(format!("{}-delete", E::NAME))
        .child(Node::text(question));
    if records.len() > 1 {
        body = body.children(
            records
                .iter()
                .map(|r| Node::text(format!("- {}", r.display_name()))),
        );
    }
    if let Some(notice) = notice {
        body = body.child(Node::text(format!("! {}", notice)).id("notice"));
    }
    body.child(
        Node::row()
            .child(Node::button("Delete", true).id("submit"))
            .child(Node::button("Cancel", true).id("cancel")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Degree, Staff};
    use tabula::node::Content;

    #[test]
    fn test_empty_form_reports_required_fields() {
        let mut form = Form::<Staff>::create();

        assert!(form.record().is_none());
        let result = form.validation();
        let fields: Vec<&str> = result
            .errors()
            .iter()
            .map(|e| e.field_name.as_str())
            .collect();
        assert_eq!(fields, vec!["name", "email", "position", "school_id", "hired"]);
        assert_eq!(result.first_invalid_widget(), Some("field-name"));
        assert_eq!(result.error_for("name"), Some("Full name is required"));
    }

    #[test]
    fn test_field_rules() {
        let mut form = Form::<Staff>::create();
        form.set("name", "Ana Ruiz").unwrap();
        form.set("email", "not-an-address").unwrap();
        form.set("position", "Dean").unwrap();
        form.set("school_id", "0").unwrap();
        form.set("hired", "01/09/2021").unwrap();

        assert!(form.record().is_none());
        let result = form.validation();
        assert_eq!(result.error_for("email"), Some("Invalid e-mail address"));
        assert_eq!(
            result.error_for("position"),
            Some("Position must be one of: professor, lecturer, assistant, administrative")
        );
        assert_eq!(result.error_for("school_id"), Some("School must be at least 1"));
        assert_eq!(
            result.error_for("hired"),
            Some("Hired on must be a date (YYYY-MM-DD)")
        );
        assert_eq!(result.error_for("name"), None);
    }

    #[test]
    fn test_valid_form_builds_record() {
        let mut form = Form::<Degree>::create();
        form.set("name", " Civil Engineering ").unwrap();
        form.set("code", "icv").unwrap();
        form.set("school_id", "1").unwrap();
        form.set("level", "Master").unwrap();
        form.set("credits", "120").unwrap();

        let degree = form.record().unwrap();

        assert_eq!(degree.name, "Civil Engineering");
        assert_eq!(degree.code, "ICV");
        assert_eq!(degree.level, "master");
        assert_eq!(degree.credits, 120);
        assert!(!degree.active);
        assert!(form.validation().is_valid());
    }

    #[test]
    fn test_edit_prefills_and_keeps_id() {
        let degree = Degree {
            id: 4,
            name: "Law".to_string(),
            code: "LAW".to_string(),
            school_id: 2,
            level: "bachelor".to_string(),
            credits: 240,
            active: true,
        };

        let mut form = Form::edit(&degree);
        assert_eq!(form.id(), Some(4));
        assert_eq!(form.value("credits"), Some("240"));
        assert_eq!(form.value("active"), Some("yes"));

        form.set("credits", "300").unwrap();
        let updated = form.record().unwrap();
        assert_eq!(updated.id, 4);
        assert_eq!(updated.credits, 300);
        assert!(updated.active);
    }

    #[test]
    fn test_setting_a_field_clears_its_error() {
        let mut form = Form::<Degree>::create();
        form.record();
        assert!(form.validation().error_for("name").is_some());

        form.set("name", "Medicine").unwrap();

        assert!(form.validation().error_for("name").is_none());
        assert!(form.validation().error_for("code").is_some());
        assert_eq!(
            form.set("colour", "red"),
            Err(FormError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_view_shows_inputs_and_errors() {
        let mut form = Form::<Degree>::create();
        form.set("credits", "lots").unwrap();
        form.record();
        form.set_notice("degrees: 'icv' already exists");

        let view = form.view();

        let credits = view.find("field-credits").unwrap();
        assert_eq!(
            credits.content,
            Content::Input {
                value: "lots".to_string(),
                placeholder: "1-400".to_string()
            }
        );
        let text = view.plain_text();
        assert!(text.contains("Name *"));
        assert!(text.contains("! Credits must be a whole number"));
        assert!(view.find("notice").is_some());
        assert!(view.find("submit").is_some());
    }
}
