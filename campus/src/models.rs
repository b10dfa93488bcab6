//! Portal records shown in the admin screens.

use std::collections::HashMap;
use std::fmt::Debug;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabula::prelude::*;

/// Record identifier assigned by the backend.
pub type Id = u64;

// =============================================================================
// Field metadata
// =============================================================================

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    /// Whole number within inclusive bounds.
    Integer { min: i64, max: i64 },
    /// `YYYY-MM-DD`.
    Date,
    /// One of `(value, label)`.
    Choice(&'static [(&'static str, &'static str)]),
    /// `yes`/`no`.
    Flag,
}

/// One editable field of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Parsed form values, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(HashMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).map(Value::to_string).unwrap_or_default()
    }

    pub fn int(&self, name: &str) -> i64 {
        match self.get(name) {
            Some(Value::Int(v)) => *v,
            _ => 0,
        }
    }

    pub fn id(&self, name: &str) -> Id {
        Id::try_from(self.int(name)).unwrap_or_default()
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(Value::as_date)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// A record type managed through an admin screen.
pub trait Entity: Record<Key = Id> + Debug + PartialEq {
    /// Collection name; also names the screen and its saved filters.
    const NAME: &'static str;
    /// Screen title.
    const TITLE: &'static str;

    /// Editable fields, in form order.
    fn fields() -> &'static [FieldSpec];

    fn columns() -> Vec<Column<Self>>;

    fn filters() -> Vec<FilterDescriptor>;

    /// Build a record from validated form values.
    fn build(id: Id, fields: &Fields) -> Self;

    /// The same record under another id.
    fn with_id(self, id: Id) -> Self;

    /// Value no two records of the collection may share, compared
    /// case-insensitively.
    fn unique_key(&self) -> String;

    /// Short human name, used in confirmations.
    fn display_name(&self) -> String;
}

fn id_value(id: Id) -> Value {
    i64::try_from(id).map(Value::Int).unwrap_or(Value::Null)
}

fn choice_label(choices: &[(&str, &str)], value: &str) -> String {
    choices
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn choice_options(choices: &[(&str, &str)]) -> Vec<SelectOption> {
    choices
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect()
}

fn yes_no(value: bool) -> Node {
    Node::text(if value { "Yes" } else { "No" })
}

// =============================================================================
// School
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub id: Id,
    pub name: String,
    pub code: String,
    pub dean: String,
    pub email: String,
}

const SCHOOL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("code", "Code", FieldKind::Text),
    FieldSpec::optional("dean", "Dean", FieldKind::Text),
    FieldSpec::required("email", "E-mail", FieldKind::Email),
];

impl Record for School {
    type Key = Id;

    fn key(&self) -> Id {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => id_value(self.id),
            "name" => self.name.as_str().into(),
            "code" => self.code.as_str().into(),
            "dean" => self.dean.as_str().into(),
            "email" => self.email.as_str().into(),
            _ => Value::Null,
        }
    }
}

impl Entity for School {
    const NAME: &'static str = "schools";
    const TITLE: &'static str = "Schools";

    fn fields() -> &'static [FieldSpec] {
        SCHOOL_FIELDS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("code", "Code"),
            Column::new("name", "Name"),
            Column::new("dean", "Dean"),
            Column::new("email", "E-mail").sortable(false),
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name").placeholder("Part of the name"),
            FilterDescriptor::text("code", "Code"),
            FilterDescriptor::text("dean", "Dean"),
        ]
    }

    fn build(id: Id, fields: &Fields) -> Self {
        Self {
            id,
            name: fields.text("name"),
            code: fields.text("code").to_uppercase(),
            dean: fields.text("dean"),
            email: fields.text("email"),
        }
    }

    fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }

    fn unique_key(&self) -> String {
        self.code.to_lowercase()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// Degree
// =============================================================================

pub const DEGREE_LEVELS: &[(&str, &str)] = &[
    ("bachelor", "Bachelor"),
    ("master", "Master"),
    ("doctorate", "Doctorate"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Degree {
    pub id: Id,
    pub name: String,
    pub code: String,
    pub school_id: Id,
    pub level: String,
    pub credits: i64,
    pub active: bool,
}

const DEGREE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("code", "Code", FieldKind::Text),
    FieldSpec::required(
        "school_id",
        "School",
        FieldKind::Integer { min: 1, max: i64::MAX },
    ),
    FieldSpec::required("level", "Level", FieldKind::Choice(DEGREE_LEVELS)),
    FieldSpec::required("credits", "Credits", FieldKind::Integer { min: 1, max: 400 }),
    FieldSpec::optional("active", "Active", FieldKind::Flag),
];

impl Record for Degree {
    type Key = Id;

    fn key(&self) -> Id {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => id_value(self.id),
            "name" => self.name.as_str().into(),
            "code" => self.code.as_str().into(),
            "school_id" => id_value(self.school_id),
            "level" => self.level.as_str().into(),
            "credits" => self.credits.into(),
            "active" => self.active.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Degree {
    const NAME: &'static str = "degrees";
    const TITLE: &'static str = "Degrees";

    fn fields() -> &'static [FieldSpec] {
        DEGREE_FIELDS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("code", "Code"),
            Column::new("name", "Name"),
            Column::new("level", "Level")
                .cell(|d: &Degree| Node::text(choice_label(DEGREE_LEVELS, &d.level))),
            Column::new("credits", "Credits"),
            Column::new("school_id", "School"),
            Column::new("active", "Active").cell(|d: &Degree| yes_no(d.active)),
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::select("level", "Level", choice_options(DEGREE_LEVELS)),
            FilterDescriptor::range("credits", "Credits", Some(0.0), Some(400.0)),
            FilterDescriptor::number("school_id", "School"),
            FilterDescriptor::boolean("active", "Active"),
        ]
    }

    fn build(id: Id, fields: &Fields) -> Self {
        Self {
            id,
            name: fields.text("name"),
            code: fields.text("code").to_uppercase(),
            school_id: fields.id("school_id"),
            level: fields.text("level"),
            credits: fields.int("credits"),
            active: fields.flag("active"),
        }
    }

    fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }

    fn unique_key(&self) -> String {
        self.code.to_lowercase()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// Subject
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Id,
    pub name: String,
    pub code: String,
    pub degree_id: Id,
    pub semester: i64,
    pub credits: i64,
}

const SUBJECT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("code", "Code", FieldKind::Text),
    FieldSpec::required(
        "degree_id",
        "Degree",
        FieldKind::Integer { min: 1, max: i64::MAX },
    ),
    FieldSpec::required("semester", "Semester", FieldKind::Integer { min: 1, max: 12 }),
    FieldSpec::required("credits", "Credits", FieldKind::Integer { min: 1, max: 30 }),
];

impl Record for Subject {
    type Key = Id;

    fn key(&self) -> Id {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => id_value(self.id),
            "name" => self.name.as_str().into(),
            "code" => self.code.as_str().into(),
            "degree_id" => id_value(self.degree_id),
            "semester" => self.semester.into(),
            "credits" => self.credits.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Subject {
    const NAME: &'static str = "subjects";
    const TITLE: &'static str = "Subjects";

    fn fields() -> &'static [FieldSpec] {
        SUBJECT_FIELDS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("code", "Code"),
            Column::new("name", "Name"),
            Column::new("semester", "Semester"),
            Column::new("credits", "Credits"),
            Column::new("degree_id", "Degree"),
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::new(
                "semester",
                "Semester",
                FilterKind::Number {
                    min: Some(1.0),
                    max: Some(12.0),
                    placeholder: Some("1-12".to_string()),
                },
            ),
            FilterDescriptor::range("credits", "Credits", Some(1.0), Some(30.0)),
            FilterDescriptor::number("degree_id", "Degree"),
        ]
    }

    fn build(id: Id, fields: &Fields) -> Self {
        Self {
            id,
            name: fields.text("name"),
            code: fields.text("code").to_uppercase(),
            degree_id: fields.id("degree_id"),
            semester: fields.int("semester"),
            credits: fields.int("credits"),
        }
    }

    fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }

    fn unique_key(&self) -> String {
        self.code.to_lowercase()
    }

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

// =============================================================================
// Staff
// =============================================================================

pub const STAFF_POSITIONS: &[(&str, &str)] = &[
    ("professor", "Professor"),
    ("lecturer", "Lecturer"),
    ("assistant", "Teaching assistant"),
    ("administrative", "Administrative"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub position: String,
    pub school_id: Id,
    pub hired: NaiveDate,
}

const STAFF_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Full name", FieldKind::Text),
    FieldSpec::required("email", "E-mail", FieldKind::Email),
    FieldSpec::required("position", "Position", FieldKind::Choice(STAFF_POSITIONS)),
    FieldSpec::required(
        "school_id",
        "School",
        FieldKind::Integer { min: 1, max: i64::MAX },
    ),
    FieldSpec::required("hired", "Hired on", FieldKind::Date),
];

impl Record for Staff {
    type Key = Id;

    fn key(&self) -> Id {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => id_value(self.id),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "position" => self.position.as_str().into(),
            "school_id" => id_value(self.school_id),
            "hired" => self.hired.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Staff {
    const NAME: &'static str = "staff";
    const TITLE: &'static str = "Staff";

    fn fields() -> &'static [FieldSpec] {
        STAFF_FIELDS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name"),
            Column::new("email", "E-mail").sortable(false),
            Column::new("position", "Position")
                .cell(|s: &Staff| Node::text(choice_label(STAFF_POSITIONS, &s.position))),
            Column::new("school_id", "School"),
            Column::new("hired", "Hired"),
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::select("position", "Position", choice_options(STAFF_POSITIONS)),
            FilterDescriptor::number("school_id", "School"),
            FilterDescriptor::date("hired", "Hired on"),
        ]
    }

    fn build(id: Id, fields: &Fields) -> Self {
        Self {
            id,
            name: fields.text("name"),
            email: fields.text("email").to_lowercase(),
            position: fields.text("position"),
            school_id: fields.id("school_id"),
            hired: fields.date("hired").unwrap_or_default(),
        }
    }

    fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }

    fn unique_key(&self) -> String {
        self.email.to_lowercase()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

// =============================================================================
// Dependency
// =============================================================================

/// An administrative unit (library, registrar's office...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub id: Id,
    pub name: String,
    pub building: String,
    pub phone: String,
    pub email: String,
}

const DEPENDENCY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Name", FieldKind::Text),
    FieldSpec::required("building", "Building", FieldKind::Text),
    FieldSpec::optional("phone", "Phone", FieldKind::Text),
    FieldSpec::optional("email", "E-mail", FieldKind::Email),
];

impl Record for Dependency {
    type Key = Id;

    fn key(&self) -> Id {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => id_value(self.id),
            "name" => self.name.as_str().into(),
            "building" => self.building.as_str().into(),
            "phone" => self.phone.as_str().into(),
            "email" => self.email.as_str().into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Dependency {
    const NAME: &'static str = "dependencies";
    const TITLE: &'static str = "Dependencies";

    fn fields() -> &'static [FieldSpec] {
        DEPENDENCY_FIELDS
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name"),
            Column::new("building", "Building"),
            Column::new("phone", "Phone").sortable(false),
            Column::new("email", "E-mail").sortable(false),
        ]
    }

    fn filters() -> Vec<FilterDescriptor> {
        vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::text("building", "Building"),
        ]
    }

    fn build(id: Id, fields: &Fields) -> Self {
        Self {
            id,
            name: fields.text("name"),
            building: fields.text("building"),
            phone: fields.text("phone"),
            email: fields.text("email").to_lowercase(),
        }
    }

    fn with_id(self, id: Id) -> Self {
        Self { id, ..self }
    }

    fn unique_key(&self) -> String {
        self.name.to_lowercase()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}
