#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tabula::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub age: i64,
    pub career: String,
    pub enrolled: NaiveDate,
    pub active: bool,
}

impl Record for Student {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "age" => self.age.into(),
            "career" => self.career.as_str().into(),
            "enrolled" => self.enrolled.into(),
            "active" => self.active.into(),
            _ => Value::Null,
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn student(id: u32, name: &str, age: i64, career: &str) -> Student {
    Student {
        id,
        name: name.to_string(),
        age,
        career: career.to_string(),
        enrolled: date(2024, 3, (id % 28) + 1),
        active: id % 2 == 1,
    }
}

/// Five students used by most tests.
pub fn roster() -> Vec<Student> {
    vec![
        student(1, "Ana", 19, "eng"),
        student(2, "Bruno", 25, "law"),
        student(3, "Carla", 31, "eng"),
        student(4, "Diego", 22, "med"),
        student(5, "Elena", 28, "law"),
    ]
}

/// `n` students with ids `1..=n`.
pub fn many(n: u32) -> Vec<Student> {
    (1..=n)
        .map(|i| student(i, &format!("Student {:02}", i), 18 + i as i64, "eng"))
        .collect()
}

pub fn columns() -> Vec<Column<Student>> {
    vec![
        Column::new("name", "Name"),
        Column::new("age", "Age"),
        Column::new("career", "Career").cell(|s: &Student| {
            Node::text(match s.career.as_str() {
                "eng" => "Engineering",
                "law" => "Law",
                "med" => "Medicine",
                other => other,
            })
        }),
        Column::new("enrolled", "Enrolled").sortable(false),
    ]
}

pub fn descriptors() -> Vec<FilterDescriptor> {
    vec![
        FilterDescriptor::text("name", "Name"),
        FilterDescriptor::range("age", "Age", Some(0.0), Some(120.0)),
        FilterDescriptor::select(
            "career",
            "Career",
            [
                SelectOption::new("eng", "Engineering"),
                SelectOption::new("law", "Law"),
                SelectOption::new("med", "Medicine"),
            ],
        ),
        FilterDescriptor::number("id", "Id"),
        FilterDescriptor::date("enrolled", "Enrolled"),
        FilterDescriptor::boolean("active", "Active"),
    ]
}

/// A table wired to recording callbacks, the way a caller would wire it.
pub struct Harness {
    pub table: DataTable<Student>,
    pub data: State<Vec<Student>>,
    pub filters: State<Vec<ActiveFilter>>,
    pub search: State<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<Student>>>,
    pub edited: Arc<Mutex<Vec<Student>>>,
    pub deleted: Arc<Mutex<Vec<Vec<Student>>>>,
    pub create_slot: Arc<Mutex<Option<Completion<Student>>>>,
    pub edit_slot: Arc<Mutex<Option<Completion<Student>>>>,
    pub delete_slot: Arc<Mutex<Option<Completion<()>>>>,
}

impl Harness {
    pub fn new(data: Vec<Student>) -> Self {
        Self::with(data, |props| props)
    }

    pub fn with(
        data: Vec<Student>,
        configure: impl FnOnce(TableProps<Student>) -> TableProps<Student>,
    ) -> Self {
        let data = State::new(data);
        let filters: State<Vec<ActiveFilter>> = State::default();
        let search: State<String> = State::default();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let created = Arc::new(Mutex::new(Vec::new()));
        let edited = Arc::new(Mutex::new(Vec::new()));
        let deleted = Arc::new(Mutex::new(Vec::new()));
        let create_slot = Arc::new(Mutex::new(None));
        let edit_slot = Arc::new(Mutex::new(None));
        let delete_slot = Arc::new(Mutex::new(None));

        let contents = ModalContents::<Student>::new()
            .create({
                let slot = Arc::clone(&create_slot);
                move |done| {
                    *slot.lock().unwrap() = Some(done);
                    Node::text("create form")
                }
            })
            .edit({
                let slot = Arc::clone(&edit_slot);
                move |record: &Student, done| {
                    *slot.lock().unwrap() = Some(done);
                    Node::text(format!("edit {}", record.name))
                }
            })
            .delete({
                let slot = Arc::clone(&delete_slot);
                move |records: &[Student], done| {
                    *slot.lock().unwrap() = Some(done);
                    Node::text(format!("delete {} records", records.len()))
                }
            });

        let handlers = TableHandlers::<Student>::new(
            {
                let filters = filters.clone();
                let calls = Arc::clone(&calls);
                move |next: Vec<ActiveFilter>| {
                    calls.lock().unwrap().push(format!("filters:{}", next.len()));
                    filters.set(next);
                }
            },
            {
                let search = search.clone();
                let calls = Arc::clone(&calls);
                move |next: String| {
                    calls.lock().unwrap().push(format!("search:{}", next));
                    search.set(next);
                }
            },
        )
        .on_apply_filter({
            let calls = Arc::clone(&calls);
            move |filter: ActiveFilter| calls.lock().unwrap().push(format!("apply:{}", filter.key))
        })
        .on_clear_filter({
            let calls = Arc::clone(&calls);
            move |key: String| calls.lock().unwrap().push(format!("clear:{}", key))
        })
        .on_clear_all_filters({
            let calls = Arc::clone(&calls);
            move |()| calls.lock().unwrap().push("clear_all".to_string())
        })
        .on_create_request({
            let created = Arc::clone(&created);
            move |record| created.lock().unwrap().push(record)
        })
        .on_edit_request({
            let edited = Arc::clone(&edited);
            move |record| edited.lock().unwrap().push(record)
        })
        .on_delete_request({
            let deleted = Arc::clone(&deleted);
            move |records| deleted.lock().unwrap().push(records)
        });

        let props = TableProps::new(data.clone(), filters.clone(), search.clone())
            .title("Students")
            .columns(columns())
            .filters(descriptors())
            .modal_contents(contents)
            .page_size(10);

        let table = DataTable::new(configure(props), handlers).unwrap();

        Self {
            table,
            data,
            filters,
            search,
            calls,
            created,
            edited,
            deleted,
            create_slot,
            edit_slot,
            delete_slot,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.table
            .page_records()
            .into_iter()
            .map(|s| s.name)
            .collect()
    }

    pub fn take_create(&self) -> Completion<Student> {
        self.create_slot.lock().unwrap().take().unwrap()
    }

    pub fn take_edit(&self) -> Completion<Student> {
        self.edit_slot.lock().unwrap().take().unwrap()
    }

    pub fn take_delete(&self) -> Completion<()> {
        self.delete_slot.lock().unwrap().take().unwrap()
    }
}
