//! Demo records loaded into an empty store.

use chrono::NaiveDate;

use crate::backend::{BackendError, Store};
use crate::models::{Degree, Dependency, School, Staff, Subject};
use crate::session::{Role, Session};

const SCHOOLS: &[(&str, &str, &str)] = &[
    ("ENG", "School of Engineering", "Dr. Laura Méndez"),
    ("LAW", "School of Law", "Dr. Tomás Ibarra"),
    ("MED", "School of Medicine", "Dr. Sofía Paredes"),
    ("SCI", "School of Sciences", "Dr. Andrés Quiroga"),
    ("HUM", "School of Humanities", ""),
];

/// `(code, name, school, level, credits, active)`
const DEGREES: &[(&str, &str, u64, &str, i64, bool)] = &[
    ("ICV", "Civil Engineering", 1, "bachelor", 240, true),
    ("IIN", "Computer Engineering", 1, "bachelor", 240, true),
    ("MIS", "Software Systems", 1, "master", 90, true),
    ("DER", "Law", 2, "bachelor", 300, true),
    ("DPE", "Criminal Law", 2, "master", 60, false),
    ("MED", "Medicine", 3, "bachelor", 360, true),
    ("BIO", "Biology", 4, "bachelor", 240, true),
    ("PHD", "Physics", 4, "doctorate", 180, true),
    ("HIS", "History", 5, "bachelor", 240, true),
];

/// `(code, name, degree, semester, credits)`
const SUBJECTS: &[(&str, &str, u64, i64, i64)] = &[
    ("MAT101", "Calculus I", 1, 1, 8),
    ("MAT102", "Calculus II", 1, 2, 8),
    ("EST201", "Structural Analysis", 1, 4, 6),
    ("PRG101", "Programming I", 2, 1, 6),
    ("PRG102", "Programming II", 2, 2, 6),
    ("BDD301", "Databases", 2, 5, 6),
    ("ARQ501", "Software Architecture", 3, 1, 9),
    ("CIV101", "Civil Law I", 4, 1, 6),
    ("CON201", "Constitutional Law", 4, 3, 6),
    ("ANA101", "Anatomy", 6, 1, 10),
    ("FIS101", "Physiology", 6, 2, 10),
    ("GEN201", "Genetics", 7, 3, 6),
    ("QFT801", "Quantum Field Theory", 8, 1, 12),
    ("HAM101", "History of the Americas", 9, 1, 6),
];

/// `(name, email, position, school, hired)`
const STAFF: &[(&str, &str, &str, u64, (i32, u32, u32))] = &[
    ("Laura Méndez", "lmendez@campus.edu", "professor", 1, (2009, 3, 1)),
    ("Diego Salas", "dsalas@campus.edu", "lecturer", 1, (2018, 8, 15)),
    ("Valentina Ríos", "vrios@campus.edu", "assistant", 1, (2023, 3, 1)),
    ("Tomás Ibarra", "tibarra@campus.edu", "professor", 2, (2005, 3, 1)),
    ("Camila Duarte", "cduarte@campus.edu", "lecturer", 2, (2016, 8, 1)),
    ("Sofía Paredes", "sparedes@campus.edu", "professor", 3, (2011, 3, 1)),
    ("Martín Olivares", "molivares@campus.edu", "assistant", 3, (2022, 8, 1)),
    ("Andrés Quiroga", "aquiroga@campus.edu", "professor", 4, (2008, 3, 1)),
    ("Paula Herrera", "pherrera@campus.edu", "administrative", 4, (2019, 1, 7)),
    ("Julián Vega", "jvega@campus.edu", "lecturer", 5, (2020, 3, 1)),
    ("Renata Castro", "rcastro@campus.edu", "administrative", 5, (2021, 9, 1)),
];

/// `(name, building, phone, email)`
const DEPENDENCIES: &[(&str, &str, &str, &str)] = &[
    ("Central Library", "Building A", "+56 2 2345 1000", "library@campus.edu"),
    ("Registrar's Office", "Building B", "+56 2 2345 1100", "registrar@campus.edu"),
    ("Student Affairs", "Building B", "+56 2 2345 1200", "students@campus.edu"),
    ("IT Services", "Building C", "+56 2 2345 1300", "it@campus.edu"),
    ("Sports Center", "Gym", "", ""),
];

/// Fill every collection with demo records.
pub async fn seed(store: &Store) -> Result<(), BackendError> {
    let admin = Session::new("seed", Role::Admin);

    for (code, name, dean) in SCHOOLS {
        let record = School {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            dean: dean.to_string(),
            email: format!("{}@campus.edu", code.to_lowercase()),
        };
        store.schools.create(&admin, record).await?;
    }

    for (code, name, school_id, level, credits, active) in DEGREES {
        let record = Degree {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            school_id: *school_id,
            level: level.to_string(),
            credits: *credits,
            active: *active,
        };
        store.degrees.create(&admin, record).await?;
    }

    for (code, name, degree_id, semester, credits) in SUBJECTS {
        let record = Subject {
            id: 0,
            name: name.to_string(),
            code: code.to_string(),
            degree_id: *degree_id,
            semester: *semester,
            credits: *credits,
        };
        store.subjects.create(&admin, record).await?;
    }

    for (name, email, position, school_id, (y, m, d)) in STAFF {
        let hired = NaiveDate::from_ymd_opt(*y, *m, *d)
            .ok_or_else(|| BackendError::Invalid(format!("bad hire date for {}", name)))?;
        let record = Staff {
            id: 0,
            name: name.to_string(),
            email: email.to_string(),
            position: position.to_string(),
            school_id: *school_id,
            hired,
        };
        store.staff.create(&admin, record).await?;
    }

    for (name, building, phone, email) in DEPENDENCIES {
        let record = Dependency {
            id: 0,
            name: name.to_string(),
            building: building.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        };
        store.dependencies.create(&admin, record).await?;
    }

    log::info!(
        "seeded {} schools, {} degrees, {} subjects, {} staff, {} dependencies",
        SCHOOLS.len(),
        DEGREES.len(),
        SUBJECTS.len(),
        STAFF.len(),
        DEPENDENCIES.len()
    );
    Ok(())
}
