//! University portal administration.
//!
//! Record collections (schools, degrees, subjects, staff, dependencies)
//! managed through `tabula` data tables, with role-gated create, edit and
//! delete, per-screen filter persistence and a line-oriented console.

pub mod backend;
pub mod config;
pub mod console;
pub mod forms;
pub mod models;
pub mod paths;
pub mod screens;
pub mod seed;
pub mod session;
pub mod settings;
