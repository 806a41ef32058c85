//! Facade Test Suite
//!
//! Exercises the `Casebook` handle end to end on temporary directories:
//! case lifecycle, folder layout, attachments, Azure DevOps import and
//! configuration.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test facade
//!
//! # Layout tests only
//! cargo test --test facade layout::
//! ```

use std::fs;
use std::path::Path;

use casebook::prelude::*;
use tempfile::TempDir;

pub mod attachments;
pub mod cases;
pub mod config;
pub mod import;
pub mod layout;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Open a casebook on a fresh temporary directory
pub fn open_temp() -> (TempDir, Casebook) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let book = Casebook::open(dir.path()).expect("Failed to open casebook");
    (dir, book)
}

/// Create and save a named case with the given step names
pub fn add_case(book: &Casebook, folder: Option<&str>, name: &str, steps: &[&str]) -> CaseFile {
    let mut file = book.create_new(folder).expect("create case");
    file.case.set_field("name", name).expect("set name");
    for step in steps {
        file.case.add_step(TestCaseStep::new(*step));
    }
    book.save(&mut file).expect("save case");
    file
}

/// Write a small file to attach
pub fn write_source(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"payload").expect("write source file");
    path
}
