//! # Casebook
//!
//! A directory of JSON test cases, with the operations a test-case editor
//! needs: create, save, duplicate, move, rename, attachments, filtering,
//! statistics and import of Azure DevOps exports.
//!
//! ## Quick Start
//!
//! ```ignore
//! use casebook::prelude::*;
//!
//! // Open (or create) a case directory
//! let book = Casebook::open("./cases")?;
//!
//! // Create a case and fill it in
//! let mut file = book.create_new(None::<&str>)?;
//! file.case.set_field("name", "Login works")?;
//! file.case.add_step(TestCaseStep::new("Open the login page"));
//! book.save(&mut file)?;
//!
//! // Reorganise
//! let folder = book.create_folder("", "auth")?;
//! book.move_item(&file.path, &folder)?;
//!
//! // Report
//! let stats = book.statistics()?;
//! ```
//!
//! ## Layers
//!
//! - `casebook-core`: the [`TestCase`] model and its JSON mapping
//! - `casebook-storage`: the folder-of-JSON repository, layout operations,
//!   attachments and the folder tree
//! - `casebook-engine`: the [`TestCaseService`], filters, statistics,
//!   rendering and the Azure DevOps importer
//!
//! [`Casebook`] ties them together behind one handle rooted at a directory.

#![warn(missing_docs)]

mod casebook;
mod config;
mod error;
mod types;

pub mod prelude;

// Re-export main entry points
pub use casebook::{Casebook, CasebookBuilder};
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{Error, Result};

// Re-export types
pub use types::*;
