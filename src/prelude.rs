//! Convenient imports for casebook.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use casebook::prelude::*;
//!
//! let book = Casebook::open("./cases")?;
//! let stats = book.statistics()?;
//! ```

// Main entry point
pub use crate::casebook::{Casebook, CasebookBuilder};
pub use crate::config::Config;

// Error handling
pub use crate::error::{Error, Result};

// Model
pub use crate::types::{CaseStatus, StepStatus, TestCase, TestCaseStep, Timestamp};

// Files and layout
pub use crate::types::{CaseFile, FolderNode, Item, MoveOutcome, MoveRejected};

// Queries
pub use crate::types::{CaseFilter, Field, Statistics};
