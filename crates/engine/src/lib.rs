//! Service layer for casebook
//!
//! Builds the operations a front end calls on top of the storage crate:
//! - TestCaseService: save validation, duplicate, checked moves, batch
//!   move/delete, attachments and import
//! - azure: Azure DevOps export parsing and conversion
//! - Statistics: outcome counts over a set of cases
//! - CaseFilter: attribute and text based selection
//! - render: text summary and pytest skeleton of a case

#![warn(clippy::all)]

pub mod azure;
pub mod filter;
pub mod render;
pub mod service;
pub mod stats;

pub use azure::ImportReport;
pub use filter::{distinct_values, CaseFilter, Field};
pub use render::{case_summary, pytest_skeleton};
pub use service::{
    ensure_step, BulkReport, ImportOptions, Item, MoveOutcome, TestCaseService, COPY_PREFIX,
    DEFAULT_IMPORT_FOLDER, DEFAULT_MAX_FILENAME_LEN,
};
pub use stats::Statistics;
