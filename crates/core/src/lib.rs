//! Core types for casebook
//!
//! This crate defines the in-memory model shared by every layer:
//! - [`TestCase`] / [`TestCaseStep`]: records and their JSON mapping
//! - [`CaseOutcome`]: verdict derived from step statuses
//! - [`Timestamp`]: millisecond timestamps with lenient parsing
//! - field editing by on-disk key ([`TestCase::set_field`])
//! - [`Error`]: the error type used by storage and engine

pub mod edit;
pub mod error;
mod lenient;
pub mod model;
pub mod outcome;
pub mod types;

pub use edit::{CASE_FIELDS, STEP_FIELDS};
pub use error::{Error, Result};
pub use lenient::{join_list, split_list};
pub use model::{
    CaseStatus, StepStatus, TestCase, TestCaseStep, NEW_CASE_NAME, UNTITLED_CASE_NAME,
};
pub use outcome::CaseOutcome;
pub use types::{new_id, short_token, Timestamp};
