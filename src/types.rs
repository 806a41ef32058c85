//! Public types for the casebook API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Model
pub use casebook_core::{
    CaseOutcome, CaseStatus, StepStatus, TestCase, TestCaseStep, Timestamp, CASE_FIELDS,
    NEW_CASE_NAME, STEP_FIELDS, UNTITLED_CASE_NAME,
};

// Storage
pub use casebook_storage::{
    AttachmentInfo, CaseEntry, CaseFile, FolderNode, LoadFailure, LoadReport, MoveRejected,
};

// Service results and queries
pub use casebook_engine::{
    BulkReport, CaseFilter, Field, ImportReport, Item, MoveOutcome, Statistics, TestCaseService,
};
