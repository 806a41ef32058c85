//! Storage layer for casebook
//!
//! This crate maps test cases onto a directory of JSON files:
//! - FsRepository: load, save, delete and create case files
//! - layout: folder operations, renames and checked moves
//! - AttachmentStore: per-folder `_attachment` directory handling
//! - FolderNode: tree view of a case directory
//! - io: atomic writes and indented JSON output

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attachments;
pub mod io;
pub mod layout;
pub mod repository;
pub mod tree;

pub use attachments::{AttachmentInfo, AttachmentStore};
pub use layout::{
    check_move, create_folder, delete_folder, is_subpath, move_entry, rename_case_file,
    rename_folder, validate_name, MoveRejected,
};
pub use repository::{
    CaseFile, FsRepository, LoadFailure, LoadReport, TestCaseRepository, DEFAULT_ATTACHMENT_DIR,
    DEFAULT_INDENT,
};
pub use tree::{CaseEntry, FolderNode};
