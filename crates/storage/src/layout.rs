//! Folder and file layout operations
//!
//! Creating, renaming and deleting folders, renaming case files and moving
//! entries between folders. Moves are checked up front with [`check_move`]
//! so callers get a typed [`MoveRejected`] reason instead of a half-done
//! filesystem operation.

use crate::io::move_path;
use casebook_core::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Reject names that cannot be a single path component
///
/// Returns the trimmed name.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName("name is empty".to_string()));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidName(format!("'{}' is reserved", trimmed)));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(Error::InvalidName(format!(
            "'{}' contains a path separator",
            trimmed
        )));
    }
    Ok(trimmed)
}

/// Create `parent/name`; an existing folder is returned as-is
pub fn create_folder(parent: &Path, name: &str) -> Result<PathBuf> {
    let name = validate_name(name)?;
    let path = parent.join(name);
    if path.exists() && !path.is_dir() {
        return Err(Error::AlreadyExists(path.display().to_string()));
    }
    fs::create_dir_all(&path).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// Rename a folder in place
pub fn rename_folder(path: &Path, new_name: &str) -> Result<PathBuf> {
    let new_name = validate_name(new_name)?;
    if !path.is_dir() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let target = sibling(path, new_name);
    if target == path {
        return Ok(target);
    }
    if target.exists() {
        return Err(Error::AlreadyExists(target.display().to_string()));
    }
    fs::rename(path, &target).map_err(|e| Error::io(path, e))?;
    info!(from = %path.display(), to = %target.display(), "renamed folder");
    Ok(target)
}

/// Remove a folder and everything in it
pub fn delete_folder(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    fs::remove_dir_all(path).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "deleted folder");
    Ok(())
}

/// Rename a case file, appending `.json` when missing
pub fn rename_case_file(path: &Path, new_name: &str) -> Result<PathBuf> {
    let new_name = validate_name(new_name)?;
    if !path.is_file() {
        return Err(Error::NotFound(path.display().to_string()));
    }
    let file_name = if new_name.ends_with(".json") {
        new_name.to_string()
    } else {
        format!("{}.json", new_name)
    };
    let target = sibling(path, &file_name);
    if target == path {
        return Ok(target);
    }
    if target.exists() {
        return Err(Error::AlreadyExists(target.display().to_string()));
    }
    fs::rename(path, &target).map_err(|e| Error::io(path, e))?;
    Ok(target)
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map(|p| p.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

// =============================================================================
// Moves
// =============================================================================

/// Why a move was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRejected {
    /// Source path does not exist
    SourceMissing(PathBuf),
    /// Target folder does not exist
    TargetMissing(PathBuf),
    /// Source already lives in the target folder
    AlreadyInTarget,
    /// Target folder already holds an entry with the same name
    NameTaken(PathBuf),
    /// A folder cannot move into itself or one of its descendants
    IntoItself,
}

impl fmt::Display for MoveRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejected::SourceMissing(p) => write!(f, "{} does not exist", p.display()),
            MoveRejected::TargetMissing(p) => {
                write!(f, "target folder {} does not exist", p.display())
            }
            MoveRejected::AlreadyInTarget => write!(f, "already in the target folder"),
            MoveRejected::NameTaken(p) => write!(f, "{} already exists", p.display()),
            MoveRejected::IntoItself => write!(f, "cannot move a folder into itself"),
        }
    }
}

/// Destination path for moving `source` into `target_folder`
pub fn move_destination(source: &Path, target_folder: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => target_folder.join(name),
        None => target_folder.to_path_buf(),
    }
}

/// Check whether `source` can be moved into `target_folder`
pub fn check_move(source: &Path, target_folder: &Path) -> std::result::Result<(), MoveRejected> {
    if !source.exists() {
        return Err(MoveRejected::SourceMissing(source.to_path_buf()));
    }
    if !target_folder.is_dir() {
        return Err(MoveRejected::TargetMissing(target_folder.to_path_buf()));
    }
    if let Some(parent) = source.parent() {
        if same_path(parent, target_folder) {
            return Err(MoveRejected::AlreadyInTarget);
        }
    }
    if source.is_dir() && is_subpath(target_folder, source) {
        return Err(MoveRejected::IntoItself);
    }
    let dest = move_destination(source, target_folder);
    if dest.exists() {
        return Err(MoveRejected::NameTaken(dest));
    }
    Ok(())
}

/// Move a file or folder into `target_folder` after [`check_move`] passed
pub fn move_entry(source: &Path, target_folder: &Path) -> Result<PathBuf> {
    let dest = move_destination(source, target_folder);
    move_path(source, &dest)?;
    info!(from = %source.display(), to = %dest.display(), "moved entry");
    Ok(dest)
}

/// Whether `path` equals `ancestor` or lies beneath it
///
/// Paths are canonicalised when they exist; otherwise they are compared
/// lexically after normalising `.` and `..` components.
pub fn is_subpath(path: &Path, ancestor: &Path) -> bool {
    let path = canonical_or_normalized(path);
    let ancestor = canonical_or_normalized(ancestor);
    path.starts_with(&ancestor)
}

fn same_path(a: &Path, b: &Path) -> bool {
    canonical_or_normalized(a) == canonical_or_normalized(b)
}

fn canonical_or_normalized(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
