//! Low-level file writing
//!
//! Every document write goes through [`write_json_atomic`]: the bytes land in
//! a hidden sibling first and are renamed over the target, so a crash never
//! leaves a half-written case behind.

use casebook_core::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Serialize `value` as indented JSON
///
/// Non-ASCII characters are written as-is (serde_json never escapes them).
pub fn to_pretty_json<T: Serialize>(value: &T, indent: usize) -> Result<Vec<u8>> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Temporary sibling used while writing `path`
pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write bytes to `path` via a temporary file and rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let tmp = temp_path_for(path);
    fs::write(&tmp, bytes).map_err(|e| Error::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }
    Ok(())
}

/// Serialize and write atomically
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T, indent: usize) -> Result<()> {
    let bytes = to_pretty_json(value, indent)?;
    write_atomic(path, &bytes)
}

/// Move a file or directory, copying when a plain rename is not possible
/// (for instance across filesystems)
pub fn move_path(source: &Path, dest: &Path) -> Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                source = %source.display(),
                dest = %dest.display(),
                error = %rename_err,
                "rename failed, falling back to copy"
            );
            if source.is_dir() {
                copy_dir_recursive(source, dest)?;
                fs::remove_dir_all(source).map_err(|e| Error::io(source, e))
            } else {
                fs::copy(source, dest).map_err(|e| Error::io(dest, e))?;
                fs::remove_file(source).map_err(|e| Error::io(source, e))
            }
        }
    }
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
    for entry in walkdir::WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            Error::io(&path, e.into())
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| Error::InvalidOperation(format!("{} escaped copy root", entry.path().display())))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        }
    }
    Ok(())
}
