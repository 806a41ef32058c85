//! Test-case repository
//!
//! The [`TestCaseRepository`] trait is the persistence boundary: load every
//! case under a directory, save/delete single files and hand out new blank
//! cases. [`FsRepository`] is the folder-of-JSON-files implementation.
//!
//! ## Scan rules
//!
//! - every `*.json` file below the root is a candidate
//! - hidden directories (`.git`, ...) and attachment folders are not entered
//! - a file that cannot be read or parsed is logged and reported in
//!   [`LoadReport::failures`]; it never aborts the scan

use crate::io::write_json_atomic;
use casebook_core::{short_token, Error, Result, TestCase, Timestamp};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default name of the per-folder attachment directory
pub const DEFAULT_ATTACHMENT_DIR: &str = "_attachment";
/// Default JSON indentation width
pub const DEFAULT_INDENT: usize = 4;

// =============================================================================
// CaseFile
// =============================================================================

/// A test case together with the file it lives in
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFile {
    /// Location of the JSON document
    pub path: PathBuf,
    /// The record
    pub case: TestCase,
}

impl CaseFile {
    /// Pair a case with a path
    pub fn new(path: impl Into<PathBuf>, case: TestCase) -> Self {
        Self {
            path: path.into(),
            case,
        }
    }

    /// File name component, e.g. `login.json`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without the `.json` extension
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Folder containing the file
    pub fn folder(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

// =============================================================================
// LoadReport
// =============================================================================

/// A file that could not be loaded during a scan
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    /// Offending path
    pub path: PathBuf,
    /// Human-readable reason
    pub reason: String,
}

/// Result of scanning a directory
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Successfully parsed cases, ordered by path
    pub cases: Vec<CaseFile>,
    /// Files that were skipped
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Whether every candidate file loaded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// =============================================================================
// Repository trait
// =============================================================================

/// Persistence boundary for test cases
pub trait TestCaseRepository {
    /// Recursively load every test case under `directory`
    ///
    /// A missing directory yields an empty report.
    fn load_all(&self, directory: &Path) -> Result<LoadReport>;

    /// Load a single file
    fn load(&self, path: &Path) -> Result<CaseFile>;

    /// Write `case` to `path`, stamping `updated_at` with the current time
    fn save(&self, case: &mut TestCase, path: &Path) -> Result<()>;

    /// Remove the file at `path`; a missing file is not an error
    fn delete(&self, path: &Path) -> Result<()>;

    /// Blank case placed in `target_folder` under a generated name
    ///
    /// Nothing is written to disk.
    fn create_new(&self, target_folder: &Path) -> CaseFile;
}

// =============================================================================
// FsRepository
// =============================================================================

/// Folder-of-JSON-files repository
#[derive(Debug, Clone)]
pub struct FsRepository {
    attachment_dir: String,
    indent: usize,
}

impl Default for FsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl FsRepository {
    /// Repository with default attachment folder name and indentation
    pub fn new() -> Self {
        Self {
            attachment_dir: DEFAULT_ATTACHMENT_DIR.to_string(),
            indent: DEFAULT_INDENT,
        }
    }

    /// Use a different attachment folder name (excluded from scans)
    pub fn with_attachment_dir(mut self, name: impl Into<String>) -> Self {
        self.attachment_dir = name.into();
        self
    }

    /// Use a different JSON indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Name of the attachment folder
    pub fn attachment_dir_name(&self) -> &str {
        &self.attachment_dir
    }

    /// Whether a directory should be skipped while scanning
    pub(crate) fn is_skipped_dir(&self, name: &str) -> bool {
        name.starts_with('.') || name == self.attachment_dir
    }

    fn read_case(path: &Path) -> Result<TestCase> {
        let raw = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        if !value.is_object() {
            return Err(Error::SerializationError(
                "top-level JSON value is not an object".to_string(),
            ));
        }
        TestCase::from_json(value)
    }
}

impl TestCaseRepository for FsRepository {
    fn load_all(&self, directory: &Path) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        if !directory.exists() {
            debug!(dir = %directory.display(), "test case directory does not exist");
            return Ok(report);
        }

        let walker = WalkDir::new(directory)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.is_skipped_dir(&entry.file_name().to_string_lossy())
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(directory).to_path_buf();
                    warn!(path = %path.display(), error = %e, "cannot read directory entry");
                    report.failures.push(LoadFailure {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_case(path) {
                Ok(case) => report.cases.push(CaseFile::new(path, case)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable test case");
                    report.failures.push(LoadFailure {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.cases.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(
            dir = %directory.display(),
            loaded = report.cases.len(),
            failed = report.failures.len(),
            "scanned test cases"
        );
        Ok(report)
    }

    fn load(&self, path: &Path) -> Result<CaseFile> {
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        Ok(CaseFile::new(path, Self::read_case(path)?))
    }

    fn save(&self, case: &mut TestCase, path: &Path) -> Result<()> {
        case.updated_at = Timestamp::now();
        write_json_atomic(path, case, self.indent)?;
        debug!(path = %path.display(), id = %case.id, "saved test case");
        Ok(())
    }

    fn delete(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "deleted test case");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    fn create_new(&self, target_folder: &Path) -> CaseFile {
        let file_name = format!("tc_new_{}.json", short_token());
        CaseFile::new(target_folder.join(file_name), TestCase::new_blank())
    }
}
