//! Test-case service
//!
//! [`TestCaseService`] sits on top of a [`TestCaseRepository`] and adds the
//! operations a front end needs: validation on save, duplicate, checked
//! moves that carry attachments along, batch move/delete and the Azure
//! DevOps import.
//!
//! # Example
//!
//! ```ignore
//! use casebook_engine::TestCaseService;
//! use casebook_storage::FsRepository;
//!
//! let service = TestCaseService::with_fs(FsRepository::new());
//! let mut file = service.create_new_test_case(Path::new("./cases"))?;
//! file.case.name = "Login works".into();
//! service.save_test_case(&mut file)?;
//! ```

use crate::azure::{self, ImportReport};
use casebook_core::{new_id, short_token, Error, Result, StepStatus, TestCase};
use casebook_storage::{
    check_move, create_folder, delete_folder, move_entry, rename_case_file, rename_folder,
    validate_name, AttachmentInfo, AttachmentStore, CaseFile, FolderNode, FsRepository,
    LoadReport, MoveRejected, TestCaseRepository,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix given to the name of a duplicated case
pub const COPY_PREFIX: &str = "(copy) ";
/// Default folder under the root receiving imported cases
pub const DEFAULT_IMPORT_FOLDER: &str = "from alm";
/// Default cap on generated file name length
pub const DEFAULT_MAX_FILENAME_LEN: usize = 80;

// =============================================================================
// Operation types
// =============================================================================

/// Result of [`TestCaseService::move_item`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The entry now lives at this path
    Moved(PathBuf),
    /// Nothing was changed
    Rejected(MoveRejected),
}

impl MoveOutcome {
    /// New location, if the move happened
    pub fn moved_to(&self) -> Option<&Path> {
        match self {
            MoveOutcome::Moved(path) => Some(path),
            MoveOutcome::Rejected(_) => None,
        }
    }
}

/// Entry selected for a batch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A case file
    Case(PathBuf),
    /// A folder and everything in it
    Folder(PathBuf),
}

impl Item {
    /// Classify an existing path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Item::Folder(path)
        } else {
            Item::Case(path)
        }
    }

    /// Path of the entry
    pub fn path(&self) -> &Path {
        match self {
            Item::Case(path) | Item::Folder(path) => path,
        }
    }

    fn label(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string())
    }
}

/// Outcome of a batch operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Items processed successfully
    pub succeeded: usize,
    /// One message per item that failed
    pub errors: Vec<String>,
}

impl BulkReport {
    /// Whether every item succeeded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Where and how imported cases are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Folder under the target root receiving one sub-folder per export file
    pub folder_name: String,
    /// Cap on generated file name length, in characters
    pub max_filename_len: usize,
    /// Author assigned when the export names none
    pub default_author: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            folder_name: DEFAULT_IMPORT_FOLDER.to_string(),
            max_filename_len: DEFAULT_MAX_FILENAME_LEN,
            default_author: None,
        }
    }
}

// =============================================================================
// TestCaseService
// =============================================================================

/// Business operations over a test-case repository
#[derive(Debug, Clone)]
pub struct TestCaseService<R: TestCaseRepository = FsRepository> {
    repo: R,
    attachments: AttachmentStore,
    import: ImportOptions,
}

impl TestCaseService<FsRepository> {
    /// Service over a filesystem repository, sharing its attachment folder name
    pub fn with_fs(repo: FsRepository) -> Self {
        let attachments = AttachmentStore::new(repo.attachment_dir_name());
        Self::new(repo, attachments)
    }

    /// Folder tree below `root`, including empty folders
    pub fn tree(&self, root: &Path) -> Result<FolderNode> {
        let report = self.repo.load_all(root)?;
        FolderNode::build(root, &report.cases, &self.repo)
    }
}

impl<R: TestCaseRepository> TestCaseService<R> {
    /// Service over `repo`, storing attachments with `attachments`
    pub fn new(repo: R, attachments: AttachmentStore) -> Self {
        Self {
            repo,
            attachments,
            import: ImportOptions::default(),
        }
    }

    /// Replace the import options
    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.import = options;
        self
    }

    /// The underlying repository
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The attachment store
    pub fn attachments(&self) -> &AttachmentStore {
        &self.attachments
    }

    /// Current import options
    pub fn import_options(&self) -> &ImportOptions {
        &self.import
    }

    // -------------------------------------------------------------------------
    // Single cases
    // -------------------------------------------------------------------------

    /// Load every case below `directory`
    pub fn load_all_test_cases(&self, directory: &Path) -> Result<LoadReport> {
        self.repo.load_all(directory)
    }

    /// Load one case file
    pub fn load_test_case(&self, path: &Path) -> Result<CaseFile> {
        self.repo.load(path)
    }

    /// Save a case to its file; a blank name is rejected
    pub fn save_test_case(&self, file: &mut CaseFile) -> Result<()> {
        file.case.name = file.case.name.trim().to_string();
        if file.case.name.is_empty() {
            return Err(Error::ValidationError(
                "test case name must not be empty".to_string(),
            ));
        }
        self.repo.save(&mut file.case, &file.path)
    }

    /// Delete a case file together with its attachment files
    pub fn delete_test_case(&self, file: &CaseFile) -> Result<()> {
        let removed = self.attachments.remove_all(file)?;
        self.repo.delete(&file.path)?;
        info!(path = %file.path.display(), attachments = removed, "deleted test case");
        Ok(())
    }

    /// Create a blank case in `folder` and write it immediately
    pub fn create_new_test_case(&self, folder: &Path) -> Result<CaseFile> {
        let mut file = self.repo.create_new(folder);
        self.repo.save(&mut file.case, &file.path)?;
        info!(path = %file.path.display(), "created test case");
        Ok(file)
    }

    /// Copy a case next to the original
    ///
    /// The copy gets a fresh id, a `(copy) ` name prefix and the file name
    /// `<stem>_copy_<token>.json`. Attachment files are copied under the new
    /// id.
    pub fn duplicate_test_case(&self, source: &CaseFile) -> Result<CaseFile> {
        let mut case = source.case.clone();
        case.id = new_id();
        case.name = format!("{}{}", COPY_PREFIX, source.case.name);

        let folder = source.folder().to_path_buf();
        let path = folder.join(format!("{}_copy_{}.json", source.file_stem(), short_token()));
        if path.exists() {
            return Err(Error::AlreadyExists(path.display().to_string()));
        }

        let copied = self
            .attachments
            .copy_for_duplicate(source, &mut case, &folder)?;
        self.repo.save(&mut case, &path)?;
        info!(
            from = %source.path.display(),
            to = %path.display(),
            attachments = copied,
            "duplicated test case"
        );
        Ok(CaseFile::new(path, case))
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Move a case file or folder into `target_folder`
    ///
    /// Refusals come back as [`MoveOutcome::Rejected`]; only I/O failures
    /// during the move itself are errors. A moved case takes the attachment
    /// files it references along; if that fails the case still counts as
    /// moved and a warning is logged.
    pub fn move_item(&self, source: &Path, target_folder: &Path) -> Result<MoveOutcome> {
        if let Err(reason) = check_move(source, target_folder) {
            debug!(source = %source.display(), %reason, "move rejected");
            return Ok(MoveOutcome::Rejected(reason));
        }

        let case = if source.is_file() {
            match self.repo.load(source) {
                Ok(file) => Some(file.case),
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "moving file without reading attachments");
                    None
                }
            }
        } else {
            None
        };

        let from_folder = source.parent().map(Path::to_path_buf).unwrap_or_default();
        let dest = move_entry(source, target_folder)?;
        if let Some(case) = case {
            if let Err(e) = self.attachments.relocate(&case, &from_folder, target_folder) {
                warn!(
                    path = %dest.display(),
                    error = %e,
                    "moved test case but its attachments stayed behind"
                );
            }
        }
        Ok(MoveOutcome::Moved(dest))
    }

    /// Move several entries; failures are collected, never fatal
    pub fn bulk_move_items(&self, items: &[Item], target_folder: &Path) -> BulkReport {
        let mut report = BulkReport::default();
        for item in items {
            match self.move_item(item.path(), target_folder) {
                Ok(MoveOutcome::Moved(_)) => report.succeeded += 1,
                Ok(MoveOutcome::Rejected(reason)) => report
                    .errors
                    .push(format!("could not move {}: {}", item.label(), reason)),
                Err(e) => report
                    .errors
                    .push(format!("could not move {}: {}", item.label(), e)),
            }
        }
        report
    }

    /// Delete several entries; failures are collected, never fatal
    pub fn bulk_delete_items(&self, items: &[Item]) -> BulkReport {
        let mut report = BulkReport::default();
        for item in items {
            let result = match item {
                Item::Case(path) => self.delete_case_path(path),
                Item::Folder(path) => delete_folder(path),
            };
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => report
                    .errors
                    .push(format!("could not delete {}: {}", item.label(), e)),
            }
        }
        report
    }

    fn delete_case_path(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        match self.repo.load(path) {
            Ok(file) => self.delete_test_case(&file),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "deleting unreadable test case");
                self.repo.delete(path)
            }
        }
    }

    /// Rename a folder, or a case file (`.json` is appended when missing)
    pub fn rename_item(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        if path.is_dir() {
            rename_folder(path, new_name)
        } else {
            rename_case_file(path, new_name)
        }
    }

    /// Create `parent/name`
    pub fn create_folder(&self, parent: &Path, name: &str) -> Result<PathBuf> {
        create_folder(parent, name)
    }

    // -------------------------------------------------------------------------
    // Attachments
    // -------------------------------------------------------------------------

    /// Attach `source` to step `step` and save the case
    pub fn attach_file(
        &self,
        file: &mut CaseFile,
        source: &Path,
        step: usize,
        alias: Option<&str>,
    ) -> Result<String> {
        let name = self.attachments.attach(file, source, step, alias)?;
        self.save_test_case(file)?;
        Ok(name)
    }

    /// Remove an attachment from every step, delete the file and save
    pub fn detach_file(&self, file: &mut CaseFile, name: &str) -> Result<bool> {
        let removed = self.attachments.detach(file, name)?;
        self.save_test_case(file)?;
        Ok(removed)
    }

    /// Attachment files belonging to a case
    pub fn list_attachments(&self, file: &CaseFile) -> Result<Vec<AttachmentInfo>> {
        self.attachments.list(file)
    }

    // -------------------------------------------------------------------------
    // Run statuses
    // -------------------------------------------------------------------------

    /// Set every step of one case back to pending and save it
    ///
    /// A case without steps is left untouched and `false` is returned.
    pub fn reset_step_statuses(&self, file: &mut CaseFile) -> Result<bool> {
        self.set_step_statuses(file, StepStatus::Pending)
    }

    /// Mark every step of one case passed and save it
    pub fn pass_all_steps(&self, file: &mut CaseFile) -> Result<bool> {
        self.set_step_statuses(file, StepStatus::Passed)
    }

    fn set_step_statuses(&self, file: &mut CaseFile, status: StepStatus) -> Result<bool> {
        if !file.case.set_step_statuses(status.clone()) {
            return Ok(false);
        }
        self.save_test_case(file)?;
        debug!(path = %file.path.display(), %status, "set step statuses");
        Ok(true)
    }

    /// Reset the step statuses of every case below `directory`
    ///
    /// Cases without steps are skipped; cases that fail to save are reported
    /// in the returned [`BulkReport`].
    pub fn reset_all_step_statuses(&self, directory: &Path) -> Result<BulkReport> {
        let loaded = self.repo.load_all(directory)?;
        let mut report = BulkReport::default();
        for mut file in loaded.cases {
            match self.reset_step_statuses(&mut file) {
                Ok(true) => report.succeeded += 1,
                Ok(false) => {}
                Err(e) => report.errors.push(format!(
                    "could not reset {}: {}",
                    file.file_name(),
                    e
                )),
            }
        }
        info!(
            directory = %directory.display(),
            reset = report.succeeded,
            failed = report.errors.len(),
            "reset step statuses"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Import
    // -------------------------------------------------------------------------

    /// Import an Azure DevOps export into
    /// `<target_root>/<import folder>/<export file stem>/`
    ///
    /// Problems are reported in the returned [`ImportReport`]; a failure on
    /// one case does not stop the others.
    pub fn import_from_azure(&self, json_path: &Path, target_root: &Path) -> ImportReport {
        let mut report = ImportReport::default();
        let source_name = json_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let payload = match azure::load_payload(json_path) {
            Ok(payload) => payload,
            Err(e) => {
                report.errors.push(format!("{}: {}", source_name, e));
                return report;
            }
        };
        let parsed = azure::parse_test_cases(&payload);
        if parsed.is_empty() {
            report
                .errors
                .push(format!("{}: no test cases found", source_name));
            return report;
        }

        let stem = json_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let import_folder = match validate_name(&self.import.folder_name) {
            Ok(name) => name,
            Err(e) => {
                report.errors.push(format!("{}: {}", source_name, e));
                return report;
            }
        };
        let folder = target_root.join(import_folder).join(stem);
        if let Err(e) = fs::create_dir_all(&folder) {
            report
                .errors
                .push(format!("{}: {}", source_name, Error::io(&folder, e)));
            return report;
        }

        for source in &parsed {
            let mut case = azure::build_case(source);
            if case.author.is_empty() {
                if let Some(author) = &self.import.default_author {
                    case.author = author.clone();
                }
            }
            let file_name =
                azure::unique_filename(&case.name, &case.id, &folder, self.import.max_filename_len);
            let path = folder.join(file_name);
            match self.repo.save(&mut case, &path) {
                Ok(()) => report.created += 1,
                Err(e) => {
                    warn!(title = %source.title, error = %e, "import of test case failed");
                    report
                        .errors
                        .push(format!("{} → {}: {}", source_name, source.title, e));
                }
            }
        }
        info!(
            file = %json_path.display(),
            created = report.created,
            failed = report.errors.len(),
            "imported Azure DevOps export"
        );
        report
    }
}

impl Default for TestCaseService<FsRepository> {
    fn default() -> Self {
        Self::with_fs(FsRepository::new())
    }
}

/// Reject a step index outside `case`
pub fn ensure_step(case: &TestCase, index: usize) -> Result<()> {
    if case.has_step(index) {
        Ok(())
    } else {
        Err(Error::NotFound(format!(
            "step {} (case has {} steps)",
            index + 1,
            case.steps.len()
        )))
    }
}
