//! Main entry point for casebook.
//!
//! This module provides the `Casebook` struct, a handle on one directory of
//! test cases with every service operation available on it.

use crate::config::Config;
use crate::error::{Error, Result};
use casebook_core::TestCase;
use casebook_engine::{
    case_summary, distinct_values, pytest_skeleton, BulkReport, CaseFilter, Field, ImportOptions,
    ImportReport, Item, MoveOutcome, Statistics, TestCaseService,
};
use casebook_storage::{
    delete_folder, is_subpath, AttachmentInfo, CaseFile, FolderNode, FsRepository, LoadReport,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A directory of test cases.
///
/// Create one with [`Casebook::open`] or [`Casebook::builder`]. Relative paths
/// passed to any method are resolved against the root directory.
///
/// # Example
///
/// ```ignore
/// use casebook::prelude::*;
///
/// let book = Casebook::open("./cases")?;
///
/// let mut file = book.create_new(None::<&str>)?;
/// file.case.name = "Login works".into();
/// book.save(&mut file)?;
///
/// let stats = book.statistics()?;
/// println!("{} cases, {} failed", stats.total, stats.failed);
/// ```
#[derive(Debug)]
pub struct Casebook {
    root: PathBuf,
    config: Config,
    service: TestCaseService<FsRepository>,
}

impl Casebook {
    /// Open the test-case directory at `root`.
    ///
    /// A `casebook.toml` inside `root` is honoured; the directory is created
    /// when missing.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let book = Casebook::open("./cases")?;
    /// ```
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        Self::builder().root(root).open()
    }

    /// Create a builder for custom configuration.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let book = Casebook::builder()
    ///     .root("./cases")
    ///     .import_folder("azure")
    ///     .open()?;
    /// ```
    pub fn builder() -> CasebookBuilder {
        CasebookBuilder::new()
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying service.
    pub fn service(&self) -> &TestCaseService<FsRepository> {
        &self.service
    }

    /// Resolve a path relative to the root; absolute paths pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    // =========================================================================
    // Cases
    // =========================================================================

    /// Load every case under the root.
    pub fn load_all(&self) -> Result<LoadReport> {
        Ok(self.service.load_all_test_cases(&self.root)?)
    }

    /// Load one case file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<CaseFile> {
        Ok(self.service.load_test_case(&self.resolve(path))?)
    }

    /// Save a case; blank names are rejected.
    pub fn save(&self, file: &mut CaseFile) -> Result<()> {
        Ok(self.service.save_test_case(file)?)
    }

    /// Delete a case and its attachment files.
    pub fn delete(&self, file: &CaseFile) -> Result<()> {
        Ok(self.service.delete_test_case(file)?)
    }

    /// Create and save a blank case in `folder` (the root when `None`).
    pub fn create_new(&self, folder: Option<impl AsRef<Path>>) -> Result<CaseFile> {
        let folder = match folder {
            Some(folder) => self.resolve(folder),
            None => self.root.clone(),
        };
        if !folder.is_dir() {
            return Err(Error::NotFound(folder.display().to_string()));
        }
        Ok(self.service.create_new_test_case(&folder)?)
    }

    /// Duplicate a case next to the original.
    pub fn duplicate(&self, file: &CaseFile) -> Result<CaseFile> {
        Ok(self.service.duplicate_test_case(file)?)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Folder tree of the root.
    pub fn tree(&self) -> Result<FolderNode> {
        Ok(self.service.tree(&self.root)?)
    }

    /// Move a case file or folder into `target_folder`.
    pub fn move_item(
        &self,
        source: impl AsRef<Path>,
        target_folder: impl AsRef<Path>,
    ) -> Result<MoveOutcome> {
        Ok(self
            .service
            .move_item(&self.resolve(source), &self.resolve(target_folder))?)
    }

    /// Move several entries into `target_folder`.
    ///
    /// The root and its ancestors are refused with an error entry.
    pub fn bulk_move<P: AsRef<Path>>(
        &self,
        paths: &[P],
        target_folder: impl AsRef<Path>,
    ) -> BulkReport {
        let (items, refused) = self.items(paths, "move");
        let mut report = self
            .service
            .bulk_move_items(&items, &self.resolve(target_folder));
        report.errors.extend(refused);
        report
    }

    /// Delete several entries.
    ///
    /// The root and its ancestors are refused with an error entry.
    pub fn bulk_delete<P: AsRef<Path>>(&self, paths: &[P]) -> BulkReport {
        let (items, refused) = self.items(paths, "delete");
        let mut report = self.service.bulk_delete_items(&items);
        report.errors.extend(refused);
        report
    }

    fn items<P: AsRef<Path>>(&self, paths: &[P], verb: &str) -> (Vec<Item>, Vec<String>) {
        let mut items = Vec::with_capacity(paths.len());
        let mut refused = Vec::new();
        for path in paths {
            let path = self.resolve(path);
            if self.contains_root(&path) {
                warn!(path = %path.display(), "refusing bulk {} of the root directory", verb);
                refused.push(format!(
                    "could not {} {}: refusing to {} the root directory",
                    verb,
                    path.display(),
                    verb
                ));
            } else {
                items.push(Item::from_path(path));
            }
        }
        (items, refused)
    }

    /// Whether `path` is the root or one of its ancestors
    fn contains_root(&self, path: &Path) -> bool {
        is_subpath(&self.root, path)
    }

    /// Rename a case file or folder.
    pub fn rename(&self, path: impl AsRef<Path>, new_name: &str) -> Result<PathBuf> {
        Ok(self.service.rename_item(&self.resolve(path), new_name)?)
    }

    /// Create a folder.
    pub fn create_folder(&self, parent: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
        Ok(self.service.create_folder(&self.resolve(parent), name)?)
    }

    /// Delete a folder and its content.
    pub fn delete_folder(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.resolve(path);
        if self.contains_root(&path) {
            return Err(Error::InvalidOperation(
                "refusing to delete the root directory".to_string(),
            ));
        }
        Ok(delete_folder(&path)?)
    }

    // =========================================================================
    // Attachments
    // =========================================================================

    /// Attach a file to step `step` (zero-based) and save the case.
    pub fn attach(
        &self,
        file: &mut CaseFile,
        source: impl AsRef<Path>,
        step: usize,
        alias: Option<&str>,
    ) -> Result<String> {
        Ok(self
            .service
            .attach_file(file, source.as_ref(), step, alias)?)
    }

    /// Remove an attachment and save the case.
    pub fn detach(&self, file: &mut CaseFile, name: &str) -> Result<bool> {
        Ok(self.service.detach_file(file, name)?)
    }

    /// Attachment files of a case.
    pub fn attachments(&self, file: &CaseFile) -> Result<Vec<AttachmentInfo>> {
        Ok(self.service.list_attachments(file)?)
    }

    // =========================================================================
    // Run statuses
    // =========================================================================

    /// Set every step of a case back to pending, clearing skip reasons, and
    /// save it. Returns `false` when the case has no steps.
    pub fn reset_statuses(&self, file: &mut CaseFile) -> Result<bool> {
        Ok(self.service.reset_step_statuses(file)?)
    }

    /// Mark every step of a case passed, clearing skip reasons, and save it.
    pub fn pass_all(&self, file: &mut CaseFile) -> Result<bool> {
        Ok(self.service.pass_all_steps(file)?)
    }

    /// Reset the step statuses of every case under the root.
    pub fn reset_all_statuses(&self) -> Result<BulkReport> {
        Ok(self.service.reset_all_step_statuses(&self.root)?)
    }

    // =========================================================================
    // Reports and import
    // =========================================================================

    /// Outcome counts over every case.
    pub fn statistics(&self) -> Result<Statistics> {
        let report = self.load_all()?;
        Ok(Statistics::collect(report.cases.iter().map(|f| &f.case)))
    }

    /// Cases matching `filter`, ordered by path.
    pub fn filter(&self, filter: &CaseFilter) -> Result<Vec<CaseFile>> {
        let report = self.load_all()?;
        Ok(report
            .cases
            .into_iter()
            .filter(|f| filter.matches(&f.case))
            .collect())
    }

    /// Distinct values of `field` across every case.
    pub fn distinct_values(&self, field: Field) -> Result<Vec<String>> {
        let report = self.load_all()?;
        Ok(distinct_values(report.cases.iter().map(|f| &f.case), field))
    }

    /// Plain-text summary of a case.
    pub fn summary(&self, case: &TestCase) -> String {
        case_summary(case)
    }

    /// pytest skeleton for a case.
    pub fn skeleton(&self, case: &TestCase) -> String {
        pytest_skeleton(case)
    }

    /// Import an Azure DevOps export below the root.
    pub fn import_azure(&self, json_path: impl AsRef<Path>) -> ImportReport {
        self.service.import_from_azure(json_path.as_ref(), &self.root)
    }
}

/// Builder for a [`Casebook`].
///
/// Settings are layered: explicit builder calls win over the configuration
/// (given with [`CasebookBuilder::config`] or read from
/// [`CasebookBuilder::config_file`], otherwise `casebook.toml` in the root),
/// which wins over the defaults.
///
/// # Example
///
/// ```ignore
/// let book = Casebook::builder()
///     .config_file("./casebook.toml")
///     .attachment_dir_name("files")
///     .open()?;
/// ```
#[derive(Debug, Default)]
pub struct CasebookBuilder {
    root: Option<PathBuf>,
    config: Option<Config>,
    config_file: Option<PathBuf>,
    attachment_dir_name: Option<String>,
    import_folder: Option<String>,
    default_author: Option<String>,
}

impl CasebookBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test-case directory.
    pub fn root(mut self, root: impl AsRef<Path>) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Use this configuration instead of reading a file.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Read configuration from this file.
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the attachment folder name.
    pub fn attachment_dir_name(mut self, name: impl Into<String>) -> Self {
        self.attachment_dir_name = Some(name.into());
        self
    }

    /// Override the folder receiving imports.
    pub fn import_folder(mut self, name: impl Into<String>) -> Self {
        self.import_folder = Some(name.into());
        self
    }

    /// Override the author given to imported cases without one.
    pub fn default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = Some(author.into());
        self
    }

    fn resolve_config(&self) -> Result<Config> {
        if let Some(config) = &self.config {
            return Ok(config.clone());
        }
        if let Some(path) = &self.config_file {
            return Config::load(path);
        }
        match &self.root {
            Some(root) => Config::discover(root),
            None => Ok(Config::default()),
        }
    }

    /// Open the casebook.
    ///
    /// Fails when neither the builder nor the configuration names a root.
    pub fn open(self) -> Result<Casebook> {
        let mut config = self.resolve_config()?;
        if let Some(name) = self.attachment_dir_name {
            config.attachment_dir_name = name;
        }
        if let Some(folder) = self.import_folder {
            config.import_folder = folder;
        }
        if let Some(author) = self.default_author {
            config.default_author = Some(author);
        }

        let root = self
            .root
            .or_else(|| config.root.clone())
            .ok_or_else(|| Error::Config("no test-case directory configured".to_string()))?;
        config.validate()?;
        fs::create_dir_all(&root).map_err(|e| Error::Io {
            path: root.clone(),
            source: e,
        })?;
        config.root = Some(root.clone());

        let repo = FsRepository::new()
            .with_attachment_dir(config.attachment_dir_name.clone())
            .with_indent(config.json_indent);
        let service = TestCaseService::with_fs(repo).with_import_options(ImportOptions {
            folder_name: config.import_folder.clone(),
            max_filename_len: config.max_filename_len,
            default_author: config.default_author.clone(),
        });
        info!(root = %root.display(), "opened casebook");

        Ok(Casebook {
            root,
            config,
            service,
        })
    }
}
