//! Attachment files linked from test-case steps
//!
//! Each folder of cases has an attachment directory next to the case files
//! (`_attachment` by default). A file attached to a case is copied in as
//! `<case id>_<stem><ext>` and the step keeps only that file name.

use crate::repository::{CaseFile, DEFAULT_ATTACHMENT_DIR};
use casebook_core::{Error, Result, TestCase};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An attachment file and the steps that link to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentInfo {
    /// Full path of the file
    pub path: PathBuf,
    /// File name as stored in step attachment lists
    pub name: String,
    /// Indices of the steps referencing the file
    pub steps: Vec<usize>,
}

/// Manages the attachment directory of case folders
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir_name: String,
}

impl Default for AttachmentStore {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACHMENT_DIR)
    }
}

impl AttachmentStore {
    /// Store using `dir_name` as the per-folder attachment directory
    pub fn new(dir_name: impl Into<String>) -> Self {
        Self {
            dir_name: dir_name.into(),
        }
    }

    /// Attachment directory serving cases in `folder`
    pub fn dir_in(&self, folder: &Path) -> PathBuf {
        folder.join(&self.dir_name)
    }

    /// Attachment directory for a case file
    pub fn dir_for(&self, case: &CaseFile) -> PathBuf {
        self.dir_in(case.folder())
    }

    /// Copy `source` into the attachment directory and link it from a step
    ///
    /// The stored name is `<case id>_<alias or source stem><source ext>`. An
    /// existing file with that name is never overwritten. Returns the stored
    /// name. The case itself is only modified in memory.
    pub fn attach(
        &self,
        case: &mut CaseFile,
        source: &Path,
        step: usize,
        alias: Option<&str>,
    ) -> Result<String> {
        if case.case.id.is_empty() {
            return Err(Error::InvalidOperation(
                "test case has no id; save it first".to_string(),
            ));
        }
        if case.case.steps.is_empty() {
            return Err(Error::InvalidOperation(
                "test case has no steps to attach to".to_string(),
            ));
        }
        if !case.case.has_step(step) {
            return Err(Error::NotFound(format!(
                "step {} (case has {} steps)",
                step + 1,
                case.case.steps.len()
            )));
        }
        if !source.is_file() {
            return Err(Error::NotFound(source.display().to_string()));
        }

        let stem = match alias.map(str::trim).filter(|a| !a.is_empty()) {
            Some(alias) => alias.to_string(),
            None => source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let name = format!("{}_{}{}", case.case.id, stem, ext);
        crate::layout::validate_name(&name)?;

        let dir = self.dir_for(case);
        let target = dir.join(&name);
        if target.exists() {
            return Err(Error::AlreadyExists(target.display().to_string()));
        }
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        fs::copy(source, &target).map_err(|e| Error::io(&target, e))?;

        let links = &mut case.case.steps[step].attachments;
        if !links.iter().any(|l| l == &name) {
            links.push(name.clone());
        }
        debug!(file = %target.display(), step, "attached file");
        Ok(name)
    }

    /// Unlink `name` from every step and delete the file
    ///
    /// Returns whether a file was removed from disk.
    pub fn detach(&self, case: &mut CaseFile, name: &str) -> Result<bool> {
        for step in &mut case.case.steps {
            step.attachments.retain(|l| l != name);
        }
        let path = self.dir_for(case).join(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    /// Files belonging to a case: names starting with `<case id>_`
    pub fn list(&self, case: &CaseFile) -> Result<Vec<AttachmentInfo>> {
        let id = &case.case.id;
        let dir = self.dir_for(case);
        if id.is_empty() || !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))? {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if owned_suffix(&name, id).is_none() {
                continue;
            }
            let steps = steps_referencing(&case.case, &name);
            found.push(AttachmentInfo { path, name, steps });
        }
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    /// Names referenced by any step of `case`, without duplicates
    pub fn referenced(case: &TestCase) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for step in &case.steps {
            for link in &step.attachments {
                if !names.contains(link) {
                    names.push(link.clone());
                }
            }
        }
        names
    }

    /// Move the attachment files of `case` from `from_folder` to `to_folder`
    ///
    /// Files that are missing are ignored; a name already taken in the target
    /// directory is left behind with a warning.
    pub fn relocate(&self, case: &TestCase, from_folder: &Path, to_folder: &Path) -> Result<usize> {
        let from = self.dir_in(from_folder);
        let to = self.dir_in(to_folder);
        let mut moved = 0;
        for name in Self::referenced(case) {
            let source = from.join(&name);
            if !source.is_file() {
                continue;
            }
            let dest = to.join(&name);
            if dest.exists() {
                warn!(file = %dest.display(), "attachment already exists in target, leaving original");
                continue;
            }
            fs::create_dir_all(&to).map_err(|e| Error::io(&to, e))?;
            crate::io::move_path(&source, &dest)?;
            moved += 1;
        }
        if moved > 0 {
            debug!(from = %from.display(), to = %to.display(), moved, "relocated attachments");
        }
        Ok(moved)
    }

    /// Copy the attachments of `source` for a duplicate living in `dest_folder`
    ///
    /// Each referenced file whose name starts with `<source id>_` is copied
    /// under the duplicate's id, and the duplicate's step links are rewritten
    /// to the new names. Links to files that do not exist are kept unchanged.
    pub fn copy_for_duplicate(
        &self,
        source: &CaseFile,
        duplicate: &mut TestCase,
        dest_folder: &Path,
    ) -> Result<usize> {
        let old_id = source.case.id.as_str();
        if old_id.is_empty() {
            return Ok(0);
        }
        let from = self.dir_for(source);
        let to = self.dir_in(dest_folder);
        let mut copied = 0;
        for name in Self::referenced(&source.case) {
            let Some(rest) = owned_suffix(&name, old_id) else {
                continue;
            };
            let src = from.join(&name);
            if !src.is_file() {
                continue;
            }
            let new_name = format!("{}_{}", duplicate.id, rest);
            let dest = to.join(&new_name);
            fs::create_dir_all(&to).map_err(|e| Error::io(&to, e))?;
            fs::copy(&src, &dest).map_err(|e| Error::io(&dest, e))?;
            for step in &mut duplicate.steps {
                for link in &mut step.attachments {
                    if *link == name {
                        *link = new_name.clone();
                    }
                }
            }
            copied += 1;
        }
        Ok(copied)
    }

    /// Delete every attachment file belonging to a case
    pub fn remove_all(&self, case: &CaseFile) -> Result<usize> {
        let mut removed = 0;
        for info in self.list(case)? {
            fs::remove_file(&info.path).map_err(|e| Error::io(&info.path, e))?;
            removed += 1;
        }
        Ok(removed)
    }
}

/// Part of `name` after the `<id>_` prefix written by [`AttachmentStore::attach`]
fn owned_suffix<'a>(name: &'a str, id: &str) -> Option<&'a str> {
    if id.is_empty() {
        return None;
    }
    name.strip_prefix(id)?.strip_prefix('_')
}

fn steps_referencing(case: &TestCase, name: &str) -> Vec<usize> {
    case.steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.attachments.iter().any(|l| l == name))
        .map(|(i, _)| i)
        .collect()
}
