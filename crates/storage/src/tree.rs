//! Folder tree of a test-case directory
//!
//! [`FolderNode::build`] combines the directory structure on disk (so empty
//! folders show up) with cases already loaded by the repository.

use crate::repository::{CaseFile, FsRepository};
use casebook_core::{CaseStatus, Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A case as listed in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseEntry {
    /// Location of the case file
    pub path: PathBuf,
    /// Case name
    pub name: String,
    /// Stored status string
    pub status: String,
}

impl CaseEntry {
    /// Name prefixed with the status marker, e.g. `✓ Login works`
    ///
    /// Unknown statuses get no marker.
    pub fn display_name(&self) -> String {
        match CaseStatus::parse(&self.status) {
            Some(status) => format!("{} {}", status.marker(), self.name),
            None => self.name.clone(),
        }
    }
}

/// A folder with its sub-folders and cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    /// Folder name (the root uses its own file name)
    pub name: String,
    /// Folder path
    pub path: PathBuf,
    /// Sub-folders, sorted by name
    pub folders: Vec<FolderNode>,
    /// Cases directly in this folder, sorted by display name
    pub cases: Vec<CaseEntry>,
}

impl FolderNode {
    /// Build the tree rooted at `root`
    ///
    /// Directories the repository does not scan (hidden ones, attachment
    /// folders) are left out. A missing root yields an empty node.
    pub fn build(root: &Path, cases: &[CaseFile], repo: &FsRepository) -> Result<FolderNode> {
        let mut by_folder: BTreeMap<PathBuf, Vec<CaseEntry>> = BTreeMap::new();
        for file in cases {
            by_folder
                .entry(file.folder().to_path_buf())
                .or_default()
                .push(CaseEntry {
                    path: file.path.clone(),
                    name: file.case.name.clone(),
                    status: file.case.status.clone(),
                });
        }
        build_node(root, &mut by_folder, repo)
    }

    /// Total number of cases in this folder and below
    pub fn count_cases(&self) -> usize {
        self.cases.len() + self.folders.iter().map(FolderNode::count_cases).sum::<usize>()
    }

    /// Copy of the tree keeping only cases whose name contains `pattern`
    /// (case-insensitive) and the folders leading to them
    ///
    /// An empty pattern returns the tree unchanged.
    pub fn filtered(&self, pattern: &str) -> FolderNode {
        let needle = pattern.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        self.filter_by(&needle).unwrap_or_else(|| FolderNode {
            folders: Vec::new(),
            cases: Vec::new(),
            ..self.clone()
        })
    }

    fn filter_by(&self, needle: &str) -> Option<FolderNode> {
        let cases: Vec<CaseEntry> = self
            .cases
            .iter()
            .filter(|c| c.name.to_lowercase().contains(needle))
            .cloned()
            .collect();
        let folders: Vec<FolderNode> = self
            .folders
            .iter()
            .filter_map(|f| f.filter_by(needle))
            .collect();
        if cases.is_empty() && folders.is_empty() {
            return None;
        }
        Some(FolderNode {
            name: self.name.clone(),
            path: self.path.clone(),
            folders,
            cases,
        })
    }
}

fn build_node(
    dir: &Path,
    by_folder: &mut BTreeMap<PathBuf, Vec<CaseEntry>>,
    repo: &FsRepository,
) -> Result<FolderNode> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());

    let mut folders = Vec::new();
    if dir.is_dir() {
        let mut subdirs = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
            if !file_type.is_dir() {
                continue;
            }
            if repo.is_skipped_dir(&entry.file_name().to_string_lossy()) {
                continue;
            }
            subdirs.push(entry.path());
        }
        subdirs.sort();
        for sub in subdirs {
            folders.push(build_node(&sub, by_folder, repo)?);
        }
    }

    let mut cases = by_folder.remove(dir).unwrap_or_default();
    cases.sort_by(|a, b| {
        a.display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });

    Ok(FolderNode {
        name,
        path: dir.to_path_buf(),
        folders,
        cases,
    })
}
