//! Configuration file support
//!
//! A case directory may carry a `casebook.toml`:
//!
//! ```toml
//! root = "cases"               # relative to the file's directory
//! attachment_dir_name = "_attachment"
//! import_folder = "from alm"
//! default_author = "qa-team"
//! max_filename_len = 80
//! json_indent = 4
//! ```
//!
//! Every key is optional.

use crate::error::{Error, Result};
use casebook_engine::{DEFAULT_IMPORT_FOLDER, DEFAULT_MAX_FILENAME_LEN};
use casebook_storage::{validate_name, DEFAULT_ATTACHMENT_DIR, DEFAULT_INDENT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in a case directory
pub const CONFIG_FILE_NAME: &str = "casebook.toml";

/// Settings for a casebook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the test cases
    pub root: Option<PathBuf>,
    /// Per-folder attachment directory name
    pub attachment_dir_name: String,
    /// Folder under the root receiving imports
    pub import_folder: String,
    /// Author set on imported cases that name none
    pub default_author: Option<String>,
    /// Cap on generated file name length
    pub max_filename_len: usize,
    /// Indentation of written JSON
    pub json_indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            attachment_dir_name: DEFAULT_ATTACHMENT_DIR.to_string(),
            import_folder: DEFAULT_IMPORT_FOLDER.to_string(),
            default_author: None,
            max_filename_len: DEFAULT_MAX_FILENAME_LEN,
            json_indent: DEFAULT_INDENT,
        }
    }
}

impl Config {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file; a relative `root` is resolved against the file's
    /// directory
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::from_toml_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        if let Some(root) = &config.root {
            if root.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                config.root = Some(base.join(root));
            }
        }
        Ok(config)
    }

    /// `dir/casebook.toml` if it exists, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check every setting; folder names must be single path components
    pub(crate) fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("attachment_dir_name", &self.attachment_dir_name),
            ("import_folder", &self.import_folder),
        ] {
            validate_name(value).map_err(|e| Error::Config(format!("{}: {}", key, e)))?;
        }
        if self.max_filename_len == 0 {
            return Err(Error::Config("max_filename_len must be positive".into()));
        }
        Ok(())
    }
}
