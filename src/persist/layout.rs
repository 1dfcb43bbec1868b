//! File Layout
//!
//! Maps a store prefix to the files it owns in its storage directory.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Character prepended to quarantined file names during migration
pub const QUARANTINE_MARKER: char = '~';

/// Suffix of the settings record file
const SETTINGS_SUFFIX: &str = "Set";

/// Suffix of the index record file
const INDEX_SUFFIX: &str = "Len";

/// The family of files belonging to one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLayout {
    dir: PathBuf,
    prefix: String,
}

impl FileLayout {
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            prefix: prefix.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// "{prefix}{page_key}"
    ///
    /// The key's `Display` form is used verbatim as a file name suffix.
    pub fn page_path(&self, page_key: &impl Display) -> PathBuf {
        self.dir.join(format!("{}{}", self.prefix, page_key))
    }

    /// "{prefix}Set"
    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.prefix, SETTINGS_SUFFIX))
    }

    /// "{prefix}Len"
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.prefix, INDEX_SUFFIX))
    }

    /// Prefix the quarantined generation of this store is stored under
    pub fn quarantined_prefix(&self) -> String {
        format!("{}{}", QUARANTINE_MARKER, self.prefix)
    }

    /// Every file in the directory whose name starts with the prefix
    pub fn family_files(&self) -> Result<Vec<PathBuf>> {
        Self::files_with_prefix(&self.dir, &self.prefix)
    }

    /// Rename every family file to "~{name}"
    ///
    /// Returns the number of files moved aside.
    pub fn quarantine(&self) -> Result<usize> {
        let files = self.family_files()?;
        for path in &files {
            if let Some(name) = path.file_name() {
                let target = self
                    .dir
                    .join(format!("{}{}", QUARANTINE_MARKER, name.to_string_lossy()));
                fs::rename(path, target)?;
            }
        }
        Ok(files.len())
    }

    /// Delete every quarantined family file
    ///
    /// Returns the number of files removed.
    pub fn remove_quarantined(&self) -> Result<usize> {
        let files = Self::files_with_prefix(&self.dir, &self.quarantined_prefix())?;
        for path in &files {
            fs::remove_file(path)?;
        }
        Ok(files.len())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn files_with_prefix(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let matches = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with(prefix))
                .unwrap_or(false);
            if matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
