use std::path::{Path, PathBuf};

use crate::error::GlviewError;

/// Locates resource files across an ordered list of search directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFinder {
    dirs: Vec<PathBuf>,
}

impl FileFinder {
    /// Create a finder searching `dirs` in order.
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Search directories, in lookup order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Append a search directory.
    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    /// Resolve `path` to an existing file.
    ///
    /// Absolute paths are checked as is. Relative paths are tried against
    /// each search directory in order; with no directories configured they
    /// are tried relative to the working directory.
    pub fn find(&self, path: &Path) -> Result<PathBuf, GlviewError> {
        if path.is_absolute() || self.dirs.is_empty() {
            return if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(GlviewError::NotFound(path.to_path_buf()))
            };
        }

        self.dirs
            .iter()
            .map(|dir| dir.join(path))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                log::warn!(
                    "'{}' not found in {} search director{}",
                    path.display(),
                    self.dirs.len(),
                    if self.dirs.len() == 1 { "y" } else { "ies" }
                );
                GlviewError::NotFound(path.to_path_buf())
            })
    }
}

/// Read a text file, attaching the path to any I/O error.
pub(crate) fn read_source(path: &Path) -> Result<String, GlviewError> {
    std::fs::read_to_string(path).map_err(|source| GlviewError::Read {
        path: path.to_path_buf(),
        source,
    })
}
