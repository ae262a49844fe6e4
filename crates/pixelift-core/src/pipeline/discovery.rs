//! File discovery for finding images in a directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Discovers image files directly inside a directory.
pub struct DirectoryScanner {
    extensions: Vec<String>,
}

impl DirectoryScanner {
    /// Create a scanner accepting the given extensions (lowercase, no dot).
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Scan a directory for supported image files.
    ///
    /// Non-recursive: only regular files directly inside `dir` are
    /// considered. Returns `NotADirectory` if `dir` does not denote an
    /// existing directory.
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        if !dir.is_dir() {
            return Err(PipelineError::NotADirectory(dir.to_path_buf()));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();

        // Sort by path for deterministic ordering
        files.sort();
        Ok(files)
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext_lower)
            })
            .unwrap_or(false)
    }
}
