use crate::error::{CatalogError, Result};
use infragen_facts::is_go_source_file;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scanner for finding Go source files below a root
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect non-test `.go` files in walk order.
    ///
    /// Any traversal error aborts the scan.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| CatalogError::Walk {
                root: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if !is_go_source_file(path) {
                log::debug!("Skipping non-source file {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        log::info!(
            "Found {} Go source files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}
