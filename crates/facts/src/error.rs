use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting facts from a Go source file
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The source file could not be read
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid Go
    #[error("Parse error in {} at {line}:{column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// No interface-kind type declaration exists in the file
    #[error("No interface declaration found in {}", .0.display())]
    NoInterfaceFound(PathBuf),

    /// The `<Interface>Impl` struct is missing (or is not a struct)
    #[error("Struct {struct_name} not found in {}", .path.display())]
    ImplNotFound { path: PathBuf, struct_name: String },

    /// The `var _ <Interface> = <Interface>Impl{}` declaration is missing
    #[error(
        "Conformance assertion `var _ {interface} = {implementation}{{}}` not found in {}",
        .path.display()
    )]
    AssertionNotFound {
        path: PathBuf,
        interface: String,
        implementation: String,
    },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl ExtractionError {
    /// Create an IO error bound to the file that failed
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a parse error at a zero-based tree-sitter position
    pub fn parse(path: impl AsRef<Path>, row: usize, column: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            line: row + 1,
            column: column + 1,
            message: msg.into(),
        }
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
