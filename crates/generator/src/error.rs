use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors raised while merging fragments into the final source file
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Cannot split import block of method {method}: {reason}")]
    ImportParse { method: String, reason: String },

    #[error("No generated fragment for method {0}")]
    MissingFragment(String),

    #[error("Unexpected or duplicate fragment for method {0}")]
    UnexpectedFragment(String),

    #[error("Formatter failed: {0}")]
    Formatter(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] infragen_facts::ExtractionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] infragen_catalog::CatalogError),

    #[error("Oracle error for method {method}: {source}")]
    Oracle {
        method: String,
        #[source]
        source: infragen_oracle::OracleError,
    },

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Config merge error: {0}")]
    Config(#[from] infragen_sqlc::ConfigError),

    #[error("Failed to read {}: {source}", .path.display())]
    Reference {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Interface {0} declares no methods")]
    NoMethods(String),

    #[error("Failed to parse {}: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GeneratorError {
    pub(crate) fn oracle(method: &str, source: infragen_oracle::OracleError) -> Self {
        Self::Oracle {
            method: method.to_string(),
            source,
        }
    }
}
