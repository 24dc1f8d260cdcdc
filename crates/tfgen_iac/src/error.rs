//! Error types for the file tree writer and reader.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for IaC file operations.
pub type IacResult<T> = Result<T, IacError>;

/// Errors that can occur while writing or reading generated files.
#[derive(Error, Debug)]
pub enum IacError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A generated name would escape the output directory
    #[error("Unsafe path in generated output: {0}")]
    UnsafePath(String),

    #[error("Not a generated tree: {0}")]
    NotATree(PathBuf),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] tfgen_core::CoreError),
}
