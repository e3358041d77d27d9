use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort an extraction before anything is written.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Config '{name}' not found (searched: {searched})")]
    ConfigNotFound { name: String, searched: String },

    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{origin}': {message}")]
    ConfigParse { origin: String, message: String },

    #[error("Directory '{0}' not found")]
    BaseDirectory(PathBuf),

    #[error("Invalid selection pattern '{pattern}': {source}")]
    InvalidSelection {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A per-directory or per-file problem. Recorded, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanIssue {
    DirectoryMissing(String),
    SpecificFileMissing(String),
    WalkFailure { directory: String, message: String },
    DecodeWarning(String),
    ReadFailure { path: String, message: String },
}

impl fmt::Display for ScanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanIssue::DirectoryMissing(dir) => {
                write!(f, "Directory '{}' does not exist, skipped", dir)
            }
            ScanIssue::SpecificFileMissing(path) => {
                write!(f, "Specific file '{}' not found, skipped", path)
            }
            ScanIssue::WalkFailure { directory, message } => {
                write!(f, "Error walking '{}': {}", directory, message)
            }
            ScanIssue::DecodeWarning(path) => {
                write!(f, "'{}' is not valid UTF-8, invalid bytes replaced", path)
            }
            ScanIssue::ReadFailure { path, message } => {
                write!(f, "Could not read '{}': {}", path, message)
            }
        }
    }
}
