//! Error types for indexing operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an indexing run.
///
/// Any of these leaves the previously published index in place: nothing is
/// renamed until the new file has been fully written.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The seed list could not be read.
    #[error("Cannot read seed list {path}: {source}")]
    SeedList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed list contained no directories.
    #[error("Seed list {path} names no directories to index")]
    NoSeeds { path: PathBuf },

    /// The walk produced no entries, so there is nothing to publish.
    #[error("No entries found below the seeds listed in {path}")]
    NoEntries { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single record does not fit in one block.
    #[error("Entry {path} needs {len} bytes but a block holds {capacity}")]
    EntryTooLarge {
        path: PathBuf,
        len: usize,
        capacity: usize,
    },

    /// An index file whose length is not a whole number of blocks.
    #[error("Index file {path} is {len} bytes, not a multiple of {block_size}")]
    Misaligned {
        path: PathBuf,
        len: u64,
        block_size: usize,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl IndexError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::SeedList { path, .. }
            | Self::NoSeeds { path }
            | Self::NoEntries { path }
            | Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::EntryTooLarge { path, .. }
            | Self::Misaligned { path, .. } => Some(path),
            Self::InvalidConfig { .. } => None,
        }
    }
}

/// Kind of index warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// The ignore list is missing or unreadable; nothing is ignored.
    MissingIgnoreFile,
    /// A path contains the record separator and cannot be stored.
    UnindexablePath,
}

/// Non-fatal warning encountered during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl IndexWarning {
    /// Create a new index warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for an absent or unreadable ignore list.
    pub fn missing_ignore_file(path: impl Into<PathBuf>, error: &IndexError) -> Self {
        let path = path.into();
        Self {
            message: format!("Unable to load ignore patterns: {error}"),
            path,
            kind: WarningKind::MissingIgnoreFile,
        }
    }

    /// Create a warning for a path that contains the record separator.
    pub fn unindexable(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Skipping path containing record separator: {}", path.display()),
            path,
            kind: WarningKind::UnindexablePath,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_io() {
        let err = IndexError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, IndexError::PermissionDenied { .. }));

        let err = IndexError::io("/test/path", std::io::Error::other("disk on fire"));
        assert!(matches!(err, IndexError::Io { .. }));
        assert_eq!(err.path().unwrap(), &PathBuf::from("/test/path"));
    }

    #[test]
    fn test_no_entries_names_seed_list() {
        let err = IndexError::NoEntries {
            path: PathBuf::from("conf/fslocate.indexlist"),
        };
        assert_eq!(err.path().unwrap(), &PathBuf::from("conf/fslocate.indexlist"));
        assert!(err.to_string().contains("conf/fslocate.indexlist"));
    }

    #[test]
    fn test_entry_too_large_message() {
        let err = IndexError::EntryTooLarge {
            path: PathBuf::from("/deep"),
            len: 10,
            capacity: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("/deep"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_warning_creation() {
        let err = IndexError::NotFound {
            path: PathBuf::from("conf/fslocate.ignore"),
        };
        let warning = IndexWarning::missing_ignore_file("conf/fslocate.ignore", &err);
        assert_eq!(warning.kind, WarningKind::MissingIgnoreFile);
        assert!(warning.message.contains("ignore patterns"));
    }
}
