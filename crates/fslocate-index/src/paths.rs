//! Path and file helpers used while indexing.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use fslocate_core::{IndexError, RECORD_SEP};
use fslocate_core::format::path_bytes;

/// Full path of a directory child.
pub fn join(dir: &Path, name: &OsStr) -> PathBuf {
    dir.join(name)
}

/// Whether something exists at `path`. Broken symlinks count as absent.
pub fn exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

/// Whether `path` can be stored as a record.
pub fn is_indexable(path: &Path) -> bool {
    !path_bytes(path).contains(&RECORD_SEP)
}

/// Create a uniquely named temporary file next to `output`.
///
/// The file lives in the output's directory so the final rename stays on one
/// filesystem. It is removed on drop unless explicitly kept.
pub fn temp_file_for(output: &Path) -> Result<NamedTempFile, IndexError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| IndexError::io(&dir, e))?;

    let prefix = match output.file_name() {
        Some(name) => format!("{}.", name.to_string_lossy()),
        None => "index.".to_string(),
    };

    tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|e| IndexError::io(&dir, e))
}
