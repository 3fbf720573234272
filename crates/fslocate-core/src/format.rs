//! On-disk index format.
//!
//! A published index is a sequence of fixed-size blocks. Each block holds
//! zero or more `path + RECORD_SEP` records and is padded to full size with
//! further `RECORD_SEP` bytes, so no record ever straddles a block boundary.
//! Readers may therefore seek to any multiple of the block size and scan that
//! block on its own, skipping empty records.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IndexError;

/// Size of one index block (2 MiB).
pub const BLOCK_SIZE: usize = 2_097_152;

/// ASCII "Record Separator", terminating each record and used as padding.
pub const RECORD_SEP: u8 = 0x1e;

/// Iterate over the non-empty records of a buffer.
///
/// Padding shows up as empty records and is skipped.
pub fn records(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|&b| b == RECORD_SEP)
        .filter(|record| !record.is_empty())
}

/// The bytes a path is stored as.
#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

/// Rebuild a path from its stored bytes.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Read every entry of a published index, in write order.
pub fn read_index(path: impl AsRef<Path>, block_size: usize) -> Result<Vec<PathBuf>, IndexError> {
    let path = path.as_ref();
    if block_size == 0 {
        return Err(IndexError::InvalidConfig {
            message: "Block size must be greater than zero".to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|e| IndexError::io(path, e))?;
    if bytes.len() % block_size != 0 {
        return Err(IndexError::Misaligned {
            path: path.to_path_buf(),
            len: bytes.len() as u64,
            block_size,
        });
    }

    Ok(bytes
        .chunks_exact(block_size)
        .flat_map(records)
        .map(path_from_bytes)
        .collect())
}
