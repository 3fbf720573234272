//! Block-aligned index writer.
//!
//! Records are accumulated in a single in-memory block. A block is flushed
//! either when it is exactly full or, padded with [`RECORD_SEP`], when the
//! next record would not fit. Every block on disk is therefore exactly
//! `capacity` bytes and no record crosses a block boundary.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, info};

use fslocate_core::format::path_bytes;
use fslocate_core::{IndexError, RECORD_SEP};

use crate::paths;
use crate::stats::WriterStats;
use crate::walker::EntrySink;

/// Writes records into fixed-size blocks of a temporary file.
pub struct BlockWriter {
    file: NamedTempFile,
    block: Vec<u8>,
    capacity: usize,
    stats: WriterStats,
    verbose: bool,
}

impl BlockWriter {
    /// Create a writer whose temporary file sits next to `output`.
    pub fn create(output: &Path, block_size: usize, verbose: bool) -> Result<Self, IndexError> {
        if block_size == 0 {
            return Err(IndexError::InvalidConfig {
                message: "Block size must be greater than zero".to_string(),
            });
        }

        let file = paths::temp_file_for(output)?;
        if verbose {
            info!(path = %file.path().display(), "Temp out file");
        }

        Ok(Self {
            file,
            block: Vec::with_capacity(block_size),
            capacity: block_size,
            stats: WriterStats::default(),
            verbose,
        })
    }

    /// Path of the temporary file being written.
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Block size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held in the current, unflushed block.
    pub fn buffered(&self) -> usize {
        self.block.len()
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Append one record.
    ///
    /// A record longer than a whole block is rejected: it could only be
    /// stored by letting it span blocks.
    pub fn emit(&mut self, entry: &Path) -> Result<(), IndexError> {
        let bytes = path_bytes(entry);
        let record_len = bytes.len() + 1;

        if record_len > self.capacity {
            return Err(IndexError::EntryTooLarge {
                path: entry.to_path_buf(),
                len: record_len,
                capacity: self.capacity,
            });
        }

        if self.block.len() + record_len > self.capacity {
            if self.verbose {
                debug!(entry = %entry.display(), "Padding block before entry");
            }
            self.pad_to_limit();
            self.flush_block()?;
        }

        self.block.extend_from_slice(&bytes);
        self.block.push(RECORD_SEP);
        self.stats.records += 1;

        // Never exceeds capacity, so equality is the only full state.
        if self.block.len() == self.capacity {
            self.flush_block()?;
        }
        Ok(())
    }

    /// Pad and flush the last partial block, then close the file.
    ///
    /// An empty block is not written, so output that ended exactly on a
    /// boundary gets no trailing all-padding block.
    pub fn finish(mut self) -> Result<FinishedIndex, IndexError> {
        if !self.block.is_empty() {
            if self.verbose {
                debug!(buffered = self.block.len(), "Padding final block");
            }
            self.pad_to_limit();
            self.flush_block()?;
        }

        if self.verbose {
            info!(
                records = self.stats.records,
                blocks = self.stats.blocks,
                padding = self.stats.padding_bytes,
                "Finished writing index"
            );
        }

        Ok(FinishedIndex {
            temp: self.file.into_temp_path(),
            stats: self.stats,
            verbose: self.verbose,
        })
    }

    fn pad_to_limit(&mut self) {
        let padding = self.capacity - self.block.len();
        self.block.resize(self.capacity, RECORD_SEP);
        self.stats.padding_bytes += padding as u64;
    }

    fn flush_block(&mut self) -> Result<(), IndexError> {
        self.file
            .write_all(&self.block)
            .map_err(|e| IndexError::io(self.file.path(), e))?;
        self.file
            .as_file()
            .sync_all()
            .map_err(|e| IndexError::io(self.file.path(), e))?;

        self.block.clear();
        self.stats.blocks += 1;
        Ok(())
    }
}

impl EntrySink for BlockWriter {
    fn emit(&mut self, entry: &Path) -> Result<(), IndexError> {
        BlockWriter::emit(self, entry)
    }
}

/// A fully written, closed index waiting to be published.
///
/// Dropping it without publishing removes the temporary file.
#[derive(Debug)]
pub struct FinishedIndex {
    temp: TempPath,
    stats: WriterStats,
    verbose: bool,
}

impl FinishedIndex {
    /// Path of the temporary file.
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Atomically rename the temporary file over `destination`.
    ///
    /// Readers see either the previous index or the new one. On failure the
    /// temporary file is kept for inspection and the previous index is left
    /// untouched.
    pub fn publish(self, destination: &Path) -> PublishOutcome {
        let replacing = self.verbose && paths::exists(destination);

        match self.temp.persist(destination) {
            Ok(()) => {
                if self.verbose {
                    info!(path = %destination.display(), replacing, "Published index");
                }
                PublishOutcome::Published {
                    path: destination.to_path_buf(),
                }
            }
            Err(err) => {
                let temp_path = match err.path.keep() {
                    Ok(path) => path,
                    Err(keep_err) => keep_err.path.to_path_buf(),
                };
                if self.verbose {
                    debug!(temp = %temp_path.display(), "Kept unpublished index");
                }
                PublishOutcome::Failed {
                    temp_path,
                    error: err.error,
                }
            }
        }
    }
}

/// Result of the publish step.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The new index replaced the previous one.
    Published { path: PathBuf },
    /// The rename failed; the previous index is still authoritative.
    Failed {
        temp_path: PathBuf,
        error: std::io::Error,
    },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }
}
