//! Index progress reporting.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Progress information during an index run.
#[derive(Debug, Clone)]
pub struct IndexProgress {
    /// Directories written so far.
    pub dirs_indexed: u64,
    /// Files written so far.
    pub files_indexed: u64,
    /// Paths dropped by ignore rules.
    pub entries_ignored: u64,
    /// Most recent path written.
    pub current_path: PathBuf,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl IndexProgress {
    /// Get total entries written (files + dirs).
    pub fn total_entries(&self) -> u64 {
        self.files_indexed + self.dirs_indexed
    }
}

/// Running counters with timing, snapshotted into [`IndexProgress`].
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    dirs_indexed: u64,
    files_indexed: u64,
    entries_ignored: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            dirs_indexed: 0,
            files_indexed: 0,
            entries_ignored: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record_dir(&mut self, path: &Path) {
        self.dirs_indexed += 1;
        self.current_path = path.to_path_buf();
    }

    pub fn record_file(&mut self, path: &Path) {
        self.files_indexed += 1;
        self.current_path = path.to_path_buf();
    }

    pub fn record_ignored(&mut self) {
        self.entries_ignored += 1;
    }

    pub fn total_entries(&self) -> u64 {
        self.dirs_indexed + self.files_indexed
    }

    pub fn snapshot(&self) -> IndexProgress {
        IndexProgress {
            dirs_indexed: self.dirs_indexed,
            files_indexed: self.files_indexed,
            entries_ignored: self.entries_ignored,
            current_path: self.current_path.clone(),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
