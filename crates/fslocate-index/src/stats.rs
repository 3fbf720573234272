//! Counters collected over an index run.

/// What the walker saw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories written, seeds included.
    pub dirs: u64,
    /// Non-directory entries written.
    pub files: u64,
    /// Paths dropped by ignore rules.
    pub ignored: u64,
    /// Paths that could not be stored as records.
    pub skipped: u64,
}

impl WalkStats {
    /// Entries handed to the writer.
    pub fn entries(&self) -> u64 {
        self.dirs + self.files
    }
}

/// What the block writer produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Records appended.
    pub records: u64,
    /// Blocks flushed to disk.
    pub blocks: u64,
    /// Filler bytes added to complete blocks.
    pub padding_bytes: u64,
}

impl WriterStats {
    /// Total bytes flushed for the given block size.
    pub fn bytes_written(&self, block_size: usize) -> u64 {
        self.blocks * block_size as u64
    }
}

/// Combined statistics for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub walk: WalkStats,
    pub writer: WriterStats,
}
