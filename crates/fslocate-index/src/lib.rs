//! Index builder for fslocate.
//!
//! This crate walks a set of seed directories breadth-first, drops paths
//! matching the ignore rules, and writes every remaining path into a
//! block-aligned index file that is then atomically published.
//!
//! # Example
//!
//! ```rust,no_run
//! use fslocate_index::{IndexConfig, Indexer};
//!
//! let config = IndexConfig::builder()
//!     .seed_file("conf/fslocate.indexlist")
//!     .output("db/fslocate.boyer")
//!     .build()
//!     .unwrap();
//!
//! let summary = Indexer::new(config).run().unwrap();
//! println!("Indexed {} entries", summary.stats.walk.entries());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use fslocate_index::{IndexConfig, Indexer};
//!
//! let indexer = Indexer::new(IndexConfig::default());
//! let mut progress_rx = indexer.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Indexed {} entries", progress.total_entries());
//!     }
//! });
//! indexer.run().unwrap();
//! ```

pub mod paths;

mod indexer;
mod progress;
mod stats;
mod walker;
mod writer;

pub use indexer::{IndexSummary, Indexer};
pub use progress::IndexProgress;
pub use stats::{IndexStats, WalkStats, WriterStats};
pub use walker::{EntrySink, Walker};
pub use writer::{BlockWriter, FinishedIndex, PublishOutcome};

// Re-export core types for convenience
pub use fslocate_core::{
    BLOCK_SIZE, IgnoreRules, IndexConfig, IndexError, IndexWarning, RECORD_SEP, SeedList,
    WarningKind,
};
