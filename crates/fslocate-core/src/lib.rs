//! Core types for fslocate.
//!
//! This crate provides the index file format, the run configuration, error
//! types, and the parsers for the seed and ignore lists.

pub mod format;

mod config;
mod error;
mod ignore;
mod list;

pub use config::{
    DEFAULT_IGNORE_FILE, DEFAULT_OUTPUT_FILE, DEFAULT_SEED_FILE, IndexConfig, IndexConfigBuilder,
};
pub use error::{IndexError, IndexWarning, WarningKind};
pub use format::{BLOCK_SIZE, RECORD_SEP};
pub use ignore::IgnoreRules;
pub use list::{SeedList, read_list};
