//! Index configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::format::BLOCK_SIZE;

/// Default location of the seed list.
pub const DEFAULT_SEED_FILE: &str = "conf/fslocate.indexlist";

/// Default location of the ignore list.
pub const DEFAULT_IGNORE_FILE: &str = "conf/fslocate.ignore";

/// Default location of the published index.
pub const DEFAULT_OUTPUT_FILE: &str = "db/fslocate.boyer";

/// Configuration for one indexing run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct IndexConfig {
    /// File listing the top-level directories to index.
    #[builder(default = "PathBuf::from(DEFAULT_SEED_FILE)")]
    #[serde(default = "default_seed_file")]
    pub seed_file: PathBuf,

    /// File listing ignore tokens. May be absent.
    #[builder(default = "PathBuf::from(DEFAULT_IGNORE_FILE)")]
    #[serde(default = "default_ignore_file")]
    pub ignore_file: PathBuf,

    /// Where the finished index is published.
    #[builder(default = "PathBuf::from(DEFAULT_OUTPUT_FILE)")]
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Block size in bytes. Readers must use the same value.
    #[builder(default = "BLOCK_SIZE")]
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Print progress while indexing.
    #[builder(default = "false")]
    #[serde(default)]
    pub verbose: bool,
}

fn default_seed_file() -> PathBuf {
    PathBuf::from(DEFAULT_SEED_FILE)
}

fn default_ignore_file() -> PathBuf {
    PathBuf::from(DEFAULT_IGNORE_FILE)
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_block_size() -> usize {
    BLOCK_SIZE
}

impl IndexConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.block_size == Some(0) {
            return Err("Block size must be greater than zero".to_string());
        }
        if let Some(ref output) = self.output {
            if output.as_os_str().is_empty() {
                return Err("Output path cannot be empty".to_string());
            }
        }
        if let Some(ref seeds) = self.seed_file {
            if seeds.as_os_str().is_empty() {
                return Err("Seed file path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl IndexConfig {
    /// Create a new index config builder.
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Create a config using the default file locations.
    pub fn new() -> Self {
        Self {
            seed_file: default_seed_file(),
            ignore_file: default_ignore_file(),
            output: default_output(),
            block_size: BLOCK_SIZE,
            verbose: false,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}
