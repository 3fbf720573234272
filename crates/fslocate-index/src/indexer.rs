//! One complete index run: seeds, ignore rules, walk, write, publish.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::{info, warn};

use fslocate_core::{IgnoreRules, IndexConfig, IndexError, IndexWarning, SeedList};

use crate::progress::IndexProgress;
use crate::stats::IndexStats;
use crate::walker::Walker;
use crate::writer::{BlockWriter, PublishOutcome};

/// Builds and publishes a full index according to an [`IndexConfig`].
pub struct Indexer {
    config: IndexConfig,
    progress_tx: broadcast::Sender<IndexProgress>,
}

impl Indexer {
    pub fn new(config: IndexConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config,
            progress_tx,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Subscribe to index progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<IndexProgress> {
        self.progress_tx.subscribe()
    }

    /// Run a full re-index.
    ///
    /// Errors are fatal and leave the published index untouched; the partial
    /// temporary file is removed. A failed publish is not an error: it is
    /// reported through [`IndexSummary::outcome`].
    pub fn run(&self) -> Result<IndexSummary, IndexError> {
        let start = Instant::now();
        let config = &self.config;

        let seeds = SeedList::load(&config.seed_file)?;
        let mut warnings = Vec::new();
        let rules = self.load_ignore_rules(&mut warnings);

        let mut writer = BlockWriter::create(&config.output, config.block_size, config.verbose)?;
        let mut walker = Walker::new(&rules, config.verbose).with_progress(self.progress_tx.clone());
        walker.walk(seeds, &mut writer)?;

        let walk_stats = walker.stats();
        // Dropping the writer removes the temp file; the old index stays.
        if walk_stats.entries() == 0 {
            return Err(IndexError::NoEntries {
                path: config.seed_file.clone(),
            });
        }
        warnings.extend(walker.into_warnings());

        let finished = writer.finish()?;
        let writer_stats = finished.stats();
        let outcome = finished.publish(&config.output);

        let duration = start.elapsed();
        if config.verbose {
            info!(
                entries = walk_stats.entries(),
                ignored = walk_stats.ignored,
                blocks = writer_stats.blocks,
                elapsed_ms = duration.as_millis() as u64,
                "Index run complete"
            );
        }

        Ok(IndexSummary {
            output: config.output.clone(),
            outcome,
            stats: IndexStats {
                walk: walk_stats,
                writer: writer_stats,
            },
            warnings,
            duration,
        })
    }

    fn load_ignore_rules(&self, warnings: &mut Vec<IndexWarning>) -> IgnoreRules {
        let path = &self.config.ignore_file;
        match IgnoreRules::load(path) {
            Ok(rules) => {
                if self.config.verbose {
                    info!(rules = rules.len(), path = %path.display(), "Loaded ignore patterns");
                }
                rules
            }
            Err(err) => {
                let warning = IndexWarning::missing_ignore_file(path, &err);
                warn!("{}", warning.message);
                warnings.push(warning);
                IgnoreRules::new()
            }
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct IndexSummary {
    /// Where the index was to be published.
    pub output: PathBuf,
    /// Whether the new index replaced the old one.
    pub outcome: PublishOutcome,
    pub stats: IndexStats,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<IndexWarning>,
    pub duration: Duration,
}

impl IndexSummary {
    pub fn is_published(&self) -> bool {
        self.outcome.is_published()
    }

    /// Size of the new index file in bytes.
    pub fn bytes_written(&self, block_size: usize) -> u64 {
        self.stats.writer.bytes_written(block_size)
    }
}
