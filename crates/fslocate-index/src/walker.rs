//! Breadth-first directory walker.

use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use fslocate_core::{IgnoreRules, IndexError, IndexWarning};

use crate::paths;
use crate::progress::{IndexProgress, ProgressTracker};
use crate::stats::WalkStats;

/// How often (in entries) a progress snapshot is broadcast.
const PROGRESS_INTERVAL: u64 = 1000;

/// Consumer of the ordered entry stream.
pub trait EntrySink {
    /// Accept one entry.
    fn emit(&mut self, entry: &Path) -> Result<(), IndexError>;
}

impl EntrySink for Vec<PathBuf> {
    fn emit(&mut self, entry: &Path) -> Result<(), IndexError> {
        self.push(entry.to_path_buf());
        Ok(())
    }
}

/// Walks the tree below a set of seed directories, level by level.
///
/// Each directory is emitted before its children. Files are emitted as they
/// are listed; subdirectories are queued, so every directory at one depth is
/// listed before any directory one level deeper. Any listing failure aborts
/// the walk.
pub struct Walker<'a> {
    rules: &'a IgnoreRules,
    verbose: bool,
    tracker: ProgressTracker,
    skipped: u64,
    warnings: Vec<IndexWarning>,
    progress_tx: Option<broadcast::Sender<IndexProgress>>,
}

impl<'a> Walker<'a> {
    pub fn new(rules: &'a IgnoreRules, verbose: bool) -> Self {
        Self {
            rules,
            verbose,
            tracker: ProgressTracker::new(),
            skipped: 0,
            warnings: Vec::new(),
            progress_tx: None,
        }
    }

    /// Broadcast progress snapshots on `tx` while walking.
    pub fn with_progress(mut self, tx: broadcast::Sender<IndexProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Walk from `seeds` in order, emitting every retained path into `sink`.
    ///
    /// Seeds themselves are not checked against the ignore rules.
    pub fn walk<S>(
        &mut self,
        seeds: impl IntoIterator<Item = PathBuf>,
        sink: &mut S,
    ) -> Result<(), IndexError>
    where
        S: EntrySink + ?Sized,
    {
        let mut queue: VecDeque<PathBuf> = seeds.into_iter().collect();
        if self.verbose {
            info!(count = queue.len(), "Read in top level entries");
        }

        while let Some(dir) = queue.pop_front() {
            if !paths::is_indexable(&dir) {
                self.skip(&dir);
                continue;
            }
            if self.verbose {
                info!(dir = %dir.display(), "Processing dir");
            }
            sink.emit(&dir)?;
            self.tracker.record_dir(&dir);
            self.maybe_send_progress();

            for (name, is_dir) in list_children(&dir)? {
                let path = paths::join(&dir, &name);

                if self.rules.is_ignored(&path) {
                    if self.verbose {
                        debug!(path = %path.display(), "Ignoring");
                    }
                    self.tracker.record_ignored();
                    continue;
                }

                if is_dir {
                    queue.push_back(path);
                } else if paths::is_indexable(&path) {
                    if self.verbose {
                        debug!(path = %path.display(), "Writing entry");
                    }
                    sink.emit(&path)?;
                    self.tracker.record_file(&path);
                    self.maybe_send_progress();
                } else {
                    self.skip(&path);
                }
            }
        }

        self.send_progress();
        Ok(())
    }

    pub fn stats(&self) -> WalkStats {
        let progress = self.tracker.snapshot();
        WalkStats {
            dirs: progress.dirs_indexed,
            files: progress.files_indexed,
            ignored: progress.entries_ignored,
            skipped: self.skipped,
        }
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[IndexWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<IndexWarning> {
        self.warnings
    }

    fn skip(&mut self, path: &Path) {
        let warning = IndexWarning::unindexable(path);
        warn!("{}", warning.message);
        self.warnings.push(warning);
        self.skipped += 1;
    }

    fn maybe_send_progress(&self) {
        if self.tracker.total_entries() % PROGRESS_INTERVAL == 0 {
            self.send_progress();
        }
    }

    fn send_progress(&self) {
        if let Some(tx) = &self.progress_tx {
            // No receivers is fine.
            let _ = tx.send(self.tracker.snapshot());
        }
    }
}

/// List the immediate children of `dir`, sorted by name.
///
/// Symlinks are reported with their own type, so a link to a directory is
/// treated as a leaf and never followed.
fn list_children(dir: &Path) -> Result<Vec<(OsString, bool)>, IndexError> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| IndexError::io(dir, e))? {
        let entry = entry.map_err(|e| IndexError::io(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| IndexError::io(entry.path(), e))?;
        children.push((entry.file_name(), file_type.is_dir()));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("a/deep/deeper")).unwrap();
        fs::create_dir_all(root.join("b/build")).unwrap();
        fs::write(root.join("a/x.tmp"), "").unwrap();
        fs::write(root.join("a/keep.txt"), "").unwrap();
        fs::write(root.join("a/deep/d.txt"), "").unwrap();
        fs::write(root.join("a/deep/deeper/e.txt"), "").unwrap();
        fs::write(root.join("b/build/o.bin"), "").unwrap();
        fs::write(root.join("b/z.txt"), "").unwrap();

        temp
    }

    fn rel(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_breadth_first_order() {
        let temp = create_test_tree();
        let root = temp.path();
        let rules = IgnoreRules::new();

        let mut out: Vec<PathBuf> = Vec::new();
        let mut walker = Walker::new(&rules, false);
        walker.walk([root.join("a"), root.join("b")], &mut out).unwrap();

        assert_eq!(
            rel(root, &out),
            [
                "a",
                "a/keep.txt",
                "a/x.tmp",
                "b",
                "b/z.txt",
                "a/deep",
                "a/deep/d.txt",
                "b/build",
                "b/build/o.bin",
                "a/deep/deeper",
                "a/deep/deeper/e.txt",
            ]
        );
        let stats = walker.stats();
        assert_eq!(stats.dirs, 5);
        assert_eq!(stats.files, 6);
        assert_eq!(stats.ignored, 0);
    }

    #[test]
    fn test_ignore_rules_prune_subtrees() {
        let temp = create_test_tree();
        let root = temp.path();
        let rules = IgnoreRules::parse(["*.tmp", "build/", "deeper"]);

        let mut out: Vec<PathBuf> = Vec::new();
        let mut walker = Walker::new(&rules, false);
        walker.walk([root.join("a"), root.join("b")], &mut out).unwrap();

        assert_eq!(
            rel(root, &out),
            ["a", "a/keep.txt", "b", "b/z.txt", "a/deep", "a/deep/d.txt"]
        );
        assert_eq!(walker.stats().ignored, 3);
    }

    #[test]
    fn test_symlinked_dir_is_leaf() {
        let temp = create_test_tree();
        let root = temp.path();
        std::os::unix::fs::symlink(root.join("b"), root.join("a/link")).unwrap();
        let rules = IgnoreRules::parse(["deep/"]);

        let mut out: Vec<PathBuf> = Vec::new();
        Walker::new(&rules, false)
            .walk([root.join("a")], &mut out)
            .unwrap();

        assert_eq!(rel(root, &out), ["a", "a/keep.txt", "a/link", "a/x.tmp"]);
    }

    #[test]
    fn test_symlinked_seed_is_listed() {
        let temp = create_test_tree();
        let root = temp.path();
        std::os::unix::fs::symlink(root.join("b"), root.join("seed")).unwrap();
        let rules = IgnoreRules::new();

        let mut out: Vec<PathBuf> = Vec::new();
        Walker::new(&rules, false)
            .walk([root.join("seed")], &mut out)
            .unwrap();

        assert_eq!(
            rel(root, &out),
            ["seed", "seed/z.txt", "seed/build", "seed/build/o.bin"]
        );
    }

    #[test]
    fn test_unlistable_seed_is_fatal() {
        let temp = TempDir::new().unwrap();
        let rules = IgnoreRules::new();

        let mut out: Vec<PathBuf> = Vec::new();
        let err = Walker::new(&rules, false)
            .walk([temp.path().join("missing")], &mut out)
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound { .. }));
    }

    #[test]
    fn test_record_separator_in_name_is_skipped() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("bad\u{1e}name"), "").unwrap();
        fs::write(root.join("good"), "").unwrap();
        let rules = IgnoreRules::new();

        let mut out: Vec<PathBuf> = Vec::new();
        let mut walker = Walker::new(&rules, false);
        walker.walk([root.to_path_buf()], &mut out).unwrap();

        assert_eq!(out, vec![root.to_path_buf(), root.join("good")]);
        assert_eq!(walker.stats().skipped, 1);
        assert_eq!(walker.warnings().len(), 1);
    }

    #[test]
    fn test_progress_broadcast_at_end() {
        let temp = create_test_tree();
        let rules = IgnoreRules::new();
        let (tx, mut rx) = broadcast::channel(16);

        let mut out: Vec<PathBuf> = Vec::new();
        Walker::new(&rules, false)
            .with_progress(tx)
            .walk([temp.path().join("a")], &mut out)
            .unwrap();

        let last = rx.try_recv().unwrap();
        assert_eq!(last.total_entries(), out.len() as u64);
    }
}
