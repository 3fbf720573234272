//! Line-oriented list files: the seed list and the ignore list.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::IndexError;

/// Whether a trimmed line carries content (not blank, not a `#` comment).
pub fn is_content_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Read the content lines of a list file, trimmed, in file order.
pub fn read_list(path: impl AsRef<Path>) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if is_content_line(line) {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

/// The top-level directories an index run starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedList {
    seeds: Vec<PathBuf>,
}

impl SeedList {
    /// Build a seed list from explicit directories.
    pub fn new(seeds: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            seeds: seeds.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the seed list at `path`.
    ///
    /// A missing or unreadable file is an error, and so is a file naming no
    /// directories: either way there is nothing to index.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let lines = read_list(path).map_err(|source| IndexError::SeedList {
            path: path.to_path_buf(),
            source,
        })?;

        if lines.is_empty() {
            return Err(IndexError::NoSeeds {
                path: path.to_path_buf(),
            });
        }
        Ok(Self::new(lines))
    }

    /// Seeds in file order.
    pub fn seeds(&self) -> &[PathBuf] {
        &self.seeds
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

impl IntoIterator for SeedList {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.seeds.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_content_lines() {
        assert!(is_content_line("/home"));
        assert!(!is_content_line(""));
        assert!(!is_content_line("# /home"));
    }

    #[test]
    fn test_seed_list_order_and_filtering() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("indexlist");
        fs::write(&file, "# top level dirs\n/usr\n\n  /home  \n#/tmp\n/opt\n").unwrap();

        let seeds = SeedList::load(&file).unwrap();
        assert_eq!(
            seeds.seeds(),
            [PathBuf::from("/usr"), PathBuf::from("/home"), PathBuf::from("/opt")]
        );
    }

    #[test]
    fn test_missing_seed_list_is_error() {
        let temp = TempDir::new().unwrap();
        let err = SeedList::load(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, IndexError::SeedList { .. }));
    }

    #[test]
    fn test_comment_only_seed_list_is_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("indexlist");
        fs::write(&file, "# nothing yet\n\n").unwrap();

        let err = SeedList::load(&file).unwrap_err();
        assert!(matches!(err, IndexError::NoSeeds { .. }));
    }
}
