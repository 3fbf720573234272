//! Ignore rules compiled from the ignore list.
//!
//! Each token in the list becomes a suffix test, a substring test, or both:
//!
//! | Token      | Suffix rule | Substring rule |
//! |------------|-------------|----------------|
//! | `*.o`      | `.o`        |                |
//! | `build/`   | `/build`    | `/build/`      |
//! | `.git`     |             | `/.git`        |
//!
//! Rules are tested against the full path, not just the file name.

use std::path::{MAIN_SEPARATOR_STR, Path};

use crate::error::IndexError;
use crate::format::path_bytes;
use crate::list::{is_content_line, read_list};

/// Compiled ignore rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRules {
    suffix_matches: Vec<String>,
    substring_matches: Vec<String>,
}

impl IgnoreRules {
    /// Rules that ignore nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile rules from raw list lines. Blank and `#` lines are skipped.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::new();
        for line in lines {
            let token = line.as_ref().trim();
            if is_content_line(token) {
                rules.add_token(token);
            }
        }
        rules
    }

    /// Load and compile the ignore list at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let lines = read_list(path).map_err(|e| IndexError::io(path, e))?;
        Ok(Self::parse(lines))
    }

    /// Classify a single token.
    pub fn add_token(&mut self, token: &str) {
        if let Some(suffix) = token.strip_prefix('*') {
            self.suffix_matches.push(suffix.to_string());
        } else if let Some(dir) = token.strip_suffix('/') {
            self.suffix_matches.push(ensure_separator_prefix(dir));
            self.substring_matches.push(ensure_separator_prefix(token));
        } else {
            self.substring_matches.push(ensure_separator_prefix(token));
        }
    }

    /// Whether `path` matches any rule.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let bytes = path_bytes(path);
        let bytes = bytes.as_ref();

        self.suffix_matches
            .iter()
            .any(|suffix| bytes.ends_with(suffix.as_bytes()))
            || self
                .substring_matches
                .iter()
                .any(|pattern| contains(bytes, pattern.as_bytes()))
    }

    /// Suffix rules in insertion order.
    pub fn suffix_matches(&self) -> &[String] {
        &self.suffix_matches
    }

    /// Substring rules in insertion order.
    pub fn substring_matches(&self) -> &[String] {
        &self.substring_matches
    }

    /// True if no rule was compiled.
    pub fn is_empty(&self) -> bool {
        self.suffix_matches.is_empty() && self.substring_matches.is_empty()
    }

    /// Total number of compiled rules.
    pub fn len(&self) -> usize {
        self.suffix_matches.len() + self.substring_matches.len()
    }
}

fn ensure_separator_prefix(s: &str) -> String {
    if s.starts_with(MAIN_SEPARATOR_STR) {
        s.to_string()
    } else {
        format!("{MAIN_SEPARATOR_STR}{s}")
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_star_token_is_suffix() {
        let rules = IgnoreRules::parse(["*.tmp"]);
        assert_eq!(rules.suffix_matches(), [".tmp"]);
        assert!(rules.substring_matches().is_empty());

        assert!(rules.is_ignored(Path::new("/a/x.tmp")));
        assert!(!rules.is_ignored(Path::new("/a/x.tmpl")));
    }

    #[test]
    fn test_slash_token_is_suffix_and_substring() {
        let rules = IgnoreRules::parse(["build/"]);
        assert_eq!(rules.suffix_matches(), ["/build"]);
        assert_eq!(rules.substring_matches(), ["/build/"]);

        assert!(rules.is_ignored(Path::new("/b/build")));
        assert!(rules.is_ignored(Path::new("/b/build/o.bin")));
        assert!(!rules.is_ignored(Path::new("/b/rebuild")));
        assert!(!rules.is_ignored(Path::new("/b/builder")));
    }

    #[test]
    fn test_plain_token_matches_segment_start() {
        let rules = IgnoreRules::parse(["foo", "/proc"]);
        assert_eq!(rules.substring_matches(), ["/foo", "/proc"]);

        assert!(rules.is_ignored(Path::new("/x/foo")));
        assert!(rules.is_ignored(Path::new("/x/foobar")));
        assert!(!rules.is_ignored(Path::new("/x/barfoo")));
        assert!(rules.is_ignored(Path::new("/proc/self")));
    }

    #[test]
    fn test_comments_and_blanks_skipped() {
        let rules = IgnoreRules::parse(["# comment", "", "   ", "  *.o  "]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.suffix_matches(), [".o"]);
    }

    #[test]
    fn test_empty_rules_ignore_nothing() {
        let rules = IgnoreRules::new();
        assert!(rules.is_empty());
        assert!(!rules.is_ignored(Path::new("/anything/at/all")));
    }
}
