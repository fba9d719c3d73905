// src/recipe/select.rs

//! Glob-driven source selection
//!
//! Selection is a pure function from a file listing to the subset matching
//! a set of glob patterns. The listing is injected, so selection logic is
//! testable without touching a real filesystem; `snapshot` produces the
//! listing for an on-disk tree. Matching is case-sensitive.

use crate::error::{Error, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compile a single glob pattern string
pub fn compile_one(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern)
        .map_err(|e| Error::Parse(format!("Invalid glob pattern '{}': {}", pattern, e)))
}

/// Compile a list of glob pattern strings
pub fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns.iter().map(|p| compile_one(p)).collect()
}

/// Select the files from `listing` that match at least one pattern
///
/// Paths in `listing` are expected to be relative to the root the patterns
/// were written against. This is an allow-list: unmatched files are
/// excluded, never the other way around.
pub fn select<'a>(patterns: &[Pattern], listing: &'a [PathBuf]) -> Vec<&'a PathBuf> {
    listing
        .iter()
        .filter(|file| patterns.iter().any(|p| p.matches_path(file)))
        .collect()
}

/// Take a snapshot of the regular files under `root`
///
/// Returns paths relative to `root`, sorted for determinism. A missing
/// root is a `Packaging` error; the caller decides whether an empty
/// snapshot is acceptable.
pub fn snapshot(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::Packaging(format!(
            "Source root does not exist: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            Error::Packaging(format!("Failed to walk {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
