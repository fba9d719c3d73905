// src/recipe/package.rs

//! Source export and package layout construction
//!
//! Exporting copies the recipe's eligible source files into a clean tree;
//! packaging applies the ordered copy rules to place headers into their
//! destination subdirectories. Both are copy operations, the original
//! source tree is never modified.

use crate::error::{Error, Result};
use crate::recipe::format::{CopyRule, Recipe};
use crate::recipe::select;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The files placed into each destination subdirectory of a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageLayout {
    dirs: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl PackageLayout {
    /// Destination subdirectory names, sorted
    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.dirs.keys().map(|s| s.as_str())
    }

    /// Files copied into a destination subdirectory, relative to it
    pub fn files_in(&self, dst: &str) -> Vec<&Path> {
        self.dirs
            .get(dst)
            .map(|set| set.iter().map(|p| p.as_path()).collect())
            .unwrap_or_default()
    }

    /// Total number of packaged files
    pub fn file_count(&self) -> usize {
        self.dirs.values().map(|set| set.len()).sum()
    }

    /// True when no file was placed anywhere
    pub fn is_empty(&self) -> bool {
        self.dirs.values().all(|set| set.is_empty())
    }

    fn insert(&mut self, dst_dir: &str, relative: PathBuf) {
        self.dirs
            .entry(dst_dir.to_string())
            .or_default()
            .insert(relative);
    }
}

/// A single planned copy, with both ends relative to their roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyAction {
    /// Path relative to the source root
    pub src: PathBuf,
    /// Destination subdirectory name (e.g. "include")
    pub dst_dir: String,
    /// Path relative to the destination root
    pub dst: PathBuf,
}

/// Plan the copy actions for a set of rules over a file listing
///
/// Pure: `listing` holds paths relative to the source root, and no
/// filesystem access happens here. Rules are evaluated in order; when two
/// rules target the same destination path, the last rule wins.
pub fn plan(rules: &[CopyRule], listing: &[PathBuf]) -> Result<Vec<CopyAction>> {
    let mut by_dst: BTreeMap<PathBuf, CopyAction> = BTreeMap::new();

    for rule in rules {
        let pattern = select::compile_one(&rule.pattern)?;

        let src_root = Path::new(&rule.src);
        for file in listing {
            let relative = match file.strip_prefix(src_root) {
                Ok(r) => r,
                Err(_) => continue, // outside this rule's source subdirectory
            };
            if !pattern.matches_path(relative) {
                continue;
            }

            let dst = Path::new(&rule.dst).join(relative);
            by_dst.insert(
                dst.clone(),
                CopyAction {
                    src: file.clone(),
                    dst_dir: rule.dst.clone(),
                    dst,
                },
            );
        }
    }

    Ok(by_dst.into_values().collect())
}

/// Export the recipe's eligible sources into `dest_root`
///
/// Applies the export patterns over `source_root` and copies every match,
/// preserving relative paths. Idempotent, and the source tree is left
/// untouched. Returns the copied paths relative to the roots.
pub fn export_sources(recipe: &Recipe, source_root: &Path, dest_root: &Path) -> Result<Vec<PathBuf>> {
    let patterns = select::compile(&recipe.exports.patterns)?;
    let listing = select::snapshot(source_root)?;
    let selected = select::select(&patterns, &listing);

    if selected.is_empty() {
        return Err(Error::Packaging(format!(
            "No files under {} matched any export pattern",
            source_root.display()
        )));
    }

    let mut exported = Vec::with_capacity(selected.len());
    for relative in selected {
        copy_file(&source_root.join(relative), &dest_root.join(relative))?;
        exported.push(relative.clone());
    }

    info!(
        "Exported {} file(s) to {}",
        exported.len(),
        dest_root.display()
    );
    Ok(exported)
}

/// Build the package layout by applying the recipe's copy rules
///
/// Copies matched files from `source_root` into named destination
/// subdirectories under `dest_root`. A missing source root or zero
/// matches across all rules is a `Packaging` error: an empty package is
/// a configuration mistake, not a success.
pub fn package(recipe: &Recipe, source_root: &Path, dest_root: &Path) -> Result<PackageLayout> {
    let listing = select::snapshot(source_root)?;
    let actions = plan(&recipe.packaging.copy, &listing)?;

    if actions.is_empty() {
        return Err(Error::Packaging(format!(
            "No files under {} matched any packaging rule",
            source_root.display()
        )));
    }

    let mut layout = PackageLayout::default();
    for action in &actions {
        copy_file(&source_root.join(&action.src), &dest_root.join(&action.dst))?;
        let relative = action
            .dst
            .strip_prefix(&action.dst_dir)
            .unwrap_or(&action.dst)
            .to_path_buf();
        layout.insert(&action.dst_dir, relative);
        debug!("Packaged {} -> {}", action.src.display(), action.dst.display());
    }

    info!(
        "Packaged {} {} version {}: {} file(s)",
        dest_root.display(),
        recipe.package.name,
        recipe.package.version,
        layout.file_count()
    );
    Ok(layout)
}

/// Copy one file, creating parent directories and overwriting any
/// existing destination
fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst).map_err(|e| {
        Error::Packaging(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            dst.display(),
            e
        ))
    })?;
    Ok(())
}
