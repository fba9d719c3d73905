// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how a header-only library is
//! packaged and what it advertises to dependents. A minimal recipe only
//! needs the `[package]` section; exports, packaging rules, and the
//! include contract all have defaults suited to the common `inc/` layout.

use serde::{Deserialize, Serialize};

/// A complete recipe for packaging a header-only library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package identity metadata
    pub package: PackageSection,

    /// Which source files are eligible for export
    #[serde(default)]
    pub exports: ExportSection,

    /// How exported files are laid out in the package
    #[serde(default)]
    pub packaging: PackagingSection,

    /// What the package advertises to dependents
    #[serde(default)]
    pub info: InfoSection,
}

impl Recipe {
    /// Create a recipe with default rules for the given name and version
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            package: PackageSection {
                name: name.to_string(),
                version: version.to_string(),
                license: None,
                author: None,
                url: None,
                topics: Vec::new(),
            },
            exports: ExportSection::default(),
            packaging: PackagingSection::default(),
            info: InfoSection::default(),
        }
    }

    /// Include directories advertised to dependents
    pub fn includedirs(&self) -> &[String] {
        &self.info.includedirs
    }
}

/// Package identity section
///
/// Created once per release and never mutated after publication. `name`
/// and `version` together are unique within the package manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version (semantic-version-like)
    pub version: String,

    /// License identifier (SPDX)
    #[serde(default)]
    pub license: Option<String>,

    /// Author or maintainer
    #[serde(default)]
    pub author: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub url: Option<String>,

    /// Ordered descriptive tags
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Source export section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    /// Glob patterns selecting exportable files, relative to the source root
    #[serde(default = "default_export_patterns")]
    pub patterns: Vec<String>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            patterns: default_export_patterns(),
        }
    }
}

fn default_export_patterns() -> Vec<String> {
    vec!["inc/*".to_string(), "include/*".to_string()]
}

/// Packaging rules section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingSection {
    /// Ordered copy rules; on a destination conflict the last rule wins
    #[serde(default = "default_copy_rules")]
    pub copy: Vec<CopyRule>,
}

impl Default for PackagingSection {
    fn default() -> Self {
        Self {
            copy: default_copy_rules(),
        }
    }
}

fn default_copy_rules() -> Vec<CopyRule> {
    vec![
        CopyRule {
            pattern: "*.hpp".to_string(),
            src: "inc".to_string(),
            dst: "include".to_string(),
        },
        CopyRule {
            pattern: "*.h".to_string(),
            src: "inc".to_string(),
            dst: "include".to_string(),
        },
    ]
}

/// A single (pattern, source subdirectory, destination subdirectory) rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRule {
    /// Glob pattern matched against paths relative to `src`
    pub pattern: String,

    /// Source subdirectory below the recipe's source root
    #[serde(default = "default_src")]
    pub src: String,

    /// Destination subdirectory below the package root
    #[serde(default = "default_dst")]
    pub dst: String,
}

fn default_src() -> String {
    "inc".to_string()
}

fn default_dst() -> String {
    "include".to_string()
}

/// Dependent-facing package information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoSection {
    /// Directories dependents must add to their header search path
    #[serde(default = "default_includedirs")]
    pub includedirs: Vec<String>,

    /// Header-only fingerprint policy
    ///
    /// When true, the package fingerprint collapses to a constant derived
    /// from the identity alone, independent of any consumer build settings.
    #[serde(default = "default_header_only")]
    pub header_only: bool,
}

impl Default for InfoSection {
    fn default() -> Self {
        Self {
            includedirs: default_includedirs(),
            header_only: default_header_only(),
        }
    }
}

fn default_includedirs() -> Vec<String> {
    vec!["inc".to_string(), "include".to_string()]
}

fn default_header_only() -> bool {
    true
}
