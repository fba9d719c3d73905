// src/recipe/mod.rs

//! Recipe system for packaging a header-only library
//!
//! A recipe declares:
//! - Package identity (name, version, license, author, url, topics)
//! - Export patterns selecting which source files leave the source tree
//! - Copy rules placing headers into the package layout
//! - The include contract advertised to dependents
//! - The header-only fingerprint policy
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "fpgen"
//! version = "1.0.1"
//! license = "MIT"
//! topics = ["coroutines", "generators", "header-only"]
//! ```
//!
//! Exports, copy rules, and includedirs default to the conventional
//! `inc/` and `include/` layout, so a minimal recipe is just the
//! `[package]` section.

pub mod fingerprint;
mod format;
pub mod package;
mod parser;
pub mod select;

pub use fingerprint::{BuildSettings, Fingerprint};
pub use format::{CopyRule, ExportSection, InfoSection, PackageSection, PackagingSection, Recipe};
pub use package::{export_sources, package, plan, CopyAction, PackageLayout};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
