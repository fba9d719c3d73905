// src/lib.rs

//! Galley
//!
//! A small recipe kitchen for header-only libraries: packages a source
//! tree into a distributable layout with a settings-independent
//! fingerprint, then verifies the result by building and running a
//! consumer project against it.
//!
//! # Architecture
//!
//! - Recipes are TOML files: identity, export patterns, copy rules, and
//!   the include contract advertised to dependents
//! - Source selection is a pure glob evaluation over a filesystem
//!   snapshot, allow-list semantics
//! - The fingerprint of a header-only package collapses to its identity,
//!   so every consumer resolves the same installed artifact regardless of
//!   compiler, architecture, build type, or operating system
//! - Verification runs build -> stage -> execute in strict sequence, with
//!   the working-directory change scoped to the test invocation

pub mod config;
mod error;
pub mod recipe;
pub mod verify;

pub use config::PublishConfig;
pub use error::{Error, Result};
pub use recipe::{
    export_sources, package, parse_recipe, parse_recipe_file, validate_recipe, BuildSettings,
    CopyRule, Fingerprint, PackageLayout, PackageSection, Recipe,
};
pub use verify::{Harness, HarnessConfig, ScopedWorkdir, VerifyReport};
