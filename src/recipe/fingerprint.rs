// src/recipe/fingerprint.rs

//! Package fingerprint computation
//!
//! The fingerprint is the identity the package manager uses to decide
//! whether two build requests can share the same installed artifact. For a
//! header-only package it must collapse to a constant derived from the
//! identity record alone: two consumers building with different compilers,
//! architectures, build types, or operating systems resolve to the same
//! installed package.

use crate::recipe::format::{PackageSection, Recipe};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Consumer build settings
///
/// Supplied by whoever builds the verification project. All values are
/// opaque strings; they parameterize the consumer build only and never
/// participate in a header-only fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub os: String,
    pub compiler: String,
    pub build_type: String,
    pub arch: String,
}

impl BuildSettings {
    pub fn new(os: &str, compiler: &str, build_type: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            compiler: compiler.to_string(),
            build_type: build_type.to_string(),
            arch: arch.to_string(),
        }
    }

    /// Settings describing the host this process runs on
    pub fn host() -> Self {
        Self::new(std::env::consts::OS, "cc", "Release", std::env::consts::ARCH)
    }
}

/// A derived package identity fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the header-only fingerprint of a package identity
    ///
    /// Only `name` and `version` feed the digest.
    pub fn of(package: &PackageSection) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(package.name.as_bytes());
        hasher.update(b"/");
        hasher.update(package.version.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Compute the fingerprint a consumer with the given settings resolves
    ///
    /// For a header-only recipe the settings are discarded and the result
    /// equals `Fingerprint::of`. A recipe that opts out of the header-only
    /// policy folds the settings into the digest instead.
    pub fn resolve(recipe: &Recipe, settings: &BuildSettings) -> Self {
        if recipe.info.header_only {
            debug!(
                "Header-only fingerprint for {}: ignoring settings {:?}",
                recipe.package.name, settings
            );
            return Self::of(&recipe.package);
        }

        let mut hasher = Sha256::new();
        hasher.update(recipe.package.name.as_bytes());
        hasher.update(b"/");
        hasher.update(recipe.package.version.as_bytes());
        for axis in [&settings.os, &settings.compiler, &settings.build_type, &settings.arch] {
            hasher.update(b"\0");
            hasher.update(axis.as_bytes());
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// The fingerprint as a lowercase hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
