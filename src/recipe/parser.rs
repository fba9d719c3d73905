// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Parse(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns a list of non-fatal warnings. Hard errors (empty identity
/// fields, a version that is not semver, no packaging rules) fail
/// outright.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Parse("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::Parse("Recipe package version cannot be empty".to_string()));
    }

    if semver::Version::parse(&recipe.package.version).is_err() {
        return Err(Error::Parse(format!(
            "Invalid package version '{}': expected a semantic version like 1.0.1",
            recipe.package.version
        )));
    }

    if recipe.packaging.copy.is_empty() {
        return Err(Error::Parse(
            "Recipe declares no packaging copy rules; an empty package is not accepted".to_string(),
        ));
    }

    // Warn about missing metadata
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }
    if recipe.package.url.is_none() {
        warnings.push("Missing package url".to_string());
    }
    if recipe.exports.patterns.is_empty() {
        warnings.push("No export patterns declared; nothing will be exported".to_string());
    }
    if recipe.includedirs().is_empty() {
        warnings.push("No includedirs advertised to dependents".to_string());
    }

    Ok(warnings)
}
