// src/cli.rs

//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "galley")]
#[command(author, version, about = "Package and verify header-only libraries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a recipe's sources into a distributable layout
    Package {
        /// Path to the recipe file
        #[arg(short, long, default_value = "galley.toml")]
        recipe: PathBuf,
        /// Source root the recipe's rules are evaluated against
        #[arg(short, long, default_value = ".")]
        source: PathBuf,
        /// Destination root for the package layout
        #[arg(short, long, default_value = "package")]
        output: PathBuf,
    },
    /// Build and run a consumer project against the packaged library
    Verify {
        /// Path to the recipe file
        #[arg(short, long, default_value = "galley.toml")]
        recipe: PathBuf,
        /// Directory holding the consumer project sources
        #[arg(short, long)]
        project: PathBuf,
        /// Root of the installed package (expands the include contract)
        #[arg(long)]
        package_root: Option<PathBuf>,
        /// Configure command (defaults to cmake over the project dir)
        #[arg(long)]
        configure: Option<String>,
        /// Build command
        #[arg(long, default_value = "cmake --build .")]
        build: String,
        /// Consumer build settings: operating system
        #[arg(long, default_value_t = std::env::consts::OS.to_string())]
        os: String,
        /// Consumer build settings: compiler
        #[arg(long, default_value = "cc")]
        compiler: String,
        /// Consumer build settings: build type
        #[arg(long, default_value = "Release")]
        build_type: String,
        /// Consumer build settings: architecture
        #[arg(long, default_value_t = std::env::consts::ARCH.to_string())]
        arch: String,
        /// Keep the scratch build directory for debugging
        #[arg(long)]
        keep_builddir: bool,
    },
    /// Show a recipe's identity, include contract, and fingerprint
    Info {
        /// Path to the recipe file
        #[arg(short, long, default_value = "galley.toml")]
        recipe: PathBuf,
    },
}
