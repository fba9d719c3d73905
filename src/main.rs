// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use galley::recipe::{self, BuildSettings, Fingerprint};
use galley::{Harness, HarnessConfig, PublishConfig};
use tracing::info;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let publish = PublishConfig::from_env();

    match cli.command {
        Commands::Package {
            recipe,
            source,
            output,
        } => {
            let recipe = recipe::parse_recipe_file(&recipe)
                .with_context(|| format!("Failed to load recipe {}", recipe.display()))?;
            for warning in recipe::validate_recipe(&recipe)? {
                tracing::warn!("{}", warning);
            }

            let layout = recipe::package(&recipe, &source, &output)?;
            let fingerprint = Fingerprint::of(&recipe.package);

            info!(
                "Packaged {} ({} files) with fingerprint {}",
                publish.reference(&recipe.package.name, &recipe.package.version),
                layout.file_count(),
                fingerprint
            );
            for dir in layout.dirs() {
                println!("{}/ ({} files)", dir, layout.files_in(dir).len());
            }
            Ok(())
        }
        Commands::Verify {
            recipe,
            project,
            package_root,
            configure,
            build,
            os,
            compiler,
            build_type,
            arch,
            keep_builddir,
        } => {
            let recipe = recipe::parse_recipe_file(&recipe)
                .with_context(|| format!("Failed to load recipe {}", recipe.display()))?;

            let mut config = HarnessConfig::new(&project);
            if let Some(configure) = configure {
                config.configure = configure;
            }
            config.build = build;
            config.settings = BuildSettings::new(&os, &compiler, &build_type, &arch);
            config.package_root = package_root;
            config.keep_builddir = keep_builddir;

            let report = Harness::new(config).verify(&recipe)?;
            println!(
                "OK: {} verified (package id {})",
                publish.reference(&recipe.package.name, &recipe.package.version),
                report.fingerprint
            );
            Ok(())
        }
        Commands::Info { recipe } => {
            let recipe = recipe::parse_recipe_file(&recipe)?;
            let fingerprint = Fingerprint::of(&recipe.package);

            println!("name:        {}", recipe.package.name);
            println!("version:     {}", recipe.package.version);
            if let Some(license) = &recipe.package.license {
                println!("license:     {}", license);
            }
            if let Some(author) = &recipe.package.author {
                println!("author:      {}", author);
            }
            if let Some(url) = &recipe.package.url {
                println!("url:         {}", url);
            }
            if !recipe.package.topics.is_empty() {
                println!("topics:      {}", recipe.package.topics.join(", "));
            }
            println!("includedirs: {}", recipe.includedirs().join(", "));
            println!("header_only: {}", recipe.info.header_only);
            println!("package_id:  {}", fingerprint);
            println!(
                "reference:   {}",
                publish.reference(&recipe.package.name, &recipe.package.version)
            );
            Ok(())
        }
    }
}
