// tests/e2e.rs

//! End-to-end packaging and consumer verification scenarios.
//!
//! These tests stand in a small consumer build via shell commands, so the
//! executable-producing scenarios are unix-only.

use galley::recipe::{self, BuildSettings, Fingerprint, Recipe};
use galley::{Error, Harness, HarnessConfig};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

// Verification changes the process working directory; serialize the
// tests that run the harness.
static CWD_LOCK: Mutex<()> = Mutex::new(());

/// A source tree with the canonical single-header layout
fn fpgen_source_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("inc")).unwrap();
    std::fs::write(
        dir.path().join("inc/fpgen.hpp"),
        "// fpgen generator primitives\n",
    )
    .unwrap();
    dir
}

/// Harness whose "build tool" is a shell command producing bin/example
/// with the given exit code
#[cfg(unix)]
fn scripted_harness(project: &Path, exit_code: i32) -> Harness {
    let mut config = HarnessConfig::new(project);
    config.configure = "true".to_string();
    config.build = format!(
        "mkdir -p bin && printf '#!/bin/sh\\nexit {}\\n' > bin/example && chmod +x bin/example",
        exit_code
    );
    Harness::new(config)
}

#[test]
fn package_then_fingerprint_is_settings_independent() {
    let src = fpgen_source_tree();
    let dest = tempfile::tempdir().unwrap();

    let recipe = Recipe::new("fpgen", "1.0.1");
    let layout = recipe::package(&recipe, src.path(), dest.path()).unwrap();

    assert_eq!(layout.file_count(), 1);
    assert_eq!(layout.files_in("include"), vec![Path::new("fpgen.hpp")]);
    assert!(dest.path().join("include/fpgen.hpp").exists());

    // Any two consumers resolve the same installed package
    let gcc = BuildSettings::new("Linux", "gcc", "Release", "x86_64");
    let msvc = BuildSettings::new("Windows", "msvc", "Debug", "x86");
    assert_eq!(
        Fingerprint::resolve(&recipe, &gcc),
        Fingerprint::resolve(&recipe, &msvc)
    );
}

#[cfg(unix)]
#[test]
fn verify_succeeds_when_consumer_exits_zero() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    let report = scripted_harness(project.path(), 0).verify(&recipe).unwrap();
    assert_eq!(report.fingerprint, Fingerprint::of(&recipe.package));
    assert!(report.log.contains("=== configure ==="));
}

#[cfg(unix)]
#[test]
fn verify_reports_verdict_failure_when_consumer_exits_one() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    let result = scripted_harness(project.path(), 1).verify(&recipe);
    assert!(matches!(result, Err(Error::TestVerdict { code: 1 })));
}

#[cfg(unix)]
#[test]
fn verify_reports_execution_error_when_binary_is_missing() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    // Build succeeds but never produces bin/example
    let mut config = HarnessConfig::new(project.path());
    config.configure = "true".to_string();
    config.build = "mkdir -p bin".to_string();

    let result = Harness::new(config).verify(&recipe);
    assert!(matches!(result, Err(Error::TestExecution(_))));
}

#[cfg(unix)]
#[test]
fn build_failure_forecloses_later_stages() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let before = std::env::current_dir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    let mut config = HarnessConfig::new(project.path());
    config.configure = "echo broken configure >&2; exit 2".to_string();
    config.build = "true".to_string();

    let result = Harness::new(config).verify(&recipe);
    match result {
        Err(Error::Build { phase, code, output }) => {
            assert_eq!(phase, "configure");
            assert_eq!(code, Some(2));
            assert!(output.contains("broken configure"));
        }
        other => panic!("expected Build error, got {:?}", other),
    }

    // The sequence never reached execute, so the cwd was never touched
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[cfg(unix)]
#[test]
fn verify_restores_cwd_after_verdict_failure() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let before = std::env::current_dir().unwrap();
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    let result = scripted_harness(project.path(), 1).verify(&recipe);
    assert!(result.is_err());
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[cfg(unix)]
#[test]
fn runtime_artifacts_are_staged_next_to_the_executable() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let project = tempfile::tempdir().unwrap();
    let recipe = Recipe::new("fpgen", "1.0.1");

    let mut config = HarnessConfig::new(project.path());
    config.configure = "true".to_string();
    config.build = "touch libhelper.dylib && mkdir -p bin && \
                    printf '#!/bin/sh\\nexit 0\\n' > bin/example && chmod +x bin/example"
        .to_string();
    config.keep_builddir = true;
    let harness = Harness::new(config);

    let report = harness.verify(&recipe).unwrap();
    assert!(report.runtime_dir.join("libhelper.dylib").exists());
    assert!(report.runtime_dir.join("example").exists());

    // keep_builddir leaves the scratch tree behind; clean it up here
    let build_root: PathBuf = report.runtime_dir.parent().unwrap().to_path_buf();
    std::fs::remove_dir_all(build_root).unwrap();
}

#[test]
fn exported_tree_feeds_packaging() {
    let src = fpgen_source_tree();
    std::fs::write(src.path().join("stray.txt"), "not exported").unwrap();

    let recipe = Recipe::new("fpgen", "1.0.1");
    let exported = tempfile::tempdir().unwrap();
    recipe::export_sources(&recipe, src.path(), exported.path()).unwrap();

    assert!(exported.path().join("inc/fpgen.hpp").exists());
    assert!(!exported.path().join("stray.txt").exists());

    // The exported tree is itself a valid packaging source root
    let dest = tempfile::tempdir().unwrap();
    let layout = recipe::package(&recipe, exported.path(), dest.path()).unwrap();
    assert_eq!(layout.file_count(), 1);
}
