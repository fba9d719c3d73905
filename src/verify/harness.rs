// src/verify/harness.rs

//! Consumer verification harness
//!
//! The harness drives the three verification stages in strict sequence:
//! build the consumer project against the installed package, stage its
//! runtime artifacts next to the produced binary, then run that binary as
//! the pass/fail gate. A build failure forecloses the later stages.
//!
//! The underlying build tool is a black box invoked through `sh -c`; its
//! diagnostic output is surfaced verbatim, never reinterpreted.

use crate::error::{Error, Result};
use crate::recipe::{select, BuildSettings, Fingerprint, Recipe};
use crate::verify::workdir::ScopedWorkdir;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Configuration for the verification harness
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding the consumer project sources
    pub project_dir: PathBuf,
    /// Configure command, run in the scratch build directory
    pub configure: String,
    /// Build command, run in the scratch build directory
    pub build: String,
    /// Name of the consumer executable the build produces
    pub executable: String,
    /// Runtime staging directory name inside the build directory
    pub runtime_dir: String,
    /// Glob patterns matching shared runtime artifacts to stage
    pub runtime_patterns: Vec<String>,
    /// Consumer build settings; exported to the build environment only
    pub settings: BuildSettings,
    /// Root of the installed package, used to expand the include contract
    pub package_root: Option<PathBuf>,
    /// Keep the scratch build directory after the run (for debugging)
    pub keep_builddir: bool,
}

impl HarnessConfig {
    /// Create a configuration with conventional defaults for a project
    pub fn new(project_dir: &Path) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            configure: format!("cmake \"{}\"", project_dir.display()),
            build: "cmake --build .".to_string(),
            executable: "example".to_string(),
            runtime_dir: "bin".to_string(),
            runtime_patterns: vec!["*.dll".to_string(), "*.dylib".to_string()],
            settings: BuildSettings::host(),
            package_root: None,
            keep_builddir: false,
        }
    }
}

/// Result of a successful verification run
#[derive(Debug)]
pub struct VerifyReport {
    /// Fingerprint the consumer resolved the dependency to
    pub fingerprint: Fingerprint,
    /// Accumulated build tool output
    pub log: String,
    /// Where runtime artifacts were staged and the test executable ran
    ///
    /// Gone after the run unless `keep_builddir` was set.
    pub runtime_dir: PathBuf,
}

/// The verification harness
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    /// Create a new harness with the given configuration
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Run the full verification sequence for a recipe
    ///
    /// Build -> stage runtime -> execute. Each stage must succeed before
    /// the next starts; nothing is retried.
    pub fn verify(&self, recipe: &Recipe) -> Result<VerifyReport> {
        info!(
            "Verifying {} version {}",
            recipe.package.name, recipe.package.version
        );

        let fingerprint = Fingerprint::resolve(recipe, &self.config.settings);
        info!(
            "Resolved dependency {}/{} -> {}",
            recipe.package.name, recipe.package.version, fingerprint
        );

        let scratch = tempfile::Builder::new()
            .prefix("galley-verify-")
            .tempdir()?;
        let mut log = String::new();

        self.build(recipe, &fingerprint, scratch.path(), &mut log)?;
        let runtime_dir = self.stage_runtime(scratch.path(), &mut log)?;
        self.execute(&runtime_dir)?;

        info!("Consumer test passed for {}", recipe.package.name);

        if self.config.keep_builddir {
            let kept = scratch.into_path();
            debug!("Keeping build directory {}", kept.display());
        }

        Ok(VerifyReport {
            fingerprint,
            log,
            runtime_dir,
        })
    }

    /// Configure and compile the consumer project
    ///
    /// Both steps run in `build_dir` with the dependency's fingerprint and
    /// include contract exported through the environment. A non-zero exit
    /// from either step is a `Build` error carrying the tool output.
    pub fn build(
        &self,
        recipe: &Recipe,
        fingerprint: &Fingerprint,
        build_dir: &Path,
        log: &mut String,
    ) -> Result<()> {
        let env = self.build_env(recipe, fingerprint)?;

        self.run_step("configure", &self.config.configure, build_dir, &env, log)?;
        self.run_step("build", &self.config.build, build_dir, &env, log)?;
        Ok(())
    }

    /// Stage shared runtime artifacts next to the consumer executable
    ///
    /// Copies every file under `build_dir` matching a runtime pattern into
    /// the staging directory so the executable resolves its dynamic
    /// dependencies by co-location. Zero matches is not an error; many
    /// consumer builds produce none.
    pub fn stage_runtime(&self, build_dir: &Path, log: &mut String) -> Result<PathBuf> {
        let runtime_dir = build_dir.join(&self.config.runtime_dir);
        fs::create_dir_all(&runtime_dir)?;

        let patterns = select::compile(&self.config.runtime_patterns)?;
        let listing = select::snapshot(build_dir)?;

        let mut staged = 0usize;
        for file in select::select(&patterns, &listing) {
            let name = match file.file_name() {
                Some(n) => n,
                None => continue,
            };
            let src = build_dir.join(file);
            let dst = runtime_dir.join(name);
            if src == dst {
                continue; // already in the staging directory
            }
            fs::copy(&src, &dst)?;
            log.push_str(&format!("Staged {}\n", file.display()));
            staged += 1;
        }

        if staged == 0 {
            debug!("No runtime artifacts matched; staging is best-effort");
        } else {
            info!("Staged {} runtime artifact(s)", staged);
        }

        Ok(runtime_dir)
    }

    /// Run the consumer executable from inside the staging directory
    ///
    /// The directory change is scoped: the prior working directory is
    /// restored on every exit path. A missing or non-spawnable binary is
    /// `TestExecution`; a non-zero exit is `TestVerdict`.
    pub fn execute(&self, runtime_dir: &Path) -> Result<()> {
        let _guard = ScopedWorkdir::enter(runtime_dir)?;

        if !Path::new(&self.config.executable).is_file() {
            return Err(Error::TestExecution(format!(
                "Consumer executable not found: {}",
                runtime_dir.join(&self.config.executable).display()
            )));
        }

        let invocation = format!(".{}{}", std::path::MAIN_SEPARATOR, self.config.executable);
        info!("Running {}", invocation);

        let status = Command::new(&invocation).status().map_err(|e| {
            Error::TestExecution(format!("Failed to run {}: {}", invocation, e))
        })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(Error::TestVerdict { code }),
            None => Err(Error::TestExecution(
                "Consumer test was terminated by a signal".to_string(),
            )),
        }
    }

    /// Environment exported to the configure and build steps
    fn build_env(&self, recipe: &Recipe, fingerprint: &Fingerprint) -> Result<Vec<(String, String)>> {
        let settings = &self.config.settings;
        let mut env = vec![
            ("GALLEY_OS".to_string(), settings.os.clone()),
            ("GALLEY_COMPILER".to_string(), settings.compiler.clone()),
            ("GALLEY_BUILD_TYPE".to_string(), settings.build_type.clone()),
            ("GALLEY_ARCH".to_string(), settings.arch.clone()),
            (
                "GALLEY_REQUIRES".to_string(),
                format!("{}/{}", recipe.package.name, recipe.package.version),
            ),
            ("GALLEY_PACKAGE_ID".to_string(), fingerprint.to_string()),
        ];

        // Expand the include contract against the installed package root
        let dirs: Vec<PathBuf> = recipe
            .includedirs()
            .iter()
            .map(|d| match &self.config.package_root {
                Some(root) => root.join(d),
                None => PathBuf::from(d),
            })
            .collect();
        let joined = std::env::join_paths(&dirs)
            .map_err(|e| Error::Parse(format!("Invalid include directory: {}", e)))?;
        env.push((
            "GALLEY_INCLUDE_DIRS".to_string(),
            joined.to_string_lossy().into_owned(),
        ));

        Ok(env)
    }

    /// Run one external build step, black-box style
    fn run_step(
        &self,
        phase: &str,
        command: &str,
        workdir: &Path,
        env: &[(String, String)],
        log: &mut String,
    ) -> Result<()> {
        info!("Running {} step", phase);
        debug!("Command: {}", command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(workdir)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| Error::Build {
                phase: phase.to_string(),
                code: None,
                output: format!("Failed to invoke '{}': {}", command, e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        log.push_str(&format!("=== {} ===\n", phase));
        if !stdout.is_empty() {
            log.push_str(&stdout);
            log.push('\n');
        }
        if !stderr.is_empty() {
            log.push_str(&stderr);
            log.push('\n');
        }

        if !output.status.success() {
            return Err(Error::Build {
                phase: phase.to_string(),
                code: output.status.code(),
                output: format!("{}{}", stdout, stderr),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::test_lock::CWD_LOCK;

    fn harness_for(dir: &Path) -> Harness {
        Harness::new(HarnessConfig::new(dir))
    }

    #[cfg(unix)]
    fn write_executable(path: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, script).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_stage_runtime_best_effort() {
        let build = tempfile::tempdir().unwrap();
        fs::write(build.path().join("example.o"), "not a shared library").unwrap();

        let harness = harness_for(build.path());
        let mut log = String::new();
        let runtime = harness.stage_runtime(build.path(), &mut log).unwrap();

        assert!(runtime.is_dir());
        let staged = select::snapshot(&runtime).unwrap();
        assert!(staged.is_empty());
    }

    #[test]
    fn test_stage_runtime_copies_shared_libraries() {
        let build = tempfile::tempdir().unwrap();
        fs::write(build.path().join("helper.dll"), "dll").unwrap();
        fs::write(build.path().join("helper.dylib"), "dylib").unwrap();
        fs::write(build.path().join("helper.txt"), "text").unwrap();

        let harness = harness_for(build.path());
        let mut log = String::new();
        let runtime = harness.stage_runtime(build.path(), &mut log).unwrap();

        assert!(runtime.join("helper.dll").exists());
        assert!(runtime.join("helper.dylib").exists());
        assert!(!runtime.join("helper.txt").exists());
    }

    #[test]
    fn test_execute_missing_binary() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = std::env::current_dir().unwrap();

        let runtime = tempfile::tempdir().unwrap();
        let harness = harness_for(runtime.path());
        let result = harness.execute(runtime.path());

        assert!(matches!(result, Err(Error::TestExecution(_))));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_success() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let runtime = tempfile::tempdir().unwrap();
        write_executable(&runtime.path().join("example"), "#!/bin/sh\nexit 0\n");

        let harness = harness_for(runtime.path());
        assert!(harness.execute(runtime.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_verdict_failure_restores_cwd() {
        let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let before = std::env::current_dir().unwrap();

        let runtime = tempfile::tempdir().unwrap();
        write_executable(&runtime.path().join("example"), "#!/bin/sh\nexit 1\n");

        let harness = harness_for(runtime.path());
        let result = harness.execute(runtime.path());

        assert!(matches!(result, Err(Error::TestVerdict { code: 1 })));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_build_failure_surfaces_output() {
        let project = tempfile::tempdir().unwrap();
        let build = tempfile::tempdir().unwrap();

        let mut config = HarnessConfig::new(project.path());
        config.configure = "echo configure diagnostics >&2; exit 3".to_string();
        let harness = Harness::new(config);

        let recipe = Recipe::new("fpgen", "1.0.1");
        let fingerprint = Fingerprint::of(&recipe.package);
        let mut log = String::new();
        let result = harness.build(&recipe, &fingerprint, build.path(), &mut log);

        match result {
            Err(Error::Build { phase, code, output }) => {
                assert_eq!(phase, "configure");
                assert_eq!(code, Some(3));
                assert!(output.contains("configure diagnostics"));
            }
            other => panic!("expected Build error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_env_exports_contract() {
        let project = tempfile::tempdir().unwrap();
        let mut config = HarnessConfig::new(project.path());
        config.settings = BuildSettings::new("Windows", "msvc", "Debug", "x86");
        config.package_root = Some(PathBuf::from("/opt/pkg"));
        let harness = Harness::new(config);

        let recipe = Recipe::new("fpgen", "1.0.1");
        let fingerprint = Fingerprint::of(&recipe.package);
        let env = harness.build_env(&recipe, &fingerprint).unwrap();

        let lookup = |key: &str| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(lookup("GALLEY_OS"), "Windows");
        assert_eq!(lookup("GALLEY_REQUIRES"), "fpgen/1.0.1");
        assert_eq!(lookup("GALLEY_PACKAGE_ID"), fingerprint.to_string());
        assert!(lookup("GALLEY_INCLUDE_DIRS").contains("/opt/pkg"));
    }
}
