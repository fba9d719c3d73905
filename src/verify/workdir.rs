// src/verify/workdir.rs

//! Scoped working-directory changes
//!
//! The working directory is the one piece of process-global state the
//! verification harness touches. `ScopedWorkdir` acquires it as a scoped
//! resource: the previous directory is restored when the guard drops, on
//! every exit path, so a failure inside the test invocation cannot leave
//! the process somewhere else.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Guard that restores the previous working directory on drop
#[derive(Debug)]
pub struct ScopedWorkdir {
    previous: PathBuf,
}

impl ScopedWorkdir {
    /// Change into `dir`, remembering the current directory
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir).map_err(|e| {
            Error::TestExecution(format!(
                "Cannot enter runtime directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        debug!("Entered {}", dir.display());
        Ok(Self { previous })
    }

    /// The directory the process was in before entering
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            // Nothing sensible to do beyond reporting; the previous
            // directory may itself have been removed.
            tracing::warn!(
                "Failed to restore working directory to {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
