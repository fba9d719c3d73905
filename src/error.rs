// src/error.rs

//! Error types for packaging and consumer verification
//!
//! The four operational failure kinds are kept distinct so a host driving
//! a packaging/verification run can tell them apart:
//! - `Packaging`: source selection or copy failed (missing root, zero matches)
//! - `Build`: the external configure/build tool exited non-zero
//! - `TestExecution`: the consumer executable was missing or not invokable
//! - `TestVerdict`: the consumer executable ran and signaled failure

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while packaging a recipe or verifying a consumer build
#[derive(Error, Debug)]
pub enum Error {
    /// Source selection or copy failure
    #[error("packaging error: {0}")]
    Packaging(String),

    /// External configure/build tool failed
    ///
    /// The tool's diagnostic output is carried verbatim in `output`.
    #[error("{phase} failed with exit code {code:?}\n{output}")]
    Build {
        phase: String,
        code: Option<i32>,
        output: String,
    },

    /// Consumer executable missing or not runnable
    #[error("test execution error: {0}")]
    TestExecution(String),

    /// Consumer executable ran but exited non-zero
    #[error("consumer test failed with exit code {code}")]
    TestVerdict { code: i32 },

    /// Recipe file could not be parsed or validated
    #[error("parse error: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
