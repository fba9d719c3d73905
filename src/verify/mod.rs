// src/verify/mod.rs

//! Consumer verification of an installed package
//!
//! Where the recipe side packages the library, this side proves a
//! downstream project can actually use it: resolve the dependency by
//! fingerprint, configure and build a small consumer project, stage any
//! shared runtime artifacts next to the produced binary, then run that
//! binary and report its exit status as the verdict.

mod harness;
mod workdir;

pub use harness::{Harness, HarnessConfig, VerifyReport};
pub use workdir::ScopedWorkdir;
