//! Integration layers for the systems `deploy` talks to.
//!
//! - [`git`]: the version-control gateway (working tree status, branches,
//!   checkout, push, remotes)
//! - [`prompt`]: interactive yes/no confirmation
//!
//! Each submodule provides trait-based abstractions with real and mock implementations
//! to support both production use and testing.

pub mod git;
pub mod prompt;
