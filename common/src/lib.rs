//! Shared filesystem capabilities for the dist-stage crates.
//!
//! The detachment step treats directory creation and file copying as leaf
//! capabilities supplied from outside. This crate provides the seam
//! ([`StagingFs`]), the local implementation ([`LocalFs`]), and the error type
//! both report through ([`FsError`]).
//!
//! # Modules
//!
//! - [`fs`] - Directory initialisation and file copying
//! - `test_support` - Fixture helpers for tests (behind `test-support`)

pub mod fs;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use fs::{FsError, LocalFs, StagingFs};
#[cfg(any(test, feature = "test-support"))]
pub use fs::MockStagingFs;
