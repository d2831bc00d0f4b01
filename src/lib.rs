//! `dist-stage`: detach distribution archives from a build and stage them.
//!
//! The binary reads the build's attached artifacts from a JSON manifest,
//! hands them to [`dist_stage_detach::DetachmentStep`], and writes the
//! remaining artifacts back. This crate holds the pieces around that call:
//! configuration loading, argument parsing, and log setup.

pub mod cli;
pub mod config;
pub mod logging;

pub use cli::Cli;
pub use config::{ConfigError, StageConfig};
