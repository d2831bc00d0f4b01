//! Errors surfaced by a detachment run.
//!
//! Every failure is fatal to the run. Each variant keeps the original cause as
//! its source and, where one was being processed, names the artifact.

use camino::Utf8PathBuf;
use dist_stage_common::FsError;
use std::io;
use thiserror::Error;

/// Errors that abort a detachment run.
#[derive(Debug, Error)]
pub enum DetachError {
    /// The working directory could not be created.
    #[error("could not initialise working directory {path}")]
    WorkingDirectory {
        /// The configured working directory.
        path: Utf8PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: FsError,
    },

    /// A detached artifact has no file name to stage it under.
    #[error("artifact {artifact} has no file name: {path}")]
    MissingFileName {
        /// Display name of the artifact.
        artifact: String,
        /// The offending path.
        path: Utf8PathBuf,
    },

    /// Copying an artifact into the working directory failed.
    #[error("could not copy artifact {artifact} to the working directory")]
    Copy {
        /// File name of the artifact being copied.
        artifact: String,
        /// The underlying filesystem error.
        #[source]
        source: FsError,
    },

    /// Hashing an artifact or writing one of its sidecars failed.
    #[error("could not sign file: {artifact}")]
    Sign {
        /// File name of the artifact being signed.
        artifact: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DetachError {
    /// Name of the artifact being processed when the run failed, if any.
    #[must_use]
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::WorkingDirectory { .. } => None,
            Self::MissingFileName { artifact, .. }
            | Self::Copy { artifact, .. }
            | Self::Sign { artifact, .. } => Some(artifact),
        }
    }
}

/// Result type alias using [`DetachError`].
pub type Result<T> = std::result::Result<T, DetachError>;
