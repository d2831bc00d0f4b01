//! JSON manifest of the artifacts a build attached to its output set.
//!
//! The manifest is how a host hands its attached-artifact collection to the
//! detachment step and receives the remainder back:
//!
//! ```json
//! {
//!   "artifacts": [
//!     { "path": "target/foo-1.0.jar", "type": "jar", "name": "foo" },
//!     { "path": "target/foo-1.0-src.zip", "type": "zip", "name": "foo" }
//!   ]
//! }
//! ```
//!
//! Paths are kept exactly as written. A relative `path` is resolved against
//! the process's current directory when the step opens it, not against the
//! directory holding the manifest, so a manifest at `target/artifacts.json`
//! listing `"foo.zip"` refers to `./foo.zip`. Hosts that write manifests
//! outside the build root should list absolute paths.

use crate::artifact::Artifact;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use thiserror::Error;

/// Errors raised while reading or writing an artifact manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("could not read artifact manifest {path}")]
    Read {
        /// Manifest path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid JSON or does not match the schema.
    #[error("invalid artifact manifest {path}")]
    Parse {
        /// Manifest path.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest could not be serialised.
    #[error("could not serialise artifact manifest")]
    Serialize(#[source] serde_json::Error),

    /// The manifest file could not be written.
    #[error("could not write artifact manifest {path}")]
    Write {
        /// Manifest path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// The attached-artifact collection of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactManifest {
    /// Attached artifacts, in attachment order.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl ArtifactManifest {
    /// Wrap an artifact list.
    #[must_use]
    pub const fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if the text does not match the schema.
    /// `origin` is used only to label the error.
    pub fn from_json(json: &str, origin: &Utf8Path) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|source| ManifestError::Parse {
            path: origin.to_owned(),
            source,
        })
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] if the file cannot be read, or
    /// [`ManifestError::Parse`] if its content is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let json = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Render the manifest as pretty-printed JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, ManifestError> {
        let mut json = serde_json::to_string_pretty(self).map_err(ManifestError::Serialize)?;
        json.push('\n');
        Ok(json)
    }

    /// Write the manifest to `path`, replacing its previous content.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Serialize`] or [`ManifestError::Write`].
    pub fn save(&self, path: &Utf8Path) -> Result<(), ManifestError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ManifestError::Write {
            path: path.to_owned(),
            source,
        })
    }
}
