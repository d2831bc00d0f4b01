//! Detachment of distribution archives from a build's artifact set.
//!
//! During the verify phase a build may have attached source and binary
//! bundles (`zip`, `tar.gz`) and their detached signatures (`zip.asc`,
//! `tar.gz.asc`). These must not be published through the normal release
//! channel. The [`step::DetachmentStep`] removes them from the attached set,
//! copies them into a working directory, and writes `.md5` and `.sha1`
//! sidecars for every archive that is not a signature.
//!
//! # Modules
//!
//! - [`artifact`] - Build artifacts and the recognised distribution types
//! - [`checksum`] - Single-pass MD5/SHA-1 hashing and sidecar files
//! - [`error`] - Errors surfaced by a detachment run
//! - [`manifest`] - JSON manifest of attached artifacts
//! - [`step`] - The detachment step itself

pub mod artifact;
pub mod checksum;
pub mod error;
pub mod manifest;
pub mod step;

pub use artifact::{Artifact, DistributionType};
pub use checksum::{Checksums, DigestAlgorithm, HexDigest};
pub use error::{DetachError, Result};
pub use manifest::{ArtifactManifest, ManifestError};
pub use step::{DetachmentReport, DetachmentStep, PlanEntry, Sidecar, StepConfig};
