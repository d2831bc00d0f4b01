//! The detachment step.
//!
//! A run is a straight sequence: select the distribution archives from the
//! attached set, remove them, make sure the working directory exists, copy
//! each archive into it, then write MD5 and SHA-1 sidecars for every archive
//! that is not a signature. The first failure ends the run; files already
//! written stay where they are and a re-run overwrites them.

use crate::artifact::Artifact;
use crate::checksum::{
    DigestAlgorithm, HexDigest, compute_checksums, sidecar_path, write_sidecar,
};
use crate::error::{DetachError, Result};
use camino::Utf8PathBuf;
use dist_stage_common::{LocalFs, StagingFs};
use log::{debug, info};

/// Settings for one detachment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfig {
    /// Directory the detached artifacts and their sidecars are written to.
    pub working_directory: Utf8PathBuf,
    /// Where the downstream upload step publishes the working directory.
    ///
    /// Carried for that step; detachment itself never contacts it.
    pub staging_url: String,
}

/// Where one detached artifact ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// The detached artifact.
    pub artifact: Artifact,
    /// File name shared by the original and the copy.
    pub file_name: String,
    /// Path of the copy inside the working directory.
    pub destination: Utf8PathBuf,
    /// Sidecars to write, empty for signature files.
    pub sidecars: Vec<(DigestAlgorithm, Utf8PathBuf)>,
}

/// A checksum sidecar written during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    /// File name of the artifact the digest describes.
    pub artifact: String,
    /// The digest written to the file.
    pub digest: HexDigest,
    /// Path of the sidecar file.
    pub path: Utf8PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachmentReport {
    /// The working directory that received the files.
    pub working_directory: Utf8PathBuf,
    /// Artifacts removed from the attached set, in attachment order.
    pub detached: Vec<Artifact>,
    /// Paths of the copies, in the same order.
    pub copied: Vec<Utf8PathBuf>,
    /// Sidecars written, MD5 before SHA-1 for each artifact.
    pub sidecars: Vec<Sidecar>,
}

/// Remove every distribution archive from `attached` and return them.
///
/// Both the returned artifacts and those left behind keep their original
/// relative order.
///
/// # Examples
///
/// ```
/// use dist_stage_detach::Artifact;
/// use dist_stage_detach::step::detach_distributions;
///
/// let mut attached = vec![
///     Artifact::new("target/foo.jar", "jar", "foo"),
///     Artifact::new("target/foo-src.zip", "zip", "foo"),
/// ];
/// let detached = detach_distributions(&mut attached);
/// assert_eq!(detached.len(), 1);
/// assert_eq!(attached.len(), 1);
/// assert_eq!(attached[0].artifact_type(), "jar");
/// ```
pub fn detach_distributions(attached: &mut Vec<Artifact>) -> Vec<Artifact> {
    let (detached, retained) = std::mem::take(attached)
        .into_iter()
        .partition(Artifact::is_distribution);
    *attached = retained;
    detached
}

/// Detaches distribution archives and stages them with checksums.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use dist_stage_detach::{Artifact, DetachmentStep, StepConfig};
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let root = tempfile::tempdir()?;
/// let root = Utf8PathBuf::try_from(root.path().to_path_buf())?;
/// std::fs::write(root.join("foo-src.zip"), b"zip")?;
///
/// let step = DetachmentStep::new(StepConfig {
///     working_directory: root.join("staging"),
///     staging_url: "https://dist.example.org/dev/foo".to_owned(),
/// });
/// let mut attached = vec![Artifact::new(root.join("foo-src.zip"), "zip", "foo")];
/// let report = step.run(&mut attached)?;
///
/// assert!(attached.is_empty());
/// assert_eq!(report.sidecars.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DetachmentStep<F = LocalFs> {
    config: StepConfig,
    fs: F,
}

impl DetachmentStep {
    /// Create a step that works on the local filesystem.
    #[must_use]
    pub const fn new(config: StepConfig) -> Self {
        Self::with_fs(config, LocalFs)
    }
}

impl<F: StagingFs> DetachmentStep<F> {
    /// Create a step with an injected filesystem.
    #[must_use]
    pub const fn with_fs(config: StepConfig, fs: F) -> Self {
        Self { config, fs }
    }

    /// The configuration the step runs with.
    #[must_use]
    pub const fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Run the full detach, copy, and sign sequence.
    ///
    /// Distribution archives are removed from `attached` before anything
    /// touches the filesystem, so the removals persist even when the run
    /// fails later.
    ///
    /// # Errors
    ///
    /// - [`DetachError::WorkingDirectory`] if the working directory cannot be
    ///   created. Nothing has been copied at that point.
    /// - [`DetachError::MissingFileName`] or [`DetachError::Copy`] for the
    ///   first artifact that cannot be copied. Later artifacts are skipped.
    /// - [`DetachError::Sign`] for the first artifact whose digests or
    ///   sidecars cannot be produced. Later artifacts are skipped.
    pub fn run(&self, attached: &mut Vec<Artifact>) -> Result<DetachmentReport> {
        info!("Detaching assemblies");
        let detached = detach_distributions(attached);
        for artifact in &detached {
            info!("Detaching: {artifact}");
        }
        debug!("staged files are bound for {}", self.config.staging_url);

        self.prepare_working_directory()?;
        let entries = self.copy_to_working_directory(&detached)?;
        let sidecars = sign_artifacts(&entries)?;

        Ok(DetachmentReport {
            working_directory: self.config.working_directory.clone(),
            copied: entries.iter().map(|e| e.destination.clone()).collect(),
            detached,
            sidecars,
        })
    }

    /// Describe what a run over `attached` would produce without touching
    /// the filesystem or the collection.
    ///
    /// # Errors
    ///
    /// Returns [`DetachError::MissingFileName`] for an archive whose path has
    /// no file name.
    pub fn preview(&self, attached: &[Artifact]) -> Result<Vec<PlanEntry>> {
        attached
            .iter()
            .filter(|artifact| artifact.is_distribution())
            .map(|artifact| self.plan_entry(artifact))
            .collect()
    }

    fn prepare_working_directory(&self) -> Result<()> {
        let path = &self.config.working_directory;
        self.fs
            .init_directory(path)
            .map_err(|source| DetachError::WorkingDirectory {
                path: path.clone(),
                source,
            })
    }

    fn copy_to_working_directory(&self, detached: &[Artifact]) -> Result<Vec<PlanEntry>> {
        info!("Copying detached artifacts to working directory.");
        let mut entries = Vec::with_capacity(detached.len());
        for artifact in detached {
            let entry = self.plan_entry(artifact)?;
            info!("Copying: {}", entry.file_name);
            self.fs
                .copy_file(artifact.path(), &entry.destination)
                .map_err(|source| DetachError::Copy {
                    artifact: entry.file_name.clone(),
                    source,
                })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn plan_entry(&self, artifact: &Artifact) -> Result<PlanEntry> {
        let file_name = artifact
            .file_name()
            .ok_or_else(|| DetachError::MissingFileName {
                artifact: artifact.name().to_owned(),
                path: artifact.path().to_owned(),
            })?;
        let directory = self.config.working_directory.as_path();
        let sidecars = if artifact.is_signature_file() {
            Vec::new()
        } else {
            DigestAlgorithm::ALL
                .into_iter()
                .map(|algorithm| (algorithm, sidecar_path(directory, file_name, algorithm)))
                .collect()
        };
        Ok(PlanEntry {
            artifact: artifact.clone(),
            file_name: file_name.to_owned(),
            destination: directory.join(file_name),
            sidecars,
        })
    }
}

/// Write the sidecars listed in each entry, hashing the original artifact.
fn sign_artifacts(entries: &[PlanEntry]) -> Result<Vec<Sidecar>> {
    let mut written = Vec::new();
    for entry in entries.iter().filter(|e| !e.sidecars.is_empty()) {
        let sign_error = |source| DetachError::Sign {
            artifact: entry.file_name.clone(),
            source,
        };
        let checksums = compute_checksums(entry.artifact.path()).map_err(sign_error)?;
        for (algorithm, path) in &entry.sidecars {
            let digest = checksums.get(*algorithm);
            info!("{} {algorithm}: {digest}", entry.file_name);
            write_sidecar(path, digest).map_err(sign_error)?;
            written.push(Sidecar {
                artifact: entry.file_name.clone(),
                digest: digest.clone(),
                path: path.clone(),
            });
        }
    }
    Ok(written)
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
