//! Build artifacts and the distribution types that get detached.
//!
//! An [`Artifact`] is a reference to a file the build attached to its output
//! set, classified by a free-form type tag. Only four tags mark an artifact
//! as a distribution archive; see [`DistributionType`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Substring that marks a file name as a detached signature.
const SIGNATURE_MARKER: &str = "asc";

/// The artifact type tags that are detached from the publishable set.
///
/// The set is fixed: any other tag, whatever the file is called, stays
/// attached.
///
/// # Examples
///
/// ```
/// use dist_stage_detach::DistributionType;
///
/// assert_eq!(DistributionType::from_tag("tar.gz"), Some(DistributionType::TarGz));
/// assert_eq!(DistributionType::from_tag("jar"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionType {
    /// A `zip` bundle.
    Zip,
    /// A `tar.gz` bundle.
    TarGz,
    /// The signature of a `zip` bundle.
    ZipSignature,
    /// The signature of a `tar.gz` bundle.
    TarGzSignature,
}

impl DistributionType {
    /// Every recognised distribution type.
    pub const ALL: [Self; 4] = [
        Self::Zip,
        Self::TarGz,
        Self::ZipSignature,
        Self::TarGzSignature,
    ];

    /// Match an artifact type tag exactly against the recognised set.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Return the artifact type tag for this distribution type.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::ZipSignature => "zip.asc",
            Self::TarGzSignature => "tar.gz.asc",
        }
    }

    /// Return whether the type tag denotes a signature.
    #[must_use]
    pub const fn is_signature(self) -> bool {
        matches!(self, Self::ZipSignature | Self::TarGzSignature)
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A file the build attached to its output set.
///
/// Serialised as `{"path": ..., "type": ..., "name": ...}`. When `name` is
/// omitted the file name stands in for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact {
    path: Utf8PathBuf,
    #[serde(rename = "type")]
    artifact_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    name: String,
}

impl Artifact {
    /// Create an artifact reference.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        artifact_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            artifact_type: artifact_type.into(),
            name: name.into(),
        }
    }

    /// Location of the artifact's bytes.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The free-form type tag, such as `jar` or `tar.gz.asc`.
    #[must_use]
    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    /// Display name used in log messages.
    #[must_use]
    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            self.file_name().unwrap_or(self.path.as_str())
        } else {
            &self.name
        }
    }

    /// Final component of the artifact's path.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()
    }

    /// The distribution type, when the type tag is one of the recognised set.
    #[must_use]
    pub fn distribution_type(&self) -> Option<DistributionType> {
        DistributionType::from_tag(&self.artifact_type)
    }

    /// Return whether this artifact is detached from the publishable set.
    #[must_use]
    pub fn is_distribution(&self) -> bool {
        self.distribution_type().is_some()
    }

    /// Return whether the file name marks this artifact as a signature.
    ///
    /// The check looks at the file name, not the type tag: any file whose
    /// name contains `asc` gets no checksum sidecars.
    #[must_use]
    pub fn is_signature_file(&self) -> bool {
        self.file_name()
            .is_some_and(|name| name.contains(SIGNATURE_MARKER))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.artifact_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zip("zip", Some(DistributionType::Zip))]
    #[case::tar_gz("tar.gz", Some(DistributionType::TarGz))]
    #[case::zip_signature("zip.asc", Some(DistributionType::ZipSignature))]
    #[case::tar_gz_signature("tar.gz.asc", Some(DistributionType::TarGzSignature))]
    #[case::jar("jar", None)]
    #[case::pom("pom", None)]
    #[case::jar_signature("jar.asc", None)]
    #[case::upper_case("ZIP", None)]
    #[case::tgz("tgz", None)]
    #[case::padded(" zip", None)]
    #[case::empty("", None)]
    fn from_tag_matches_exactly(#[case] tag: &str, #[case] expected: Option<DistributionType>) {
        assert_eq!(DistributionType::from_tag(tag), expected);
    }

    #[test]
    fn tags_round_trip_through_from_tag() {
        for kind in DistributionType::ALL {
            assert_eq!(DistributionType::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn only_asc_types_are_signatures() {
        assert!(!DistributionType::Zip.is_signature());
        assert!(!DistributionType::TarGz.is_signature());
        assert!(DistributionType::ZipSignature.is_signature());
        assert!(DistributionType::TarGzSignature.is_signature());
    }

    #[test]
    fn type_tag_decides_detachment_not_file_name() {
        let misleading = Artifact::new("target/foo-src.zip", "jar", "foo");
        assert!(!misleading.is_distribution());

        let renamed = Artifact::new("target/foo.bin", "tar.gz", "foo");
        assert!(renamed.is_distribution());
    }

    #[rstest]
    #[case::zip_signature("target/foo-src.zip.asc", true)]
    #[case::tar_gz_signature("target/foo-bin.tar.gz.asc", true)]
    #[case::zip("target/foo-src.zip", false)]
    #[case::tar_gz("target/foo-bin.tar.gz", false)]
    fn signature_files_are_recognised_by_name(#[case] path: &str, #[case] expected: bool) {
        let artifact = Artifact::new(path, "zip", "foo");
        assert_eq!(artifact.is_signature_file(), expected);
    }

    #[test]
    fn name_falls_back_to_file_name() {
        let artifact = Artifact::new("target/foo-src.zip", "zip", "");
        assert_eq!(artifact.name(), "foo-src.zip");
    }

    #[test]
    fn deserialises_type_field() {
        let artifact: Artifact =
            serde_json::from_str(r#"{"path": "target/a.tar.gz", "type": "tar.gz", "name": "a"}"#)
                .expect("valid artifact JSON");
        assert_eq!(artifact.artifact_type(), "tar.gz");
        assert_eq!(artifact.distribution_type(), Some(DistributionType::TarGz));
        assert_eq!(artifact.path(), Utf8Path::new("target/a.tar.gz"));
    }

    #[test]
    fn display_includes_name_and_type() {
        let artifact = Artifact::new("target/a.zip", "zip", "commons-foo");
        assert_eq!(artifact.to_string(), "commons-foo (zip)");
    }
}
