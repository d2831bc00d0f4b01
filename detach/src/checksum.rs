//! MD5 and SHA-1 checksums for staged distribution archives.
//!
//! Both digests are computed in one read pass over the artifact and written
//! as sidecar files named `<file>.md5` and `<file>.sha1`, each holding a
//! single lowercase hex line.

use camino::{Utf8Path, Utf8PathBuf};
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

const READ_BUFFER_SIZE: usize = 8192;

/// Hash algorithms written as sidecars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// MD5, written to `<file>.md5`.
    Md5,
    /// SHA-1, written to `<file>.sha1`.
    Sha1,
}

impl DigestAlgorithm {
    /// Sidecar algorithms, in the order they are written.
    pub const ALL: [Self; 2] = [Self::Md5, Self::Sha1];

    /// File extension of the sidecar, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// Length of the hex-encoded digest.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Reasons a string is not a valid hex digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDigest {
    /// The string has the wrong number of characters.
    #[error("expected {expected} hex characters for {algorithm}, got {actual}")]
    Length {
        /// Algorithm the digest was parsed for.
        algorithm: DigestAlgorithm,
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },

    /// The string contains something other than lowercase hex digits.
    #[error("invalid character '{0}' in digest; expected lowercase hex")]
    Character(char),
}

/// A lowercase hex digest tagged with its algorithm.
///
/// # Examples
///
/// ```
/// use dist_stage_detach::{DigestAlgorithm, HexDigest};
///
/// let digest = HexDigest::parse(DigestAlgorithm::Md5, "d41d8cd98f00b204e9800998ecf8427e")?;
/// assert_eq!(digest.algorithm(), DigestAlgorithm::Md5);
/// # Ok::<(), dist_stage_detach::checksum::InvalidDigest>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl HexDigest {
    /// Validate `value` as a lowercase hex digest for `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDigest`] if the length does not match the algorithm or
    /// the value contains anything other than `0-9a-f`.
    pub fn parse(algorithm: DigestAlgorithm, value: &str) -> Result<Self, InvalidDigest> {
        if value.len() != algorithm.hex_len() {
            return Err(InvalidDigest::Length {
                algorithm,
                expected: algorithm.hex_len(),
                actual: value.len(),
            });
        }
        if let Some(bad) = value
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(InvalidDigest::Character(bad));
        }
        Ok(Self {
            algorithm,
            hex: value.to_owned(),
        })
    }

    /// Algorithm that produced the digest.
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The digest as lowercase hex.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// MD5 and SHA-1 digests of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksums {
    /// MD5 digest.
    pub md5: HexDigest,
    /// SHA-1 digest.
    pub sha1: HexDigest,
}

impl Checksums {
    /// Return the digest for `algorithm`.
    #[must_use]
    pub const fn get(&self, algorithm: DigestAlgorithm) -> &HexDigest {
        match algorithm {
            DigestAlgorithm::Md5 => &self.md5,
            DigestAlgorithm::Sha1 => &self.sha1,
        }
    }
}

/// Compute MD5 and SHA-1 over everything `reader` yields.
///
/// # Errors
///
/// Returns the first read error.
pub fn checksums_from_reader<R: Read>(mut reader: R) -> io::Result<Checksums> {
    let mut md5 = md5::Context::new();
    let mut sha1 = Sha1::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = buffer.get(..bytes_read).unwrap_or_default();
        md5.consume(chunk);
        sha1.update(chunk);
    }
    // Both hashers emit lowercase hex of the right length.
    Ok(Checksums {
        md5: HexDigest {
            algorithm: DigestAlgorithm::Md5,
            hex: format!("{:x}", md5.compute()),
        },
        sha1: HexDigest {
            algorithm: DigestAlgorithm::Sha1,
            hex: format!("{:x}", sha1.finalize()),
        },
    })
}

/// Compute MD5 and SHA-1 of the file at `path` in a single pass.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_checksums(path: &Utf8Path) -> io::Result<Checksums> {
    let file = File::open(path)?;
    checksums_from_reader(file)
}

/// Path of the sidecar for `file_name` inside `directory`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dist_stage_detach::DigestAlgorithm;
/// use dist_stage_detach::checksum::sidecar_path;
///
/// let path = sidecar_path(Utf8Path::new("staging"), "foo-src.zip", DigestAlgorithm::Sha1);
/// assert_eq!(path, Utf8Path::new("staging/foo-src.zip.sha1"));
/// ```
#[must_use]
pub fn sidecar_path(
    directory: &Utf8Path,
    file_name: &str,
    algorithm: DigestAlgorithm,
) -> Utf8PathBuf {
    directory.join(format!("{file_name}.{}", algorithm.extension()))
}

/// Write `digest` to `path` as a single line, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_sidecar(path: &Utf8Path, digest: &HexDigest) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{digest}")?;
    writer.flush()
}
