//! Directory initialisation and file copying.
//!
//! Both operations fail loudly: every I/O error is reported with the path
//! that caused it so callers can wrap it without losing context.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use std::io;
use thiserror::Error;

/// Errors raised by the filesystem capabilities.
#[derive(Debug, Error)]
pub enum FsError {
    /// The directory (or one of its parents) could not be created.
    #[error("could not create directory {path}")]
    CreateDirectory {
        /// Directory that was requested.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file could not be copied to its destination.
    #[error("could not copy {from} to {to}")]
    Copy {
        /// Source file.
        from: Utf8PathBuf,
        /// Destination path.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Return the path the failed operation was writing to.
    #[must_use]
    pub fn target(&self) -> &Utf8Path {
        match self {
            Self::CreateDirectory { path, .. } => path,
            Self::Copy { to, .. } => to,
        }
    }
}

/// Filesystem operations needed to stage detached artifacts.
///
/// The trait exists so the detachment step can run against an injected
/// implementation in tests.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use dist_stage_common::{LocalFs, StagingFs};
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let root = tempfile::tempdir()?;
/// let dir = Utf8PathBuf::try_from(root.path().join("staging"))?;
/// LocalFs.init_directory(&dir)?;
/// assert!(dir.is_dir());
/// # Ok(())
/// # }
/// ```
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
pub trait StagingFs {
    /// Ensure `path` exists as a directory, creating it and any missing
    /// parents.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::CreateDirectory`] when the directory cannot be
    /// created, including when the path is occupied by a regular file.
    fn init_directory(&self, path: &Utf8Path) -> Result<(), FsError>;

    /// Copy the bytes of `from` to `to`, creating parent directories of `to`
    /// as needed and replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Copy`] when reading the source, creating the parent
    /// directories, or writing the destination fails.
    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), FsError>;
}

/// [`StagingFs`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl StagingFs for LocalFs {
    fn init_directory(&self, path: &Utf8Path) -> Result<(), FsError> {
        if path.is_dir() {
            return Ok(());
        }
        debug!("creating directory {path}");
        fs::create_dir_all(path).map_err(|source| FsError::CreateDirectory {
            path: path.to_owned(),
            source,
        })
    }

    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), FsError> {
        let wrap = |source| FsError::Copy {
            from: from.to_owned(),
            to: to.to_owned(),
            source,
        };

        if let Some(parent) = to.parent().filter(|p| !p.as_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }

        // Copying a file onto itself would truncate it.
        if is_same_file(from, to).map_err(wrap)? {
            debug!("{from} is already in place");
            return Ok(());
        }

        let bytes = fs::copy(from, to).map_err(wrap)?;
        debug!("copied {bytes} bytes from {from} to {to}");
        Ok(())
    }
}

/// Return whether both paths resolve to the same file on disk.
fn is_same_file(a: &Utf8Path, b: &Utf8Path) -> io::Result<bool> {
    if !b.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}
