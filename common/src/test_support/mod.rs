//! Shared test helpers for dist-stage crates.
//!
//! The helpers here keep temporary-directory boilerplate in one place so unit
//! and behaviour tests can build artifact fixtures in a line or two. They
//! panic on failure because they only run inside tests.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Create a temporary directory and return it with its UTF-8 path.
///
/// Keep the [`TempDir`] guard alive for as long as the path is used.
///
/// # Panics
///
/// Panics if the directory cannot be created or its path is not UTF-8.
#[must_use]
pub fn utf8_temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("temp dir creation failed: {e}"));
    let path = Utf8PathBuf::try_from(dir.path().to_path_buf())
        .unwrap_or_else(|e| panic!("temp dir path is not UTF-8: {e}"));
    (dir, path)
}

/// Write `contents` to `dir/name` and return the file's path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(dir: &Utf8Path, name: &str, contents: &[u8]) -> Utf8PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {path}: {e}"));
    path
}

/// Read `path` as UTF-8 text.
///
/// # Panics
///
/// Panics if the file cannot be read.
#[must_use]
pub fn read_text(path: &Utf8Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}
