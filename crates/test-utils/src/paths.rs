//! Scratch directories for tests that touch the filesystem.

use tempfile::TempDir;

/// Creates a fresh temporary directory, removed when the guard drops.
///
/// # Panics
///
/// Panics if the system temp directory is not writable; tests cannot
/// proceed without it.
pub fn scratch_dir(prefix: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("failed to create scratch directory")
}
