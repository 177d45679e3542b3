//! Test utilities for creating temporary Go package directories.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

/// A temporary Go package directory for testing.
///
/// Provides methods for creating source files and picking a destination
/// path. The directory is automatically cleaned up when dropped.
pub struct TestPackage {
    dir: TempDir,
}

impl TestPackage {
    /// Create a new empty temporary package directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the package directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a source file into the package directory.
    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(name);
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// A destination path inside the temp dir that does not exist yet.
    pub fn dest(&self) -> PathBuf {
        self.dir.path().join("stubs")
    }

    /// Set a file's modification (and access) time.
    pub fn set_modified(path: &Path, modified: SystemTime) {
        let file = File::options()
            .write(true)
            .open(path)
            .expect("Failed to open file for time update");
        file.set_times(FileTimes::new().set_accessed(modified).set_modified(modified))
            .expect("Failed to set file times");
    }
}

impl Default for TestPackage {
    fn default() -> Self {
        Self::new()
    }
}
