//! Test harness for gostub integration tests

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;
use tempfile::TempDir;

pub struct TestPackage {
    dir: TempDir,
}

impl TestPackage {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(name);
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn dest(&self) -> PathBuf {
        self.dir.path().join("stubs")
    }

    pub fn set_modified(path: &Path, modified: SystemTime) {
        let file = File::options()
            .write(true)
            .open(path)
            .expect("Failed to open file for time update");
        file.set_times(FileTimes::new().set_accessed(modified).set_modified(modified))
            .expect("Failed to set file times");
    }
}

pub fn run_gostub(args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_gostub");
    let output = Command::new(binary)
        .args(args)
        .output()
        .expect("Failed to run gostub");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// Run against a package with source dir and dest dir as the positionals,
/// plus any extra flags.
pub fn run_on(pkg: &TestPackage, extra: &[&str]) -> (String, String, bool) {
    let source = pkg.path().to_string_lossy().to_string();
    let dest = pkg.dest().to_string_lossy().to_string();
    let mut args: Vec<&str> = vec![&source, &dest];
    args.extend_from_slice(extra);
    run_gostub(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let pkg = TestPackage::new();
        assert!(pkg.path().exists());
    }

    #[test]
    fn test_harness_add_file() {
        let pkg = TestPackage::new();
        let file_path = pkg.add_file("a.go", "package foo\n");
        assert!(file_path.exists());
    }

    #[test]
    fn test_harness_dest_not_created() {
        let pkg = TestPackage::new();
        assert!(!pkg.dest().exists());
    }
}
