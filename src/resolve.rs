//! Package directory resolution
//!
//! Determines which files in a directory make up the Go package and what
//! the package is called. One directory, one package: files that disagree
//! on the package clause are a hard error, as are directories with nothing
//! buildable in them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::header::parse_package_clause;

/// One buildable source file of the package.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name within the package directory.
    pub name: String,
    /// Modification time recorded at resolution; copied onto the stub.
    pub modified: SystemTime,
}

/// A resolved package directory.
#[derive(Debug, Clone)]
pub struct Package {
    pub dir: PathBuf,
    /// Package name shared by every file, from the package clauses.
    pub name: String,
    /// Buildable files in lexical filename order.
    pub files: Vec<SourceFile>,
}

/// Whether a file name counts as a buildable package source.
///
/// `.go` files only, minus `_test.go` files and names starting with `_` or
/// `.`, which the Go toolchain ignores when building a package.
fn is_buildable_name(name: &str) -> bool {
    name.ends_with(".go")
        && !name.ends_with("_test.go")
        && !name.starts_with('_')
        && !name.starts_with('.')
}

/// Resolve the buildable source files and package name of `dir`.
///
/// Any failure along the way (unreadable directory or file, missing or
/// conflicting package clauses, nothing buildable) maps to
/// [`Error::Package`] naming the directory, since they all mean the same
/// thing to the caller: this directory cannot be treated as one package.
pub fn resolve_package(dir: &Path) -> Result<Package> {
    let package_err = |message: String| Error::Package {
        path: dir.to_path_buf(),
        message,
    };

    let entries = fs::read_dir(dir).map_err(|e| package_err(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| package_err(e.to_string()))?;
        // Non-UTF-8 names cannot be .go files worth stubbing; skip them.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !is_buildable_name(&name) {
            continue;
        }
        let metadata = fs::metadata(entry.path()).map_err(|e| package_err(e.to_string()))?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified().map_err(|e| package_err(e.to_string()))?;
        files.push(SourceFile { name, modified });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    if files.is_empty() {
        return Err(package_err(format!(
            "no buildable Go source files in {}",
            dir.display()
        )));
    }

    // All files must agree on the package clause.
    let mut package: Option<(String, String)> = None;
    for file in &files {
        let content = fs::read_to_string(dir.join(&file.name))
            .map_err(|e| package_err(format!("{}: {e}", file.name)))?;
        let name = parse_package_clause(&content)
            .map_err(|e| package_err(format!("{}: {e}", file.name)))?;
        match &package {
            None => package = Some((name, file.name.clone())),
            Some((first_name, first_file)) if *first_name != name => {
                return Err(package_err(format!(
                    "found packages {first_name} ({first_file}) and {name} ({})",
                    file.name
                )));
            }
            Some(_) => {}
        }
    }

    // files is non-empty, so a package name was recorded.
    let (name, _) = package.expect("package name resolved from at least one file");

    Ok(Package {
        dir: dir.to_path_buf(),
        name,
        files,
    })
}
