//! Driver for stub generation
//!
//! Orchestrates one run: resolve the source package, create the
//! destination directory, then extract → render → write each file in
//! order. The first error aborts the run; stubs written before the failure
//! are left on disk, but the process reports failure so nothing downstream
//! trusts the partial output.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::header::parse_header_file;
use crate::resolve::resolve_package;
use crate::stub::{render_stub, write_stub};

/// Configuration for one stub-generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Source folder of the package to process.
    pub source: PathBuf,
    /// Folder that will be created with the fake .go files.
    pub dest: PathBuf,
    /// Header text prepended to every stub; empty means none.
    pub header: String,
    /// Tolerate a pre-existing destination folder instead of failing.
    pub allow_dest_exists: bool,
}

/// Generate one stub per buildable source file, returning how many were
/// written.
pub fn generate(config: &GeneratorConfig) -> Result<usize> {
    let pkg = resolve_package(&config.source)?;

    create_dest_dir(&config.dest, config.allow_dest_exists)?;

    for file in &pkg.files {
        let src = pkg.dir.join(&file.name);
        let header = parse_header_file(&src)?;
        // Aliases are dropped on purpose: the stub exists to force linkage,
        // so every import comes out blank-identifier.
        let imports: Vec<String> = header.imports.into_iter().map(|spec| spec.path).collect();
        let contents = render_stub(&pkg.name, &imports, &config.header);
        write_stub(&config.dest.join(&file.name), &contents, file.modified)?;
    }

    Ok(pkg.files.len())
}

/// Create the destination directory (0777 before umask, std's default).
/// A directory that already exists is an error unless `allow_exists`.
fn create_dest_dir(dest: &Path, allow_exists: bool) -> Result<()> {
    match fs::create_dir(dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && allow_exists => Ok(()),
        Err(source) => Err(Error::Directory {
            path: dest.to_path_buf(),
            source,
        }),
    }
}

/// Resolve the header text from the CLI inputs.
///
/// A non-empty `--header` literal wins; otherwise `--headerfile` is read.
/// The result is trimmed of surrounding spaces, tabs, and newlines, so a
/// header file ending in a trailing newline still yields exactly one blank
/// line between header and package clause.
pub fn resolve_header(literal: &str, file: Option<&Path>) -> Result<String> {
    let raw = if !literal.is_empty() {
        literal.to_string()
    } else if let Some(path) = file {
        fs::read_to_string(path).map_err(|source| Error::HeaderRead {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        String::new()
    };
    Ok(raw.trim_matches([' ', '\t', '\n']).to_string())
}
