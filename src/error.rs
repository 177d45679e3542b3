//! Error types for stub generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a stub-generation run.
///
/// Every variant is fatal: the tool never skips a bad file, because a
/// partial destination directory would silently under-report the package's
/// real dependencies.
#[derive(Error, Debug)]
pub enum Error {
    /// The source package directory could not be resolved.
    #[error("unable to read package {}: {message}", .path.display())]
    Package { path: PathBuf, message: String },

    /// The destination directory could not be created.
    #[error("unable to create destination folder {}: {source}", .path.display())]
    Directory { path: PathBuf, source: io::Error },

    /// A source file's package/import header is not syntactically valid.
    #[error("error reading source file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A stub file could not be created or written.
    #[error("error writing destination file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The `--headerfile` file could not be read.
    #[error("unable to read the header file {}: {source}", .path.display())]
    HeaderRead { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
