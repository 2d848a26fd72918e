// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Failures while unpacking an archive onto disk
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The archive file could not be opened for reading
    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream is not valid gzip, or the tar stream inside is damaged
    #[error("Failed to decompress archive {path}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be created or its mode applied
    #[error("Failed to create directory {path}: {source}")]
    Mkdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A regular file could not be created, written, or have its mode applied
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry would land outside the destination directory
    #[error("Archive entry escapes destination directory: {entry}")]
    PathTraversal { entry: PathBuf },
}

/// Failures while opening the package manifest
#[derive(Error, Debug)]
pub enum LoadError {
    /// The manifest was missing and could not be created
    #[error("Failed to initialize manifest {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest exists but could not be read
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest content is not a valid package list
    #[error("Manifest {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while writing the manifest document
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to lock manifest {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of manifest mutations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record carries the requested id
    #[error("Package with id {0} not found in manifest")]
    NotFound(String),

    /// The mutation was rolled back because the manifest could not be saved
    #[error("Manifest update rolled back: {0}")]
    PersistFailed(#[from] PersistError),
}

/// Core error types for tarstall
#[derive(Error, Debug)]
pub enum Error {
    /// Archive extraction errors
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Manifest loading errors
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Manifest mutation errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive to install does not exist
    #[error("Archive {0} does not exist")]
    ArchiveNotFound(PathBuf),

    /// Extracted tree contains nothing runnable
    #[error("No executables found in {0}")]
    NoExecutables(PathBuf),

    /// Requested executable is not part of the extracted package
    #[error("Executable {0} is not inside the package")]
    ExecutableNotInPackage(PathBuf),

    /// Package name cannot be used as a file name
    #[error("Invalid package name {0:?}: must be a single path component")]
    InvalidPackageName(String),

    /// No installed package has the given name
    #[error("Package {0} not found")]
    PackageNotFound(String),

    /// The user declined or input ended before a decision was made
    #[error("Aborted: {0}")]
    Aborted(String),
}

/// Result type alias using tarstall's Error type
pub type Result<T> = std::result::Result<T, Error>;
