// src/extract/entry.rs

//! Classification and path handling for individual archive entries

use crate::error::ExtractError;
use std::path::{Component, Path, PathBuf};
use tar::EntryType;

/// Mode applied to entries whose header carries no readable mode
pub const DEFAULT_FILE_MODE: u32 = 0o644;
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits restored from archive headers (no setuid/setgid/sticky)
pub const MODE_MASK: u32 = 0o777;

/// What the extractor does with an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    RegularFile,
    Other,
}

impl EntryKind {
    pub fn from_entry_type(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Directory => EntryKind::Directory,
            // Regular covers both '0' and the legacy '\0' typeflag
            EntryType::Regular | EntryType::Continuous => EntryKind::RegularFile,
            _ => EntryKind::Other,
        }
    }
}

/// Human-readable name for a tar typeflag, used in skip diagnostics
pub fn describe_entry_type(entry_type: EntryType) -> String {
    match entry_type {
        EntryType::Symlink => "symlink".to_string(),
        EntryType::Link => "hard link".to_string(),
        EntryType::Char => "character device".to_string(),
        EntryType::Block => "block device".to_string(),
        EntryType::Fifo => "fifo".to_string(),
        EntryType::GNUSparse => "sparse file".to_string(),
        other => format!("type '{}'", other.as_byte() as char),
    }
}

/// An entry that was not materialized on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub entry_type: String,
}

/// Summary of a completed extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub directories: usize,
    pub files: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Reduce an entry path to plain components below the destination
///
/// `.` components are dropped. Absolute paths, drive prefixes and `..`
/// are rejected instead of being rewritten.
pub fn sanitize_entry_path(entry_path: &Path) -> Result<PathBuf, ExtractError> {
    let mut relative = PathBuf::new();

    for component in entry_path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ExtractError::PathTraversal {
                    entry: entry_path.to_path_buf(),
                });
            }
        }
    }

    Ok(relative)
}

/// Check that the closest existing ancestor of `target` resolves inside `dest`
///
/// `dest` must already be canonical. Catches symlinks that were present in
/// the destination before extraction started.
pub fn ensure_contained(dest: &Path, target: &Path, entry: &Path) -> Result<(), ExtractError> {
    let existing = target.ancestors().find(|candidate| candidate.exists());

    let Some(existing) = existing else {
        return Err(ExtractError::PathTraversal {
            entry: entry.to_path_buf(),
        });
    };

    match existing.canonicalize() {
        Ok(resolved) if resolved.starts_with(dest) => Ok(()),
        _ => Err(ExtractError::PathTraversal {
            entry: entry.to_path_buf(),
        }),
    }
}
