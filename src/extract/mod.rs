// src/extract/mod.rs

//! Archive extraction engine
//!
//! Streams a gzip-compressed tar archive onto disk. Directories and regular
//! files are materialized with their archived permission bits; every other
//! entry type is skipped and reported back in the [`ExtractReport`].

pub mod entry;

pub use entry::{EntryKind, ExtractReport, SkippedEntry};

use crate::error::ExtractError;
use entry::{
    DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, MODE_MASK, describe_entry_type, ensure_contained,
    sanitize_entry_path,
};
use flate2::read::MultiGzDecoder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Leading bytes of every gzip member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Extract `archive_path` (a `.tar.gz`) into `dest_dir`
///
/// `dest_dir` is created if needed. Extraction stops at the first fatal
/// error; entries already written stay on disk for the caller to clean up.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<ExtractReport, ExtractError> {
    debug!("Extracting {} into {}", archive_path.display(), dest_dir.display());

    let file = File::open(archive_path).map_err(|source| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let head = reader.fill_buf().map_err(|source| ExtractError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;
    if !head.starts_with(&GZIP_MAGIC) {
        return Err(ExtractError::Decompress {
            path: archive_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, "not a gzip stream"),
        });
    }

    fs::create_dir_all(dest_dir).map_err(|source| ExtractError::Mkdir {
        path: dest_dir.to_path_buf(),
        source,
    })?;
    let dest_root = dest_dir.canonicalize().map_err(|source| ExtractError::Mkdir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    extract_stream(MultiGzDecoder::new(reader), archive_path, &dest_root)
}

fn extract_stream<R: Read>(
    reader: R,
    archive_path: &Path,
    dest_root: &Path,
) -> Result<ExtractReport, ExtractError> {
    let decompress_error = |source| ExtractError::Decompress {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut archive = Archive::new(reader);
    let mut report = ExtractReport::default();

    for entry in archive.entries().map_err(decompress_error)? {
        let mut entry = entry.map_err(decompress_error)?;

        let entry_path = entry.path().map_err(decompress_error)?.into_owned();
        let entry_type = entry.header().entry_type();

        match EntryKind::from_entry_type(entry_type) {
            EntryKind::Directory => {
                let relative = sanitize_entry_path(&entry_path)?;
                let target = dest_root.join(&relative);
                ensure_contained(dest_root, &target, &entry_path)?;

                let mode = entry.header().mode().unwrap_or(DEFAULT_DIR_MODE);
                fs::create_dir_all(&target)
                    .and_then(|()| apply_mode(&target, mode))
                    .map_err(|source| ExtractError::Mkdir {
                        path: target.clone(),
                        source,
                    })?;

                report.directories += 1;
            }
            EntryKind::RegularFile => {
                let relative = sanitize_entry_path(&entry_path)?;
                if relative.as_os_str().is_empty() {
                    return Err(ExtractError::PathTraversal { entry: entry_path });
                }
                let target = dest_root.join(&relative);
                ensure_contained(dest_root, &target, &entry_path)?;

                let mode = entry.header().mode().unwrap_or(DEFAULT_FILE_MODE);
                write_file(&mut entry, &target, mode, archive_path)?;

                report.files += 1;
            }
            EntryKind::Other => {
                let kind = describe_entry_type(entry_type);
                debug!("Skipping {} entry {}", kind, entry_path.display());
                report.skipped.push(SkippedEntry {
                    path: entry_path,
                    entry_type: kind,
                });
            }
        }
    }

    debug!(
        "Extracted {} directories and {} files ({} skipped)",
        report.directories,
        report.files,
        report.skipped.len()
    );

    Ok(report)
}

fn write_file<R: Read>(
    content: &mut R,
    target: &Path,
    mode: u32,
    archive_path: &Path,
) -> Result<(), ExtractError> {
    let write_error = |source| ExtractError::WriteFile {
        path: target.to_path_buf(),
        source,
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    // Never write through a link left at the target location
    if let Ok(metadata) = fs::symlink_metadata(target) {
        if metadata.file_type().is_symlink() {
            fs::remove_file(target).map_err(write_error)?;
        }
    }

    let mut file = File::create(target).map_err(write_error)?;
    copy_content(content, &mut file, archive_path, target)?;
    drop(file);

    apply_mode(target, mode).map_err(write_error)
}

/// Copy entry data, keeping decoder failures apart from disk failures
fn copy_content<R: Read, W: Write>(
    content: &mut R,
    out: &mut W,
    archive_path: &Path,
    target: &Path,
) -> Result<(), ExtractError> {
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    loop {
        let read = match content.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ExtractError::Decompress {
                    path: archive_path.to_path_buf(),
                    source,
                });
            }
        };

        out.write_all(&buffer[..read])
            .map_err(|source| ExtractError::WriteFile {
                path: target.to_path_buf(),
                source,
            })?;
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & MODE_MASK))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
