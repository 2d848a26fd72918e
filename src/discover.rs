// src/discover.rs

//! Lookups inside an extracted package tree

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Icon used when a package ships none
pub const FALLBACK_ICON: &str = "/usr/share/pixmaps/default-icon.png";

const ICON_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "ico", "svg"];

#[cfg(windows)]
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd", "ps1"];

/// Package name derived from the archive file name
///
/// `editor-1.2.tar.gz` and `editor-1.2.tgz` both become `editor-1.2`.
pub fn default_package_name(archive: &Path) -> String {
    let file_name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = file_name.strip_suffix(".tar.gz").unwrap_or(&file_name);
    let stem = stem.strip_suffix(".tgz").unwrap_or(stem);
    stem.to_string()
}

/// All regular files under `root` that can be executed, in walk order
pub fn find_executables(root: &Path) -> walkdir::Result<Vec<PathBuf>> {
    let mut executables = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if is_executable(&entry)? {
            executables.push(entry.into_path());
        }
    }

    Ok(executables)
}

#[cfg(unix)]
fn is_executable(entry: &walkdir::DirEntry) -> walkdir::Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    Ok(entry.metadata()?.permissions().mode() & 0o111 != 0)
}

#[cfg(windows)]
fn is_executable(entry: &walkdir::DirEntry) -> walkdir::Result<bool> {
    Ok(has_extension(entry.path(), EXECUTABLE_EXTENSIONS))
}

#[cfg(not(any(unix, windows)))]
fn is_executable(_entry: &walkdir::DirEntry) -> walkdir::Result<bool> {
    Ok(false)
}

/// First image file under `root`, or the system fallback icon
pub fn find_icon(root: &Path) -> PathBuf {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && has_extension(entry.path(), ICON_EXTENSIONS))
        .map(walkdir::DirEntry::into_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_ICON))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}
