// src/manifest/mod.rs

//! Package manifest store
//!
//! The manifest is a single JSON array of [`PackageRecord`]s. This module
//! handles:
//! - Bootstrapping an empty manifest on first use
//! - Loading and validating the document
//! - Add/remove with a full, atomic rewrite after every mutation
//! - Rolling the in-memory list back when a rewrite fails

pub mod models;

pub use models::PackageRecord;

use crate::error::{LoadError, PersistError, StoreError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Document written when no packages are installed
const EMPTY_DOCUMENT: &[u8] = b"[]";

/// Mode of a newly created manifest
#[cfg(unix)]
const DEFAULT_MANIFEST_MODE: u32 = 0o644;

/// Installed packages, backed by a JSON document on disk
#[derive(Debug)]
pub struct ManifestStore {
    backing_path: PathBuf,
    records: Vec<PackageRecord>,
}

impl ManifestStore {
    /// Open the manifest at `path`, creating an empty one if it is missing
    ///
    /// A document that exists but does not parse is reported as
    /// [`LoadError::Corrupt`]; it is never reset.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        debug!("Loading manifest from: {}", path.display());

        let init_error = |source| LoadError::Init {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(init_error)?;
        }
        let _lock = lock_manifest(path).map_err(init_error)?;

        if !path.exists() {
            write_atomically(path, EMPTY_DOCUMENT).map_err(init_error)?;
            debug!("Created empty manifest at: {}", path.display());
            return Ok(Self {
                backing_path: path.to_path_buf(),
                records: Vec::new(),
            });
        }

        let raw = fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<PackageRecord> =
            serde_json::from_slice(&raw).map_err(|source| LoadError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded {} package record(s)", records.len());

        Ok(Self {
            backing_path: path.to_path_buf(),
            records,
        })
    }

    pub fn backing_path(&self) -> &Path {
        &self.backing_path
    }

    /// Records in insertion order
    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by id
    pub fn find(&self, id: &str) -> Option<&PackageRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Find the first record with the given display name
    pub fn find_by_name(&self, name: &str) -> Option<&PackageRecord> {
        self.records.iter().find(|record| record.display_name == name)
    }

    /// Append a record and persist
    ///
    /// Ids are not checked for uniqueness here; callers generate them.
    pub fn add(&mut self, record: PackageRecord) -> Result<(), StoreError> {
        debug!("Adding package {} ({})", record.display_name, record.id);
        self.records.push(record);

        if let Err(err) = self.persist() {
            self.records.pop();
            return Err(StoreError::PersistFailed(err));
        }

        Ok(())
    }

    /// Remove the first record with `id` and persist
    pub fn remove(&mut self, id: &str) -> Result<PackageRecord, StoreError> {
        let index = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        debug!("Removing package {} from manifest", id);
        let removed = self.records.remove(index);

        if let Err(err) = self.persist() {
            self.records.insert(index, removed);
            return Err(StoreError::PersistFailed(err));
        }

        Ok(removed)
    }

    /// Rewrite the backing document from the in-memory records
    ///
    /// The document is written to a temporary file next to it and renamed
    /// into place, so readers see either the old or the new list.
    pub fn persist(&self) -> Result<(), PersistError> {
        let payload = serde_json::to_vec_pretty(&self.records).map_err(PersistError::Serialize)?;

        let _lock = lock_manifest(&self.backing_path).map_err(|source| PersistError::Lock {
            path: self.backing_path.clone(),
            source,
        })?;

        write_atomically(&self.backing_path, &payload).map_err(|source| PersistError::Write {
            path: self.backing_path.clone(),
            source,
        })?;

        debug!(
            "Persisted {} package record(s) to {}",
            self.records.len(),
            self.backing_path.display()
        );
        Ok(())
    }
}

/// Sidecar file used to serialize manifest access between processes
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Hold an exclusive lock on the manifest's sidecar until the file is dropped
fn lock_manifest(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path(path))?;
    file.lock()?;
    Ok(file)
}

fn write_atomically(path: &Path, payload: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(payload)?;
    #[cfg(unix)]
    temp.as_file().set_permissions(manifest_permissions(path))?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;

    // Make the rename itself durable
    if let Ok(dir_handle) = File::open(dir) {
        let _ = dir_handle.sync_all();
    }

    Ok(())
}

/// Mode of the manifest being replaced, or 0644 for a new one
///
/// Temp files start out as 0600, which would hide the manifest from
/// unprivileged `list`.
#[cfg(unix)]
fn manifest_permissions(path: &Path) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(metadata) => metadata.permissions(),
        Err(_) => fs::Permissions::from_mode(DEFAULT_MANIFEST_MODE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> PackageRecord {
        PackageRecord::new(
            id,
            name,
            format!("/opt/pkgs/{}-{}", id, name),
            format!("/opt/pkgs/{}-{}/bin/{}", id, name, name),
        )
    }

    #[test]
    fn test_load_creates_missing_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/state/packages.json");

        let store = ManifestStore::load(&path).unwrap();

        assert!(store.is_empty());
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn test_empty_store_persists_as_empty_array() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let store = ManifestStore::load(&path).unwrap();
        store.persist().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_add_persists_pretty_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a1", "alpha")).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n  {\n    \"uuid\": \"a1\""));
        assert!(raw.contains("\"install_path\": \"/opt/pkgs/a1-alpha\""));
    }

    #[test]
    fn test_remove_preserves_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a", "alpha")).unwrap();
        store.add(record("b", "beta")).unwrap();
        store.add(record("c", "gamma")).unwrap();

        let removed = store.remove("b").unwrap();
        assert_eq!(removed.display_name, "beta");

        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let reloaded = ManifestStore::load(&path).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[test]
    fn test_remove_first_match_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("dup", "first")).unwrap();
        store.add(record("dup", "second")).unwrap();

        store.remove("dup").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].display_name, "second");
    }

    #[test]
    fn test_remove_not_found_leaves_document_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a", "alpha")).unwrap();
        let before = fs::read(&path).unwrap();

        let result = store.remove("missing");

        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == "missing"));
        assert_eq!(store.len(), 1);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_manifest_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");
        fs::write(&path, "{not valid}").unwrap();

        let result = ManifestStore::load(&path);

        assert!(matches!(result, Err(LoadError::Corrupt { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not valid}");
    }

    #[test]
    fn test_load_twice_is_stable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a", "alpha")).unwrap();
        store.add(record("b", "beta")).unwrap();

        let first = ManifestStore::load(&path).unwrap();
        let second = ManifestStore::load(&path).unwrap();
        assert_eq!(first.records(), second.records());
    }

    #[test]
    fn test_find_helpers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = ManifestStore::load(temp_dir.path().join("packages.json")).unwrap();
        store.add(record("a", "alpha")).unwrap();
        store.add(record("b", "beta")).unwrap();

        assert_eq!(store.find("b").map(|r| r.display_name.as_str()), Some("beta"));
        assert_eq!(store.find_by_name("alpha").map(|r| r.id.as_str()), Some("a"));
        assert!(store.find("zzz").is_none());
    }

    #[test]
    fn test_lock_path_is_sidecar() {
        assert_eq!(
            lock_path(Path::new("/var/lib/tarstall/packages.json")),
            PathBuf::from("/var/lib/tarstall/packages.json.lock")
        );
    }

    #[test]
    fn test_add_rolls_back_when_persist_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let state_dir = temp_dir.path().join("state");
        let moved_dir = temp_dir.path().join("state-moved");
        let path = state_dir.join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a", "alpha")).unwrap();
        store.add(record("c", "gamma")).unwrap();
        let before = fs::read(&path).unwrap();

        // A regular file where the directory was fails for every user, root included
        fs::rename(&state_dir, &moved_dir).unwrap();
        fs::write(&state_dir, b"not a directory").unwrap();

        let add_result = store.add(record("b", "beta"));
        let remove_result = store.remove("a");

        fs::remove_file(&state_dir).unwrap();
        fs::rename(&moved_dir, &state_dir).unwrap();

        assert!(matches!(add_result, Err(StoreError::PersistFailed(_))));
        assert!(matches!(remove_result, Err(StoreError::PersistFailed(_))));
        let ids: Vec<_> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(fs::read(&path).unwrap(), before);

        let reloaded = ManifestStore::load(&path).unwrap();
        assert_eq!(reloaded.records(), store.records());
    }

    #[cfg(unix)]
    #[test]
    fn test_manifest_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("packages.json");

        let mut store = ManifestStore::load(&path).unwrap();
        store.add(record("a", "alpha")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        // An administrator's chosen mode survives later writes
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        store.add(record("b", "beta")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
