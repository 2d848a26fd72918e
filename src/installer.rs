// src/installer.rs

//! Install, uninstall and list flows
//!
//! These tie the extractor and the manifest store to the surrounding
//! collaborators (prompts, links, desktop entries). Cleanup of side effects
//! is best-effort and logged; manifest updates are never skipped because a
//! cleanup step failed.

use crate::config::Config;
use crate::desktop::{create_desktop_file, remove_desktop_file};
use crate::discover::{default_package_name, find_executables};
use crate::error::{Error, Result};
use crate::extract::{ExtractReport, extract};
use crate::link::{link_executable, unlink_executable};
use crate::manifest::{ManifestStore, PackageRecord};
use crate::prompt::Prompter;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Answers supplied up front instead of through prompts
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub name: Option<String>,
    /// Absolute, or relative to the package's install root
    pub executable: Option<PathBuf>,
    /// Replace an existing link without asking
    pub assume_yes: bool,
}

#[derive(Debug)]
pub struct InstallOutcome {
    pub record: PackageRecord,
    pub link: PathBuf,
    pub desktop_file: PathBuf,
    pub report: ExtractReport,
}

#[derive(Debug)]
pub struct UninstallOutcome {
    pub record: PackageRecord,
    /// Cleanup steps that failed but did not stop the uninstall
    pub cleanup_failures: Vec<String>,
}

/// Install the package contained in `archive`
pub fn install<R: BufRead, W: Write>(
    config: &Config,
    archive: &Path,
    options: &InstallOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<InstallOutcome> {
    if !archive.exists() {
        return Err(Error::ArchiveNotFound(archive.to_path_buf()));
    }

    let config = &config.absolute()?;
    let id = Uuid::new_v4().to_string();
    let default_name = default_package_name(archive);
    let install_root = config.install_root(&id, &default_name);

    let mut store = ManifestStore::load(config.manifest_path())?;

    info!("Extracting {} to {}", archive.display(), install_root.display());
    let result = extract(archive, &install_root)
        .map_err(Error::from)
        .and_then(|report| {
            for skipped in &report.skipped {
                warn!(
                    "Skipped {} entry in archive: {}",
                    skipped.entry_type,
                    skipped.path.display()
                );
            }
            register(config, &mut store, id, &default_name, &install_root, options, prompter)
                .map(|(record, link, desktop_file)| InstallOutcome {
                    record,
                    link,
                    desktop_file,
                    report,
                })
        });

    if result.is_err() {
        remove_install_root(&install_root);
    }

    result
}

fn register<R: BufRead, W: Write>(
    config: &Config,
    store: &mut ManifestStore,
    id: String,
    default_name: &str,
    install_root: &Path,
    options: &InstallOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<(PackageRecord, PathBuf, PathBuf)> {
    let name = match &options.name {
        Some(name) => name.clone(),
        None => prompter.friendly_name(default_name)?,
    };
    validate_package_name(&name)?;

    let executable = match &options.executable {
        Some(requested) => resolve_requested_executable(install_root, requested)?,
        None => {
            let candidates = find_executables(install_root).map_err(io::Error::from)?;
            prompter.select_executable(install_root, &candidates)?
        }
    };

    let link = link_executable(config, &executable, |existing| {
        if options.assume_yes {
            return Ok(true);
        }
        prompter.confirm(&format!("Symlink {} already exists. Overwrite?", existing.display()))
    })?;
    info!("Created symlink: {} -> {}", link.display(), executable.display());

    let desktop_file = match create_desktop_file(config, &executable, &name, install_root) {
        Ok(path) => path,
        Err(err) => {
            discard_link(config, &executable);
            return Err(err.into());
        }
    };

    let record = PackageRecord::new(id, name, install_root, executable);
    if let Err(err) = store.add(record.clone()) {
        discard_link(config, &record.executable);
        if let Err(cleanup) = remove_desktop_file(config, &record.display_name) {
            warn!("Failed to remove desktop entry {}: {}", desktop_file.display(), cleanup);
        }
        return Err(err.into());
    }

    info!("Package '{}' installed", record.display_name);
    Ok((record, link, desktop_file))
}

/// Names end up in file names, so they must stay a single path component
fn validate_package_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if invalid {
        Err(Error::InvalidPackageName(name.to_string()))
    } else {
        Ok(())
    }
}

fn resolve_requested_executable(install_root: &Path, requested: &Path) -> Result<PathBuf> {
    let candidate = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        install_root.join(requested)
    };

    let inside = match (candidate.canonicalize(), install_root.canonicalize()) {
        (Ok(resolved), Ok(root)) => resolved.starts_with(&root) && resolved.is_file(),
        _ => false,
    };

    if inside {
        Ok(candidate)
    } else {
        Err(Error::ExecutableNotInPackage(requested.to_path_buf()))
    }
}

fn discard_link(config: &Config, executable: &Path) {
    if let Err(err) = unlink_executable(config, executable) {
        warn!(
            "Failed to remove symlink {}: {}",
            config.symlink_path(executable).display(),
            err
        );
    }
}

fn remove_install_root(install_root: &Path) {
    match fs::remove_dir_all(install_root) {
        Ok(()) => info!("Removed partial install at {}", install_root.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            "Failed to remove partial install at {}: {}",
            install_root.display(),
            err
        ),
    }
}

/// Uninstall the first package whose display name is `name`
///
/// Link, desktop entry and install directory are removed best-effort;
/// the manifest entry is removed regardless.
pub fn uninstall(config: &Config, name: &str) -> Result<UninstallOutcome> {
    let config = &config.absolute()?;
    let mut store = ManifestStore::load(config.manifest_path())?;
    let record = store
        .find_by_name(name)
        .cloned()
        .ok_or_else(|| Error::PackageNotFound(name.to_string()))?;

    let mut cleanup_failures = Vec::new();

    match unlink_executable(config, &record.executable) {
        Ok(path) => info!("Removed symlink: {}", path.display()),
        Err(err) => {
            let message = format!(
                "Failed to remove symlink {}: {}",
                config.symlink_path(&record.executable).display(),
                err
            );
            warn!("{}", message);
            cleanup_failures.push(message);
        }
    }

    match remove_desktop_file(config, &record.display_name) {
        Ok(Some(path)) => info!("Removed desktop entry: {}", path.display()),
        Ok(None) => {}
        Err(err) => {
            let message = format!("Failed to remove desktop entry for {}: {}", name, err);
            warn!("{}", message);
            cleanup_failures.push(message);
        }
    }

    match fs::remove_dir_all(&record.install_root) {
        Ok(()) => info!("Removed installation directory: {}", record.install_root.display()),
        Err(err) => {
            let message = format!(
                "Failed to remove installation directory {}: {}",
                record.install_root.display(),
                err
            );
            warn!("{}", message);
            cleanup_failures.push(message);
        }
    }

    store.remove(&record.id)?;
    info!("Package '{}' uninstalled", record.display_name);

    Ok(UninstallOutcome {
        record,
        cleanup_failures,
    })
}

/// Installed packages in installation order
pub fn list(config: &Config) -> Result<Vec<PackageRecord>> {
    let config = config.absolute()?;
    let store = ManifestStore::load(config.manifest_path())?;
    Ok(store.records().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_validation() {
        assert!(validate_package_name("My Editor").is_ok());
        assert!(validate_package_name("tool-1.2").is_ok());

        for bad in ["", ".", "..", "../evil", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_package_name(bad), Err(Error::InvalidPackageName(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resolve_relative_executable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join("bin/tool"), b"x").unwrap();

        let resolved = resolve_requested_executable(root, Path::new("bin/tool")).unwrap();
        assert_eq!(resolved, root.join("bin/tool"));
    }

    #[test]
    fn test_resolve_rejects_outside_executable() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("pkg");
        fs::create_dir_all(&root).unwrap();
        fs::write(temp_dir.path().join("other"), b"x").unwrap();

        let result = resolve_requested_executable(&root, Path::new("../other"));
        assert!(matches!(result, Err(Error::ExecutableNotInPackage(_))));

        let result = resolve_requested_executable(&root, Path::new("missing"));
        assert!(matches!(result, Err(Error::ExecutableNotInPackage(_))));
    }

    #[test]
    fn test_install_missing_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::new(
            temp_dir.path().join("pkgs"),
            temp_dir.path().join("bin"),
            temp_dir.path().join("apps"),
        );
        let mut prompter = Prompter::new(io::empty(), io::sink());

        let result = install(
            &config,
            &temp_dir.path().join("nope.tar.gz"),
            &InstallOptions::default(),
            &mut prompter,
        );
        assert!(matches!(result, Err(Error::ArchiveNotFound(_))));
    }

    #[test]
    fn test_uninstall_unknown_package() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config::new(
            temp_dir.path().join("pkgs"),
            temp_dir.path().join("bin"),
            temp_dir.path().join("apps"),
        );

        let result = uninstall(&config, "ghost");
        assert!(matches!(result, Err(Error::PackageNotFound(name)) if name == "ghost"));
    }
}
