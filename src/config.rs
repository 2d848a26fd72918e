// src/config.rs

//! Filesystem locations used by tarstall
//!
//! Every directory the installer touches is carried in [`Config`] and
//! handed to each component explicitly.

use std::io;
use std::path::{self, Path, PathBuf};

/// Default base directory for extracted packages and the manifest
pub const DEFAULT_PACKAGES_DIR: &str = "/usr/local/share/tarstall";

/// Default directory receiving executable symlinks
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Default directory receiving `.desktop` entries
pub const DEFAULT_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// File name of the manifest inside the packages directory
pub const MANIFEST_FILE_NAME: &str = "packages.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub packages_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub applications_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            packages_dir: PathBuf::from(DEFAULT_PACKAGES_DIR),
            bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
            applications_dir: PathBuf::from(DEFAULT_APPLICATIONS_DIR),
        }
    }
}

impl Config {
    pub fn new(
        packages_dir: impl Into<PathBuf>,
        bin_dir: impl Into<PathBuf>,
        applications_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            packages_dir: packages_dir.into(),
            bin_dir: bin_dir.into(),
            applications_dir: applications_dir.into(),
        }
    }

    /// Same locations resolved against the current directory
    ///
    /// Paths recorded in the manifest and symlink targets must not depend
    /// on where the tool happens to be run from.
    pub fn absolute(&self) -> io::Result<Self> {
        Ok(Self {
            packages_dir: path::absolute(&self.packages_dir)?,
            bin_dir: path::absolute(&self.bin_dir)?,
            applications_dir: path::absolute(&self.applications_dir)?,
        })
    }

    /// Path of the JSON manifest listing installed packages
    pub fn manifest_path(&self) -> PathBuf {
        self.packages_dir.join(MANIFEST_FILE_NAME)
    }

    /// Directory a package with the given id and name is extracted into
    pub fn install_root(&self, id: &str, name: &str) -> PathBuf {
        self.packages_dir.join(format!("{}-{}", id, name))
    }

    /// Location of the symlink exposing `executable` on the shared bin path
    pub fn symlink_path(&self, executable: &Path) -> PathBuf {
        match executable.file_name() {
            Some(name) => self.bin_dir.join(name),
            None => self.bin_dir.join(executable),
        }
    }

    /// Location of the desktop entry for a package name
    pub fn desktop_file_path(&self, package_name: &str) -> PathBuf {
        self.applications_dir
            .join(format!("{}.desktop", package_name.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locations() {
        let config = Config::default();
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/usr/local/share/tarstall/packages.json")
        );
        assert_eq!(config.bin_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(config.applications_dir, PathBuf::from("/usr/share/applications"));
    }

    #[test]
    fn test_absolute_resolves_relative_dirs() {
        let config = Config::new("pkgs", "/opt/bin", "apps").absolute().unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert!(config.packages_dir.is_absolute());
        assert_eq!(config.packages_dir, cwd.join("pkgs"));
        assert_eq!(config.bin_dir, PathBuf::from("/opt/bin"));
        assert_eq!(config.applications_dir, cwd.join("apps"));
    }

    #[test]
    fn test_install_root_combines_id_and_name() {
        let config = Config::new("/opt/pkgs", "/opt/bin", "/opt/apps");
        assert_eq!(
            config.install_root("1234", "editor"),
            PathBuf::from("/opt/pkgs/1234-editor")
        );
    }

    #[test]
    fn test_symlink_uses_executable_file_name() {
        let config = Config::new("/opt/pkgs", "/opt/bin", "/opt/apps");
        assert_eq!(
            config.symlink_path(Path::new("/opt/pkgs/1234-editor/bin/edit")),
            PathBuf::from("/opt/bin/edit")
        );
    }

    #[test]
    fn test_desktop_file_is_lowercased() {
        let config = Config::new("/opt/pkgs", "/opt/bin", "/opt/apps");
        assert_eq!(
            config.desktop_file_path("My Editor"),
            PathBuf::from("/opt/apps/my editor.desktop")
        );
    }
}
