// src/desktop.rs

//! Desktop-environment integration via `.desktop` entries

use crate::config::Config;
use crate::discover::find_icon;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of the application entry for an installed package
pub fn render_desktop_entry(name: &str, executable: &Path, icon: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name={}\n\
         Exec={}\n\
         Icon={}\n\
         Terminal=false\n\
         Categories=Utility;\n",
        name,
        executable.display(),
        icon.display()
    )
}

/// Write (or overwrite) the desktop entry for `package_name`
pub fn create_desktop_file(
    config: &Config,
    executable: &Path,
    package_name: &str,
    install_root: &Path,
) -> io::Result<PathBuf> {
    let path = config.desktop_file_path(package_name);
    let icon = find_icon(install_root);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, render_desktop_entry(package_name, executable, &icon))?;

    debug!("Created desktop entry at {}", path.display());
    Ok(path)
}

/// Delete the desktop entry for `package_name`; a missing entry is fine
pub fn remove_desktop_file(config: &Config, package_name: &str) -> io::Result<Option<PathBuf>> {
    let path = config.desktop_file_path(package_name);
    match fs::remove_file(&path) {
        Ok(()) => {
            debug!("Removed desktop entry at {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
