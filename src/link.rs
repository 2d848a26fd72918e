// src/link.rs

//! Exposing a package executable on the shared binary path

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create `bin_dir/<file name>` pointing at `executable`
///
/// When something already occupies the link location, `overwrite` is asked
/// whether to replace it; declining aborts with [`Error::Aborted`].
pub fn link_executable<F>(config: &Config, executable: &Path, overwrite: F) -> Result<PathBuf>
where
    F: FnOnce(&Path) -> Result<bool>,
{
    let link_path = config.symlink_path(executable);

    if fs::symlink_metadata(&link_path).is_ok() {
        if !overwrite(&link_path)? {
            return Err(Error::Aborted(format!(
                "{} already exists and was kept",
                link_path.display()
            )));
        }
        fs::remove_file(&link_path)?;
        debug!("Removed existing link at {}", link_path.display());
    }

    fs::create_dir_all(&config.bin_dir)?;
    create_symlink(executable, &link_path)?;
    debug!("Linked {} -> {}", link_path.display(), executable.display());

    Ok(link_path)
}

/// Remove the link for `executable` from the shared binary path
pub fn unlink_executable(config: &Config, executable: &Path) -> io::Result<PathBuf> {
    let link_path = config.symlink_path(executable);
    fs::remove_file(&link_path)?;
    Ok(link_path)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
