// src/lib.rs

//! tarstall
//!
//! Installs self-contained applications shipped as `.tar.gz` archives.
//!
//! # Architecture
//!
//! - Extraction: streaming gzip + tar unpacking that refuses entries
//!   escaping the install directory
//! - Manifest: one JSON document listing installed packages, rewritten
//!   atomically after every change
//! - Integration: executable symlinks and `.desktop` entries, removed again
//!   on uninstall
//! - Configuration: every directory passed in through [`Config`]

pub mod config;
pub mod desktop;
pub mod discover;
mod error;
pub mod extract;
pub mod installer;
pub mod link;
pub mod manifest;
pub mod prompt;

pub use config::Config;
pub use error::{Error, ExtractError, LoadError, PersistError, Result, StoreError};
pub use extract::{ExtractReport, extract};
pub use manifest::{ManifestStore, PackageRecord};
