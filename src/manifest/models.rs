// src/manifest/models.rs

//! Records stored in the package manifest

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One installed package
///
/// Field names on disk match the manifest document format
/// (`uuid`, `name`, `install_path`, `executable`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "install_path")]
    pub install_root: PathBuf,
    pub executable: PathBuf,
}

impl PackageRecord {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        install_root: impl Into<PathBuf>,
        executable: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            install_root: install_root.into(),
            executable: executable.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_manifest_field_names() {
        let record = PackageRecord::new(
            "5f0c",
            "Editor",
            "/usr/local/share/tarstall/5f0c-editor",
            "/usr/local/share/tarstall/5f0c-editor/bin/edit",
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["uuid"], "5f0c");
        assert_eq!(value["name"], "Editor");
        assert_eq!(value["install_path"], "/usr/local/share/tarstall/5f0c-editor");
        assert_eq!(value["executable"], "/usr/local/share/tarstall/5f0c-editor/bin/edit");
    }

    #[test]
    fn test_record_parses_document_entry() {
        let raw = r#"{
          "uuid": "abc",
          "name": "tool",
          "install_path": "/opt/abc-tool",
          "executable": "/opt/abc-tool/tool"
        }"#;

        let record: PackageRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.display_name, "tool");
        assert_eq!(record.install_root(), Path::new("/opt/abc-tool"));
        assert_eq!(record.executable(), Path::new("/opt/abc-tool/tool"));
    }
}
