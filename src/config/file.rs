//
//  redmine-client
//  config/file.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration File I/O
//!
//! Thin wrappers over `std::fs` used by
//! [`TransportConfig`](super::TransportConfig). I/O failures are reported as
//! [`ApiError::Configuration`] naming the path.
//!
//! ## Notes
//!
//! - Write operations create missing parent directories
//! - Reads return the raw file content

use std::path::Path;

use crate::api::common::{ApiError, Result};

/// Reads the contents of a configuration file.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if the file cannot be read.
pub fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        ApiError::Configuration(format!("cannot read {}: {e}", path.display()))
    })
}

/// Writes a configuration file, creating parent directories as needed.
///
/// Existing files are overwritten.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] if a directory or the file cannot be
/// written.
pub fn write_config_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApiError::Configuration(format!("cannot create {}: {e}", parent.display()))
        })?;
    }
    std::fs::write(path, content)
        .map_err(|e| ApiError::Configuration(format!("cannot write {}: {e}", path.display())))
}

/// Returns `true` if a file exists at `path`.
pub fn config_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(!config_exists(&path));
        write_config_file(&path, "host = \"x\"\n").unwrap();
        assert!(config_exists(&path));
        assert_eq!(read_config_file(&path).unwrap(), "host = \"x\"\n");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(msg) if msg.contains("absent.toml")));
    }
}
