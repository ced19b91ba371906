// ABOUTME: Utility functions for the big-deck application
// ABOUTME: Provides path validation and directory helpers shared by generate and serve

use crate::errors::{DeckError, Result};
use std::path::{Path, PathBuf};

/// Validate that a file exists
pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(DeckError::ValidationError(format!(
            "Path is not a file: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists, creating it if necessary
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    let parent = parent_dir(file_path);
    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(DeckError::FileReadError)?;
    } else if !parent.is_dir() {
        return Err(DeckError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            parent
        )));
    }
    Ok(())
}

/// Directory containing `path`; `.` for bare file names.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Get the absolute path
pub fn get_absolute_path(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        DeckError::ValidationError(format!("Failed to get absolute path for {:?}: {}", path, e))
    })
}
