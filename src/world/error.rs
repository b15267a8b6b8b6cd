//! Error types for world data loading.

use std::path::Path;
use std::{fs, io};
use thiserror::Error;

/// Errors that can occur when loading level, palette or tuning data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A layer grid doesn't match the ground layer's dimensions.
    #[error("Grid mismatch in layer '{layer}': expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    GridMismatch {
        layer: String,
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// Invalid palette reference.
    #[error("Unknown palette entry '{character}' in layer '{layer}' at position ({x}, {y})")]
    UnknownPaletteEntry {
        layer: String,
        character: char,
        x: usize,
        y: usize,
    },

    /// Every level needs something to stand on.
    #[error("Level '{0}' has no Ground layer")]
    MissingGroundLayer(String),

    /// The player start lies outside the map.
    #[error("Player start ({x}, {y}) is outside the {width}x{height} map")]
    StartOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Read a data file, telling a missing file apart from an unreadable one.
pub fn read_data_file(path: impl AsRef<Path>) -> Result<String, DataLoadError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound(path.display().to_string()),
        _ => DataLoadError::ReadError {
            path: path.display().to_string(),
            details: e.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        match read_data_file("assets/data/no-such-file.ron") {
            Err(DataLoadError::FileNotFound(path)) => assert!(path.ends_with("no-such-file.ron")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn directory_is_a_read_error() {
        match read_data_file("assets/data") {
            Err(DataLoadError::ReadError { path, .. }) => assert_eq!(path, "assets/data"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
