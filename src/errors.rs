/*!
 * Error types for the subtitler application.
 *
 * This module contains custom error types for the conversion core and the
 * application layer, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while encoding, parsing or converting subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Timestamp text does not match `HH:MM:SS,mmm`
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// Input file missing or unreadable
    #[error("Unreadable file {path:?}: {source}")]
    UnreadableFile {
        /// Path of the input file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Output path not writable
    #[error("Unwritable file {path:?}: {source}")]
    UnwritableFile {
        /// Path of the output file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The parser found no cues in a non-empty document
    #[error("No subtitle cues found in {path:?}")]
    EmptyResult {
        /// Path of the input file
        path: PathBuf,
    },

    /// XML serialization failed
    #[error("XML error: {0}")]
    Xml(String),

    /// A per-file worker did not complete
    #[error("Conversion task failed: {0}")]
    Task(String),
}

impl SubtitleError {
    /// Whether this error is a warning rather than a hard failure
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

impl From<quick_xml::Error> for SubtitleError {
    fn from(error: quick_xml::Error) -> Self {
        Self::Xml(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
