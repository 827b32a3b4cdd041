//! Error handling for the screening engine.

use std::{fmt, io};

use crate::classifier::artifact::ArtifactError;

/// Specialized error type for screening operations
#[derive(Debug)]
pub enum ScreeningError {
    /// Error opening or reading a file
    IoError(io::Error),
    /// Error reading or writing tabular data
    CsvError(csv::Error),
    /// Malformed reference table data
    DataError(String),
    /// A record is missing or out of range on a required field
    InvalidInput(String),
    /// Error reading or writing the assessment history
    PersistenceError(rusqlite::Error),
    /// Error loading a model or scaler artifact
    ArtifactError(ArtifactError),
}

impl From<io::Error> for ScreeningError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

impl From<csv::Error> for ScreeningError {
    fn from(error: csv::Error) -> Self {
        Self::CsvError(error)
    }
}

impl From<rusqlite::Error> for ScreeningError {
    fn from(error: rusqlite::Error) -> Self {
        Self::PersistenceError(error)
    }
}

impl From<ArtifactError> for ScreeningError {
    fn from(error: ArtifactError) -> Self {
        Self::ArtifactError(error)
    }
}

impl fmt::Display for ScreeningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::CsvError(e) => write!(f, "CSV error: {e}"),
            Self::DataError(msg) => write!(f, "Data error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::PersistenceError(e) => write!(f, "Persistence error: {e}"),
            Self::ArtifactError(e) => write!(f, "Artifact error: {e}"),
        }
    }
}

impl std::error::Error for ScreeningError {}

/// Result type for screening operations
pub type Result<T> = std::result::Result<T, ScreeningError>;
