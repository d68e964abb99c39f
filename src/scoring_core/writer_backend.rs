//! Writer backend trait for scored wallets
//!
//! Defines the interface for persisting the final score table to different backends.

use super::scorer::ScoredWallet;
use async_trait::async_trait;

#[derive(Debug)]
pub enum ScoreWriterError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Csv(String),
    Database(String),
}

impl From<std::io::Error> for ScoreWriterError {
    fn from(err: std::io::Error) -> Self {
        ScoreWriterError::Io(err)
    }
}

impl From<serde_json::Error> for ScoreWriterError {
    fn from(err: serde_json::Error) -> Self {
        ScoreWriterError::Serialization(err)
    }
}

impl From<csv::Error> for ScoreWriterError {
    fn from(err: csv::Error) -> Self {
        ScoreWriterError::Csv(err.to_string())
    }
}

impl From<rusqlite::Error> for ScoreWriterError {
    fn from(err: rusqlite::Error) -> Self {
        ScoreWriterError::Database(err.to_string())
    }
}

impl std::fmt::Display for ScoreWriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreWriterError::Io(e) => write!(f, "IO error: {}", e),
            ScoreWriterError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ScoreWriterError::Csv(e) => write!(f, "CSV error: {}", e),
            ScoreWriterError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ScoreWriterError {}

/// Create the parent directory of an output path if it has one
pub(crate) fn ensure_parent_dir(path: &std::path::Path) -> Result<(), ScoreWriterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScoreWriterError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create output directory {}: {}", parent.display(), e),
                ))
            })?;
        }
    }
    Ok(())
}

/// Backend trait for writing the score table
#[async_trait]
pub trait ScoreWriterBackend: Send {
    /// Write the full, already-sorted score table, replacing earlier output
    async fn write_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ScoreWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
