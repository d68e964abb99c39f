//! Unified writer interface for the score table
//!
//! Routes writes to either the CSV or SQLite backend based on configuration.

use super::csv_writer::CsvScoreWriter;
use super::histogram::ScoreHistogram;
use super::scorer::ScoredWallet;
use super::sqlite_writer::SqliteScoreWriter;
use super::writer_backend::{ensure_parent_dir, ScoreWriterBackend, ScoreWriterError};
use crate::config::BackendType;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Unified writer that routes to either CSV or SQLite backend
pub enum ScoreWriter {
    Csv(CsvScoreWriter),
    Sqlite(SqliteScoreWriter),
}

impl ScoreWriter {
    /// Create a new score writer based on backend type
    pub fn new(backend: BackendType, path: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        match backend {
            BackendType::Csv => Ok(ScoreWriter::Csv(CsvScoreWriter::new(path)?)),
            BackendType::Sqlite => Ok(ScoreWriter::Sqlite(SqliteScoreWriter::new(path)?)),
        }
    }

    fn backend(&mut self) -> &mut dyn ScoreWriterBackend {
        match self {
            ScoreWriter::Csv(w) => w,
            ScoreWriter::Sqlite(w) => w,
        }
    }

    pub async fn write_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError> {
        self.backend().write_scores(scores).await
    }

    pub async fn flush(&mut self) -> Result<(), ScoreWriterError> {
        self.backend().flush().await
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            ScoreWriter::Csv(_) => "CSV",
            ScoreWriter::Sqlite(_) => "SQLite",
        }
    }
}

/// Write the score distribution as pretty-printed JSON
pub fn write_histogram(path: impl AsRef<Path>, histogram: &ScoreHistogram) -> Result<(), ScoreWriterError> {
    ensure_parent_dir(path.as_ref())?;
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, histogram)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
