//! CSV writer for the score table - two columns, `wallet,credit_score`

use super::scorer::ScoredWallet;
use super::writer_backend::{ensure_parent_dir, ScoreWriterBackend, ScoreWriterError};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct CsvScoreWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvScoreWriter {
    /// Create (or truncate) the CSV file at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;

        let file = File::create(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        log::info!("📝 Writing scores to: {}", path.display());
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn write_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError> {
        for scored in scores {
            self.writer.serialize(scored)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), ScoreWriterError> {
        self.writer.flush()?;
        log::debug!("✅ Flushed score CSV: {}", self.path.display());
        Ok(())
    }
}

impl Drop for CsvScoreWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[async_trait]
impl ScoreWriterBackend for CsvScoreWriter {
    async fn write_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError> {
        CsvScoreWriter::write_scores(self, scores)
    }

    async fn flush(&mut self) -> Result<(), ScoreWriterError> {
        CsvScoreWriter::flush(self)
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}
