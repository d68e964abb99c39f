//! SQLite writer for the score table
//!
//! Each run replaces the `wallet_scores` table contents so re-runs never
//! accumulate state.

use super::scorer::ScoredWallet;
use super::writer_backend::{ensure_parent_dir, ScoreWriterBackend, ScoreWriterError};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct SqliteScoreWriter {
    conn: Connection,
}

impl SqliteScoreWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        ensure_parent_dir(db_path.as_ref())?;

        let conn = Connection::open(db_path.as_ref())?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS wallet_scores (
                wallet TEXT PRIMARY KEY NOT NULL,
                credit_score INTEGER NOT NULL,
                position INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_credit_score ON wallet_scores(credit_score DESC)",
            [],
        )?;

        log::info!(
            "✅ SQLite score table initialized: {}",
            db_path.as_ref().display()
        );

        Ok(Self { conn })
    }

    fn replace_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM wallet_scores", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO wallet_scores (wallet, credit_score, position) VALUES (?1, ?2, ?3)",
            )?;
            for (rank, scored) in scores.iter().enumerate() {
                stmt.execute(params![scored.wallet, scored.credit_score, (rank + 1) as i64])?;
            }
        }

        tx.commit()?;

        log::debug!("✅ Wrote {} scores to SQLite", scores.len());
        Ok(())
    }
}

#[async_trait]
impl ScoreWriterBackend for SqliteScoreWriter {
    async fn write_scores(&mut self, scores: &[ScoredWallet]) -> Result<(), ScoreWriterError> {
        self.replace_scores(scores)
    }

    async fn flush(&mut self) -> Result<(), ScoreWriterError> {
        // Every write commits its own transaction
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
