//! JSONL writer for per-wallet reports - features, score breakdown and final score

use super::aggregator::WalletFeatureVector;
use super::normalizer::RecognizedAction;
use super::scorer::{ScoreBreakdown, ScoredWallet};
use super::writer_backend::{ensure_parent_dir, ScoreWriterError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub count: u64,
    pub value_usd: f64,
}

#[derive(Debug, Serialize)]
pub struct WalletReport {
    pub wallet: String,
    pub credit_score: u32,
    pub first_tx_time: i64,
    pub last_tx_time: i64,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub wallet_age_days: f64,
    pub transaction_count: u64,
    pub actions: BTreeMap<&'static str, ActionReport>,
    pub breakdown: ScoreBreakdown,
}

impl WalletReport {
    pub fn new(scored: &ScoredWallet, features: &WalletFeatureVector, breakdown: ScoreBreakdown) -> Self {
        let actions = RecognizedAction::all()
            .into_iter()
            .map(|action| {
                let stats = features.stats(action);
                (
                    action.as_str(),
                    ActionReport {
                        count: stats.count,
                        value_usd: stats.value_usd,
                    },
                )
            })
            .collect();

        Self {
            wallet: scored.wallet.clone(),
            credit_score: scored.credit_score,
            first_tx_time: features.first_tx_time,
            last_tx_time: features.last_tx_time,
            first_seen: to_rfc3339(features.first_tx_time),
            last_seen: to_rfc3339(features.last_tx_time),
            wallet_age_days: features.wallet_age_days,
            transaction_count: features.transaction_count,
            actions,
            breakdown,
        }
    }
}

fn to_rfc3339(timestamp: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).map(|dt| dt.to_rfc3339())
}

pub struct WalletReportWriter {
    writer: BufWriter<File>,
    written: usize,
}

impl WalletReportWriter {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ScoreWriterError> {
        ensure_parent_dir(path.as_ref())?;
        let file = File::create(path.as_ref())?;

        log::info!("📝 Writing wallet reports to: {}", path.as_ref().display());
        Ok(Self {
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write_report(&mut self, report: &WalletReport) -> Result<(), ScoreWriterError> {
        let json = serde_json::to_string(report)?;
        writeln!(self.writer, "{}", json)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<(), ScoreWriterError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for WalletReportWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
