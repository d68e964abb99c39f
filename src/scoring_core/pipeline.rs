//! Batch driver: normalize → aggregate → score

use super::aggregator::{aggregate, WalletFeatureVector};
use super::normalizer::{normalize_all, DropTally};
use super::scorer::{CreditScorer, ScoreBreakdown, ScoredWallet};
use crate::error::PipelineError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct PipelineDiagnostics {
    pub input_count: usize,
    pub surviving_count: usize,
    pub dropped: DropTally,
    pub wallet_count: usize,
    pub raw_min: f64,
    pub raw_max: f64,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Sorted by descending credit score, ties by wallet id
    pub scores: Vec<ScoredWallet>,
    pub features: BTreeMap<String, WalletFeatureVector>,
    pub diagnostics: PipelineDiagnostics,
}

impl PipelineOutput {
    pub fn breakdown(&self, wallet: &str) -> Option<ScoreBreakdown> {
        self.features
            .get(wallet)
            .map(|f| CreditScorer::new().breakdown(f))
    }
}

pub struct ScoringPipeline {
    scorer: CreditScorer,
}

impl ScoringPipeline {
    pub fn new() -> Self {
        Self {
            scorer: CreditScorer::new(),
        }
    }

    /// Run all three stages over an already-loaded ledger.
    ///
    /// Fails only when nothing survives normalization.
    pub fn run(&self, records: Vec<Value>) -> Result<PipelineOutput, PipelineError> {
        log::info!("🧹 Normalizing transactions...");
        let report = normalize_all(records);

        log::info!("   Initial row count: {}", report.input_count);
        log::info!(
            "   Rows with a missing USD value: {}",
            report.dropped.missing_value()
        );
        if report.dropped.total() > 0 {
            log::info!(
                "   Dropped {} records (malformed_record={}, missing_wallet={}, malformed_payload={}, non_finite_value={}, unparsable_timestamp={})",
                report.dropped.total(),
                report.dropped.malformed_record,
                report.dropped.missing_wallet,
                report.dropped.malformed_payload,
                report.dropped.non_finite_value,
                report.dropped.unparsable_timestamp
            );
        }

        if report.transactions.is_empty() {
            return Err(PipelineError::EmptyResult {
                total: report.input_count,
            });
        }

        log::info!(
            "✅ Found {} valid transactions",
            report.transactions.len()
        );

        log::info!("🧮 Engineering features for each wallet...");
        let features = aggregate(&report.transactions);
        log::info!("✅ Built feature vectors for {} wallets", features.len());

        log::info!("📊 Calculating credit scores...");
        let batch = self.scorer.score_batch(&features);
        log::info!(
            "✅ Scoring complete (raw score range {:.4} to {:.4})",
            batch.raw_min,
            batch.raw_max
        );

        let diagnostics = PipelineDiagnostics {
            input_count: report.input_count,
            surviving_count: report.transactions.len(),
            dropped: report.dropped,
            wallet_count: features.len(),
            raw_min: batch.raw_min,
            raw_max: batch.raw_max,
        };

        Ok(PipelineOutput {
            scores: batch.scores,
            features,
            diagnostics,
        })
    }
}

impl Default for ScoringPipeline {
    fn default() -> Self {
        Self::new()
    }
}
