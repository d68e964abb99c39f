//! Credit scoring: heuristic raw score per wallet, then batch min-max rescaling

use super::aggregator::WalletFeatureVector;
use super::normalizer::RecognizedAction;
use serde::Serialize;
use std::collections::BTreeMap;

pub const BASE_SCORE: f64 = 500.0;
pub const LIQUIDATION_PENALTY: f64 = 300.0;
pub const MAX_REPAY_RATIO: f64 = 1.5;

/// Published score range
pub const MIN_CREDIT_SCORE: u32 = 0;
pub const MAX_CREDIT_SCORE: u32 = 1000;
/// Score given to every wallet when all raw scores are identical
pub const NEUTRAL_CREDIT_SCORE: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredWallet {
    pub wallet: String,
    pub credit_score: u32,
}

/// Raw score components for one wallet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub health_factor: f64,
    pub health_score: f64,
    pub repay_ratio: f64,
    pub reliability_score: f64,
    pub age_score: f64,
    pub activity_score: f64,
    pub net_deposit_usd: f64,
    pub provider_score: f64,
    pub liquidation_penalty: f64,
    pub raw_score: f64,
}

/// Scored batch plus the rescaling bounds it was computed with
#[derive(Debug, Clone)]
pub struct ScoreBatch {
    /// Sorted by descending credit score, then wallet id
    pub scores: Vec<ScoredWallet>,
    pub raw_min: f64,
    pub raw_max: f64,
}

pub struct CreditScorer;

impl CreditScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the raw score and its components
    ///
    /// # Components
    /// - Health: deposits relative to borrows, log-damped
    /// - Reliability: repays per borrow, capped at 1.5
    /// - Age and activity: log-damped wallet lifetime and transaction count
    /// - Provider: net liquidity supplied (deposits minus redemptions)
    /// - Liquidation penalty: flat 300 per liquidation call
    pub fn breakdown(&self, features: &WalletFeatureVector) -> ScoreBreakdown {
        let deposit_value = features.value(RecognizedAction::Deposit);
        let borrow_value = features.value(RecognizedAction::Borrow);
        let redeem_value = features.value(RecognizedAction::RedeemUnderlying);
        let repay_count = features.count(RecognizedAction::Repay) as f64;
        let borrow_count = features.count(RecognizedAction::Borrow) as f64;
        let liquidation_count = features.count(RecognizedAction::LiquidationCall) as f64;

        let health_factor = deposit_value / (borrow_value + 1.0);
        let health_score = health_factor.ln_1p() * 50.0;

        let repay_ratio = (repay_count / (borrow_count + 1.0)).min(MAX_REPAY_RATIO);
        let reliability_score = repay_ratio * 100.0;

        let age_score = features.wallet_age_days.ln_1p() * 25.0;
        let activity_score = (features.transaction_count as f64).ln_1p() * 10.0;

        let net_deposit_usd = deposit_value - redeem_value;
        let provider_score = if net_deposit_usd > 0.0 {
            net_deposit_usd.ln_1p() * 0.1
        } else {
            0.0
        };

        let liquidation_penalty = liquidation_count * LIQUIDATION_PENALTY;

        let raw_score = BASE_SCORE
            + health_score
            + reliability_score
            + age_score
            + activity_score
            + provider_score
            - liquidation_penalty;

        ScoreBreakdown {
            health_factor,
            health_score,
            repay_ratio,
            reliability_score,
            age_score,
            activity_score,
            net_deposit_usd,
            provider_score,
            liquidation_penalty,
            raw_score,
        }
    }

    pub fn raw_score(&self, features: &WalletFeatureVector) -> f64 {
        self.breakdown(features).raw_score
    }

    /// Score every wallet in the batch.
    ///
    /// Rescaling needs the global min and max, so all raw scores are
    /// computed before any credit score is assigned. The bounds only cover
    /// finite raw scores; a wallet whose sums overflowed is pinned to an end
    /// of the range instead.
    pub fn score_batch(&self, features: &BTreeMap<String, WalletFeatureVector>) -> ScoreBatch {
        let raw_scores: Vec<(&String, f64)> = features
            .iter()
            .map(|(wallet, f)| (wallet, self.raw_score(f)))
            .collect();

        let finite = || raw_scores.iter().map(|(_, raw)| *raw).filter(|raw| raw.is_finite());
        let raw_min = finite().fold(f64::INFINITY, f64::min);
        let raw_max = finite().fold(f64::NEG_INFINITY, f64::max);

        let mut scores: Vec<ScoredWallet> = raw_scores
            .into_iter()
            .map(|(wallet, raw)| {
                let credit_score = if raw.is_finite() {
                    rescale(raw, raw_min, raw_max)
                } else {
                    log::warn!("⚠️  Non-finite raw score {} for {}", raw, wallet);
                    if raw == f64::INFINITY {
                        MAX_CREDIT_SCORE
                    } else {
                        MIN_CREDIT_SCORE
                    }
                };
                ScoredWallet {
                    wallet: wallet.clone(),
                    credit_score,
                }
            })
            .collect();

        scores.sort_by(|a, b| {
            b.credit_score
                .cmp(&a.credit_score)
                .then_with(|| a.wallet.cmp(&b.wallet))
        });

        ScoreBatch {
            scores,
            raw_min,
            raw_max,
        }
    }

    pub fn score_all(&self, features: &BTreeMap<String, WalletFeatureVector>) -> Vec<ScoredWallet> {
        self.score_batch(features).scores
    }
}

impl Default for CreditScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a raw score onto [0, 1000] given the batch bounds.
///
/// Evaluated as `1000 * (raw - lo) / (hi - lo)` and truncated, never
/// rounded. The maximal wallet always lands on exactly 1000.
pub fn rescale(raw_score: f64, raw_min: f64, raw_max: f64) -> u32 {
    if raw_max == raw_min {
        return NEUTRAL_CREDIT_SCORE;
    }
    if raw_score == raw_max {
        return MAX_CREDIT_SCORE;
    }

    let scaled = 1000.0 * (raw_score - raw_min) / (raw_max - raw_min);
    scaled
        .floor()
        .clamp(MIN_CREDIT_SCORE as f64, MAX_CREDIT_SCORE as f64) as u32
}
