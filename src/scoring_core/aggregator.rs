//! Per-wallet feature aggregation over normalized transactions

use super::normalizer::{NormalizedTransaction, RecognizedAction};
use std::collections::BTreeMap;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionStats {
    pub count: u64,
    pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletFeatureVector {
    pub wallet: String,
    pub first_tx_time: i64,
    pub last_tx_time: i64,
    pub wallet_age_days: f64,
    pub transaction_count: u64,
    actions: [ActionStats; 5],
}

impl WalletFeatureVector {
    pub fn new(wallet: String, timestamp: i64) -> Self {
        Self {
            wallet,
            first_tx_time: timestamp,
            last_tx_time: timestamp,
            wallet_age_days: 1.0,
            transaction_count: 0,
            actions: [ActionStats::default(); 5],
        }
    }

    /// Fold one transaction in. Transactions without a usable value or
    /// timestamp are ignored.
    pub fn add_transaction(&mut self, tx: &NormalizedTransaction) {
        let (Some(timestamp), Ok(value_usd)) = (tx.timestamp, tx.value_usd) else {
            return;
        };

        self.first_tx_time = self.first_tx_time.min(timestamp);
        self.last_tx_time = self.last_tx_time.max(timestamp);
        self.wallet_age_days = age_in_days(self.first_tx_time, self.last_tx_time);
        self.transaction_count += 1;

        if let Some(action) = tx.action.recognized() {
            let stats = &mut self.actions[action.index()];
            stats.count += 1;
            stats.value_usd += value_usd;
        }
    }

    pub fn stats(&self, action: RecognizedAction) -> ActionStats {
        self.actions[action.index()]
    }

    pub fn count(&self, action: RecognizedAction) -> u64 {
        self.stats(action).count
    }

    pub fn value(&self, action: RecognizedAction) -> f64 {
        self.stats(action).value_usd
    }

    /// Sum of the five recognized per-action counts
    pub fn recognized_count(&self) -> u64 {
        self.actions.iter().map(|s| s.count).sum()
    }
}

/// Span between first and last activity in days, never below one
pub fn age_in_days(first_tx_time: i64, last_tx_time: i64) -> f64 {
    let span = i128::from(last_tx_time) - i128::from(first_tx_time);
    let days = span as f64 / SECONDS_PER_DAY;
    days.max(1.0)
}

pub struct WalletAggregator {
    wallets: BTreeMap<String, WalletFeatureVector>,
}

impl WalletAggregator {
    pub fn new() -> Self {
        Self {
            wallets: BTreeMap::new(),
        }
    }

    pub fn add_transaction(&mut self, tx: &NormalizedTransaction) {
        let Some(timestamp) = tx.timestamp else {
            return;
        };
        if tx.value_usd.is_err() {
            return;
        }

        self.wallets
            .entry(tx.wallet.clone())
            .or_insert_with(|| WalletFeatureVector::new(tx.wallet.clone(), timestamp))
            .add_transaction(tx);
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    pub fn get_features(&self, wallet: &str) -> Option<&WalletFeatureVector> {
        self.wallets.get(wallet)
    }

    pub fn into_features(self) -> BTreeMap<String, WalletFeatureVector> {
        self.wallets
    }
}

impl Default for WalletAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Group transactions by wallet and reduce each group to a feature vector
pub fn aggregate(transactions: &[NormalizedTransaction]) -> BTreeMap<String, WalletFeatureVector> {
    let mut aggregator = WalletAggregator::new();
    for tx in transactions {
        aggregator.add_transaction(tx);
    }
    aggregator.into_features()
}
