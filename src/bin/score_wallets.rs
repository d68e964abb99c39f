//! Wallet Scoring Binary - Batch Credit Scoring
//!
//! Scores every wallet in a lending-protocol transaction ledger.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin score_wallets -- --input user-transactions.json
//! ```
//!
//! ## Outputs
//!
//! - `wallet_scores.csv` - wallet,credit_score sorted by descending score
//! - `score_distribution.json` - fixed-width histogram over 0-1000
//! - `--backend sqlite` writes the score table to `data/wallet_scores.db` instead
//! - `--features-output <path>` adds a JSONL report per wallet
//!
//! RUST_LOG sets the log level (default: info).

use walletscore::config::ScoringConfig;
use walletscore::runner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = ScoringConfig::from_args()?;

    log::info!("🚀 Starting wallet credit scoring");
    log::info!("   Input: {}", config.input_path.display());
    for (backend, path) in config.score_tables() {
        log::info!("   Scores: {} ({:?})", path.display(), backend);
    }
    log::info!("   Histogram: {} ({} bins)", config.histogram_path.display(), config.histogram_bins);
    if let Some(path) = &config.features_path {
        log::info!("   Wallet reports: {}", path.display());
    }

    match runner::run(&config).await {
        Ok(summary) => {
            log::info!(
                "🎉 Pipeline finished: {} wallets scored from {} of {} records",
                summary.diagnostics.wallet_count,
                summary.diagnostics.surviving_count,
                summary.diagnostics.input_count
            );
            Ok(())
        }
        Err(e) => {
            log::error!("❌ FATAL ERROR: {}", e);
            Err(e.into())
        }
    }
}
