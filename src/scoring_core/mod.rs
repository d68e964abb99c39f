//! Scoring Core - Wallet Credit Scoring Pipeline
//!
//! Turns a lending-protocol transaction ledger into one bounded credit score
//! per wallet.
//!
//! # Architecture
//!
//! ```text
//! JSON ledger → load_transactions
//!     ↓
//! Normalizer (typed parse, token decimals, USD value, drop tally)
//!     ↓
//! WalletAggregator (per-wallet counts, USD sums, age)
//!     ↓
//! CreditScorer (raw score → batch min-max rescale to 0-1000)
//!     ↓
//! ScoreWriter → CSV or SQLite backend, histogram JSON, optional JSONL reports
//! ```

pub mod aggregator;
pub mod csv_writer;
pub mod histogram;
pub mod jsonl_writer;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod scorer;
pub mod sqlite_writer;
pub mod tokens;
pub mod writer;
pub mod writer_backend;

pub use aggregator::{aggregate, ActionStats, WalletAggregator, WalletFeatureVector};
pub use csv_writer::CsvScoreWriter;
pub use histogram::{HistogramBin, ScoreHistogram};
pub use jsonl_writer::{WalletReport, WalletReportWriter};
pub use normalizer::{
    normalize, normalize_all, Action, DropReason, DropTally, NormalizationReport,
    NormalizedTransaction, RawTransaction, RecognizedAction,
};
pub use pipeline::{PipelineDiagnostics, PipelineOutput, ScoringPipeline};
pub use reader::load_transactions;
pub use scorer::{rescale, CreditScorer, ScoreBatch, ScoreBreakdown, ScoredWallet};
pub use sqlite_writer::SqliteScoreWriter;
pub use tokens::decimals_for;
pub use writer::{write_histogram, ScoreWriter};
pub use writer_backend::{ScoreWriterBackend, ScoreWriterError};
