//! Command-line configuration for a scoring run

use crate::error::PipelineError;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Scores are integers in [0, 1000], so finer bins would always be empty
pub const MAX_HISTOGRAM_BINS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    Csv,
    Sqlite,
}

/// Score lending-protocol wallets from a transaction ledger
#[derive(Parser, Debug)]
#[command(name = "score_wallets")]
#[command(about = "Assign a 0-1000 credit score to every wallet in a lending ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON file holding an array of transaction records
    #[arg(long, default_value = "user-transactions.json")]
    pub input: PathBuf,

    /// CSV score table, always written
    #[arg(long, default_value = "wallet_scores.csv")]
    pub output: PathBuf,

    /// Score table backend; sqlite also writes the table to --db-path
    #[arg(long, value_enum, default_value = "csv")]
    pub backend: BackendType,

    /// SQLite database path (used with the sqlite backend)
    #[arg(long, default_value = "data/wallet_scores.db")]
    pub db_path: PathBuf,

    /// Score distribution histogram, written as JSON
    #[arg(long, default_value = "score_distribution.json")]
    pub histogram_output: PathBuf,

    /// Number of fixed-width histogram bins across 0-1000
    #[arg(long, default_value = "10")]
    pub histogram_bins: usize,

    /// Optional JSONL export of per-wallet features and score breakdowns
    #[arg(long)]
    pub features_output: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub input_path: PathBuf,
    pub backend: BackendType,
    /// CSV score table
    pub output_path: PathBuf,
    /// SQLite score table, written only with the sqlite backend
    pub db_path: PathBuf,
    pub histogram_path: PathBuf,
    pub histogram_bins: usize,
    pub features_path: Option<PathBuf>,
}

impl ScoringConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, PipelineError> {
        if cli.histogram_bins == 0 || cli.histogram_bins > MAX_HISTOGRAM_BINS {
            return Err(PipelineError::Config(format!(
                "--histogram-bins must be between 1 and {}",
                MAX_HISTOGRAM_BINS
            )));
        }

        Ok(Self {
            input_path: cli.input,
            backend: cli.backend,
            output_path: cli.output,
            db_path: cli.db_path,
            histogram_path: cli.histogram_output,
            histogram_bins: cli.histogram_bins,
            features_path: cli.features_output,
        })
    }

    /// Score tables to write, CSV first
    pub fn score_tables(&self) -> Vec<(BackendType, &Path)> {
        let mut tables = vec![(BackendType::Csv, self.output_path.as_path())];
        if self.backend == BackendType::Sqlite {
            tables.push((BackendType::Sqlite, self.db_path.as_path()));
        }
        tables
    }

    /// Parse the process arguments
    pub fn from_args() -> Result<Self, PipelineError> {
        Self::from_cli(Cli::parse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cli = Cli::try_parse_from(["score_wallets"]).unwrap();
        let config = ScoringConfig::from_cli(cli).unwrap();

        assert_eq!(config.input_path, PathBuf::from("user-transactions.json"));
        assert_eq!(config.backend, BackendType::Csv);
        assert_eq!(config.output_path, PathBuf::from("wallet_scores.csv"));
        assert_eq!(config.histogram_path, PathBuf::from("score_distribution.json"));
        assert_eq!(config.histogram_bins, 10);
        assert!(config.features_path.is_none());
        assert_eq!(
            config.score_tables(),
            vec![(BackendType::Csv, Path::new("wallet_scores.csv"))]
        );
    }

    #[test]
    fn test_sqlite_backend_adds_db_table() {
        let cli = Cli::try_parse_from([
            "score_wallets",
            "--backend",
            "sqlite",
            "--db-path",
            "/tmp/scores.db",
            "--features-output",
            "features.jsonl",
        ])
        .unwrap();
        let config = ScoringConfig::from_cli(cli).unwrap();

        assert_eq!(config.backend, BackendType::Sqlite);
        assert_eq!(
            config.score_tables(),
            vec![
                (BackendType::Csv, Path::new("wallet_scores.csv")),
                (BackendType::Sqlite, Path::new("/tmp/scores.db")),
            ]
        );
        assert_eq!(config.features_path, Some(PathBuf::from("features.jsonl")));
    }

    #[test]
    fn test_histogram_bins_bounded() {
        for bins in ["0", "1001", "1000000"] {
            let cli = Cli::try_parse_from(["score_wallets", "--histogram-bins", bins]).unwrap();
            assert!(
                matches!(ScoringConfig::from_cli(cli), Err(PipelineError::Config(_))),
                "bins {}",
                bins
            );
        }

        let cli = Cli::try_parse_from(["score_wallets", "--histogram-bins", "1000"]).unwrap();
        assert_eq!(ScoringConfig::from_cli(cli).unwrap().histogram_bins, 1000);
    }
}
