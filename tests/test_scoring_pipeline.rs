//! End-to-end tests: JSON ledger on disk → score artifacts on disk
//!
//! Covers the fatal input conditions, the CSV layout and ordering,
//! re-run determinism, and the optional SQLite / JSONL outputs.

#[cfg(test)]
mod scoring_pipeline_tests {
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};
    use walletscore::config::{BackendType, ScoringConfig};
    use walletscore::error::PipelineError;
    use walletscore::runner;

    fn config_for(dir: &Path, backend: BackendType) -> ScoringConfig {
        ScoringConfig {
            input_path: dir.join("user-transactions.json"),
            backend,
            output_path: dir.join("wallet_scores.csv"),
            db_path: dir.join("data").join("wallet_scores.db"),
            histogram_path: dir.join("score_distribution.json"),
            histogram_bins: 10,
            features_path: None,
        }
    }

    fn write_ledger(path: &PathBuf, records: &Value) {
        std::fs::write(path, serde_json::to_string_pretty(records).unwrap()).unwrap();
    }

    fn tx(wallet: &str, action: &str, timestamp: Value, amount: &str, symbol: &str, price: &str) -> Value {
        json!({
            "_id": {"$oid": format!("{}-{}-{}", wallet, action, timestamp)},
            "userWallet": wallet,
            "network": "polygon",
            "protocol": "aave_v2",
            "timestamp": timestamp,
            "action": action,
            "actionData": {
                "amount": amount,
                "assetSymbol": symbol,
                "assetPriceUSD": price
            }
        })
    }

    fn sample_ledger() -> Value {
        let mut records = vec![
            // Two liquidations, nothing else
            tx("0xaaa", "liquidationcall", json!(1629178166), "0", "WETH", "3000"),
            tx("0xaaa", "liquidationcall", json!(1629278166), "0", "WETH", "3000"),
            // Healthy borrower with repays
            tx("0xccc", "borrow", json!("1629178166"), "50000000", "USDC", "1.0"),
            tx("0xccc", "repay", json!("1629278166"), "25000000", "USDC", "1.0"),
            tx("0xccc", "repay", json!("1629378166"), "25000000", "USDC", "1.0"),
            tx("0xccc", "repay", json!("1629478166"), "1000000", "USDC", "1.0"),
            // Withdraws more than deposited, plus an unrecognized action
            tx("0xddd", "deposit", json!(1629178166), "1000000000000000000", "DAI", "1.0"),
            tx("0xddd", "redeemunderlying", json!(1629188166), "3000000000000000000", "DAI", "1.0"),
            tx("0xddd", "flashloan", json!(1629198166), "5", "DAI", "1.0"),
            // Dropped: malformed payload, unparsable timestamp, missing wallet
            json!({"userWallet": "0xeee", "action": "deposit", "timestamp": 1629178166, "actionData": "n/a"}),
            json!({"userWallet": "0xfff", "action": "deposit", "timestamp": "not-a-time",
                   "actionData": {"amount": "1", "assetSymbol": "USDC", "assetPriceUSD": "1"}}),
            json!({"action": "deposit", "timestamp": 1629178166,
                   "actionData": {"amount": "1", "assetSymbol": "USDC", "assetPriceUSD": "1"}}),
        ];

        // Ten deposits over ten days, one borrow, three repays
        for day in 0..10 {
            records.push(tx(
                "0xbbb",
                "deposit",
                json!(1629178166 + day * 86_400),
                "2000000000",
                "USDC",
                "0.9938318274296357543568636362026045",
            ));
        }
        records.push(tx("0xbbb", "borrow", json!(1629278166), "100000000", "WBTC", "45000"));
        for i in 0..3 {
            records.push(tx("0xbbb", "repay", json!(1629378166 + i), "40000000", "WBTC", "45000"));
        }

        Value::Array(records)
    }

    fn read_csv_rows(path: &Path) -> Vec<(String, u32)> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].parse().unwrap())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_full_run_writes_sorted_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), BackendType::Csv);
        write_ledger(&config.input_path, &sample_ledger());

        let summary = runner::run(&config).await.unwrap();

        assert_eq!(summary.diagnostics.input_count, 26);
        assert_eq!(summary.diagnostics.surviving_count, 23);
        assert_eq!(summary.diagnostics.dropped.total(), 3);
        assert_eq!(summary.diagnostics.wallet_count, 4);

        let contents = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(contents.starts_with("wallet,credit_score\n"));

        let rows = read_csv_rows(&config.output_path);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ("0xbbb".to_string(), 1000));
        assert_eq!(rows[1], ("0xccc".to_string(), 938));
        assert_eq!(rows[2], ("0xddd".to_string(), 771));
        assert_eq!(rows[3], ("0xaaa".to_string(), 0));
        assert!(rows.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(!rows.iter().any(|(w, _)| w == "0xeee" || w == "0xfff"));

        assert_eq!(summary.histogram.total, 4);
        let histogram: Value =
            serde_json::from_str(&std::fs::read_to_string(&config.histogram_path).unwrap()).unwrap();
        assert_eq!(histogram["bins"][0]["count"], 1);
        assert_eq!(histogram["bins"][7]["count"], 1);
        assert_eq!(histogram["bins"][9]["count"], 2);
    }

    #[tokio::test]
    async fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), BackendType::Csv);
        write_ledger(&config.input_path, &sample_ledger());

        runner::run(&config).await.unwrap();
        let first = std::fs::read(&config.output_path).unwrap();
        runner::run(&config).await.unwrap();
        let second = std::fs::read(&config.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_single_wallet_scores_500() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), BackendType::Csv);
        write_ledger(
            &config.input_path,
            &json!([tx("0xsolo", "deposit", json!(1629178166), "1000000", "USDC", "1.00")]),
        );

        runner::run(&config).await.unwrap();

        let contents = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(contents, "wallet,credit_score\n0xsolo,500\n");
    }

    #[tokio::test]
    async fn test_fatal_input_conditions() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), BackendType::Csv);

        let err = runner::run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));

        std::fs::write(&config.input_path, "{not json").unwrap();
        let err = runner::run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));

        std::fs::write(&config.input_path, "[]").unwrap();
        let err = runner::run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(_)));

        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_nothing_survives_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), BackendType::Csv);
        write_ledger(
            &config.input_path,
            &json!([
                {"userWallet": "w1", "action": "deposit", "timestamp": 1, "actionData": null},
                {"userWallet": "w2", "action": "deposit", "timestamp": 2,
                 "actionData": {"amount": "abc", "assetPriceUSD": "1"}}
            ]),
        );

        let err = runner::run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyResult { total: 2 }));
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_sqlite_backend_and_wallet_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path(), BackendType::Sqlite);
        config.features_path = Some(dir.path().join("reports").join("wallets.jsonl"));
        write_ledger(&config.input_path, &sample_ledger());

        let summary = runner::run(&config).await.unwrap();
        assert_eq!(summary.reports_written, 4);

        // The CSV table is written alongside the database
        let csv_rows = read_csv_rows(&config.output_path);
        assert_eq!(csv_rows.len(), 4);
        assert_eq!(csv_rows[0], ("0xbbb".to_string(), 1000));

        let conn = rusqlite::Connection::open(&config.db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM wallet_scores", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 4);
        let top: String = conn
            .query_row(
                "SELECT wallet FROM wallet_scores ORDER BY position LIMIT 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(top, "0xbbb");

        let reports = std::fs::read_to_string(config.features_path.as_ref().unwrap()).unwrap();
        let lines: Vec<Value> = reports
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);

        let aaa = lines.iter().find(|v| v["wallet"] == "0xaaa").unwrap();
        assert_eq!(aaa["breakdown"]["liquidation_penalty"], 600.0);
        assert_eq!(aaa["actions"]["liquidationcall"]["count"], 2);

        let ddd = lines.iter().find(|v| v["wallet"] == "0xddd").unwrap();
        assert_eq!(ddd["transaction_count"], 3);
        assert_eq!(ddd["breakdown"]["provider_score"], 0.0);
    }
}
