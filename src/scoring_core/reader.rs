//! Ledger loader: reads the JSON transaction array from disk

use crate::error::PipelineError;
use serde_json::Value;
use std::path::Path;

/// Load the raw ledger as a list of untyped records.
///
/// Individual records are not inspected here; the normalizer decides which
/// ones survive. The file itself must exist, be valid JSON, and hold a
/// non-empty array.
pub async fn load_transactions(path: &Path) -> Result<Vec<Value>, PipelineError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PipelineError::Input(format!(
                "The data file '{}' was not found",
                path.display()
            )));
        }
        Err(e) => {
            return Err(PipelineError::Input(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            )));
        }
    };

    let document: Value = serde_json::from_str(&contents).map_err(|e| {
        PipelineError::Input(format!(
            "The file '{}' is not a valid JSON file: {}",
            path.display(),
            e
        ))
    })?;

    let records = match document {
        Value::Array(records) => records,
        _ => {
            return Err(PipelineError::Input(format!(
                "The file '{}' does not contain a JSON array of transactions",
                path.display()
            )));
        }
    };

    if records.is_empty() {
        return Err(PipelineError::Input(format!(
            "The JSON file '{}' is empty",
            path.display()
        )));
    }

    log::info!("📖 Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tx.json", r#"[{"userWallet":"w1"},{"userWallet":"w2"}]"#).await;

        let records = load_transactions(&path).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_transactions(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(ref msg) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_invalid_json_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.json", r#"[{"userWallet": "#).await;
        let err = load_transactions(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::Input(ref msg) if msg.contains("not a valid JSON")));
    }

    #[tokio::test]
    async fn test_empty_or_non_array_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        let empty = write_file(&dir, "empty.json", "[]").await;
        assert!(matches!(
            load_transactions(&empty).await,
            Err(PipelineError::Input(ref msg)) if msg.contains("empty")
        ));

        let object = write_file(&dir, "object.json", r#"{"userWallet":"w1"}"#).await;
        assert!(matches!(
            load_transactions(&object).await,
            Err(PipelineError::Input(_))
        ));
    }
}
