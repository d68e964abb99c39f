//! End-to-end scoring run: ledger file in, score artifacts out

use crate::config::ScoringConfig;
use crate::error::PipelineError;
use crate::scoring_core::{
    load_transactions, write_histogram, PipelineDiagnostics, ScoreHistogram, ScoreWriter,
    ScoringPipeline, WalletReport, WalletReportWriter,
};

const HISTOGRAM_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub diagnostics: PipelineDiagnostics,
    pub histogram: ScoreHistogram,
    pub reports_written: usize,
}

pub async fn run(config: &ScoringConfig) -> Result<RunSummary, PipelineError> {
    log::info!("📥 Loading data from '{}'...", config.input_path.display());
    let records = load_transactions(&config.input_path).await?;

    let output = ScoringPipeline::new().run(records)?;

    for (backend, path) in config.score_tables() {
        let mut writer = ScoreWriter::new(backend, path)?;
        log::info!("📊 Backend: {}", writer.backend_type());
        writer.write_scores(&output.scores).await?;
        writer.flush().await?;
        log::info!("✅ Final scores saved to '{}'", path.display());
    }

    log::info!("📈 Building score distribution...");
    let histogram = ScoreHistogram::from_scores(&output.scores, config.histogram_bins);
    for line in histogram.render(HISTOGRAM_BAR_WIDTH) {
        log::info!("   {}", line);
    }
    write_histogram(&config.histogram_path, &histogram)?;
    log::info!(
        "✅ Score distribution saved to '{}'",
        config.histogram_path.display()
    );

    let mut reports_written = 0;
    if let Some(path) = &config.features_path {
        let mut reports = WalletReportWriter::new(path)?;
        for scored in &output.scores {
            let (Some(features), Some(breakdown)) = (
                output.features.get(&scored.wallet),
                output.breakdown(&scored.wallet),
            ) else {
                continue;
            };
            reports.write_report(&WalletReport::new(scored, features, breakdown))?;
        }
        reports.flush()?;
        reports_written = reports.written();
        log::info!("✅ Wrote {} wallet reports", reports_written);
    }

    Ok(RunSummary {
        diagnostics: output.diagnostics,
        histogram,
        reports_written,
    })
}
