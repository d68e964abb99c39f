use crate::scoring_core::writer_backend::ScoreWriterError;

/// Fatal pipeline conditions. Per-record problems never surface here; the
/// normalizer absorbs them as drop counts.
#[derive(Debug)]
pub enum PipelineError {
    /// Input file missing, unreadable, not a JSON array, or empty
    Input(String),
    /// Input parsed but no transaction survived normalization
    EmptyResult { total: usize },
    /// Writing an output artifact failed
    Output(ScoreWriterError),
    /// Invalid command-line configuration
    Config(String),
}

impl From<ScoreWriterError> for PipelineError {
    fn from(err: ScoreWriterError) -> Self {
        PipelineError::Output(err)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Input(msg) => write!(f, "Input error: {}", msg),
            PipelineError::EmptyResult { total } => write!(
                f,
                "No valid transactions with a USD value were found ({} records dropped)",
                total
            ),
            PipelineError::Output(e) => write!(f, "Output error: {}", e),
            PipelineError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}
