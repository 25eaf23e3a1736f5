use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no latency sample files found under {0}")]
    NoSamplesFound(PathBuf),
    #[error("only {found} usable samples after filtering, need at least {required}")]
    InsufficientSamples { found: usize, required: usize },
    #[error("failed to process sample data: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
