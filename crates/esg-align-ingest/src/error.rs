use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a document. Terminal for the request:
/// analysis never runs on a failed extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("no text found in {0}")]
    NoText(PathBuf),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
