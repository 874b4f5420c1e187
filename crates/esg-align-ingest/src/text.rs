//! Plain-text sources: paragraphs separated by blank lines.

use std::path::Path;

use esg_align_core::Document;
use tracing::info;

use crate::{DEFAULT_MAX_FILE_SIZE, ExtractError};

/// Loads UTF-8 text files, one passage per blank-line separated paragraph.
#[derive(Debug, Clone)]
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl TextLoader {
    pub async fn load(&self, path: &Path) -> Result<Document, ExtractError> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() > self.max_file_size {
            return Err(ExtractError::FileTooLarge {
                size: meta.len(),
                limit: self.max_file_size,
            });
        }

        let text = tokio::fs::read_to_string(path).await?;
        let doc = Document::from_pasted_text(&text)
            .map_err(|_| ExtractError::NoText(path.to_path_buf()))?;
        info!(path = %path.display(), paragraphs = doc.len(), "loaded text document");
        Ok(doc)
    }
}
