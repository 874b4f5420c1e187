//! PDF sources: one passage per page.

use std::path::Path;

use esg_align_core::Document;
use tracing::info;

use crate::{DEFAULT_MAX_FILE_SIZE, ExtractError};

#[derive(Debug, Clone)]
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl PdfLoader {
    /// Extract page text on a blocking thread and build a document from it.
    ///
    /// Pages with no text are dropped; a PDF with no text at all is an error.
    pub async fn load(&self, path: &Path) -> Result<Document, ExtractError> {
        let path = tokio::fs::canonicalize(path).await?;

        let meta = tokio::fs::metadata(&path).await?;
        if meta.len() > self.max_file_size {
            return Err(ExtractError::FileTooLarge {
                size: meta.len(),
                limit: self.max_file_size,
            });
        }

        let path_buf = path.clone();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_by_pages(&path_buf)
                .map_err(|e| ExtractError::Pdf(e.to_string()))
        })
        .await??;

        let page_count = pages.len();
        let doc = Document::from_pages(pages).map_err(|_| ExtractError::NoText(path.clone()))?;
        info!(
            path = %path.display(),
            pages = page_count,
            passages = doc.len(),
            "extracted PDF text"
        );
        Ok(doc)
    }
}
