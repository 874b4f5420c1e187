//! Ingest layer: turns PDF reports and plain-text files into normalised documents.

mod error;
mod text;
pub use error::ExtractError;
pub use text::TextLoader;

#[cfg(feature = "pdf")]
mod pdf;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

use std::path::Path;

use esg_align_core::Document;

/// 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Load a document, choosing the extractor from the file extension.
///
/// `.pdf` goes through PDF extraction; everything else is read as text.
pub async fn load_document(path: &Path) -> Result<Document, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        #[cfg(feature = "pdf")]
        Some("pdf") => PdfLoader::default().load(path).await,
        #[cfg(not(feature = "pdf"))]
        Some("pdf") => Err(ExtractError::UnsupportedFormat(
            "pdf (built without the `pdf` feature)".into(),
        )),
        _ => TextLoader::default().load(path).await,
    }
}

/// Build a document from text pasted by the user.
pub fn document_from_text(text: &str) -> Result<Document, ExtractError> {
    Document::from_pasted_text(text).map_err(|_| ExtractError::NoText("<pasted text>".into()))
}
