//! PDF text extraction

use super::Extractor;
use crate::domain::errors::ExtractionError;

/// Concatenates per-page text in page order, one newline between pages
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyInput("pdf".to_string()));
        }

        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| ExtractionError::malformed("pdf", e))?;

        Ok(pages.join("\n"))
    }
}
