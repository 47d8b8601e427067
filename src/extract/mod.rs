//! Format extractors
//!
//! Each supported source format has an [`Extractor`] that turns raw bytes
//! into one normalized text blob. The [`ExtractorRegistry`] picks the
//! extractor from the file extension (case-insensitive); extensions with no
//! registered extractor fall back to a no-op that yields empty text.

pub mod delimited;
pub mod markup;
pub mod office;
pub mod pdf;
pub mod spreadsheet;
pub mod text;

use crate::domain::errors::ExtractionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Converts the raw bytes of one source format into scannable text
pub trait Extractor: Send + Sync {
    /// Extract normalized text
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the bytes are malformed or unreadable
    /// for the format this extractor handles.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Source format, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
    Pptx,
    Txt,
    Rtf,
    Csv,
    Tsv,
    Xlsx,
    Json,
    Xml,
    Html,
    Unsupported,
}

impl SourceFormat {
    /// Every format with a built-in extractor
    pub const SUPPORTED: [SourceFormat; 11] = [
        SourceFormat::Pdf,
        SourceFormat::Docx,
        SourceFormat::Pptx,
        SourceFormat::Txt,
        SourceFormat::Rtf,
        SourceFormat::Csv,
        SourceFormat::Tsv,
        SourceFormat::Xlsx,
        SourceFormat::Json,
        SourceFormat::Xml,
        SourceFormat::Html,
    ];

    /// Map a file name to its format by extension
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("pptx") => Self::Pptx,
            Some("txt") => Self::Txt,
            Some("rtf") => Self::Rtf,
            Some("csv") => Self::Csv,
            Some("tsv") => Self::Tsv,
            Some("xlsx") => Self::Xlsx,
            Some("json") => Self::Json,
            Some("xml") => Self::Xml,
            Some("html") | Some("htm") => Self::Html,
            _ => Self::Unsupported,
        }
    }

    /// Short lowercase label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Txt => "txt",
            Self::Rtf => "rtf",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Html => "html",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized text of one source item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub source_name: String,
    pub format: SourceFormat,
    pub text: String,
}

/// Fallback for unrecognized formats
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtractor;

impl Extractor for NoopExtractor {
    fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(String::new())
    }
}

/// Format-to-extractor mapping, built once at startup
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<SourceFormat, Arc<dyn Extractor>>,
    fallback: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    /// Registry with no extractors; every format yields empty text
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
            fallback: Arc::new(NoopExtractor),
        }
    }

    /// Registry with the built-in extractor for every supported format
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(SourceFormat::Pdf, pdf::PdfExtractor);
        registry.register(SourceFormat::Docx, office::DocxExtractor);
        registry.register(SourceFormat::Pptx, office::PptxExtractor);
        registry.register(SourceFormat::Txt, text::PlainTextExtractor);
        registry.register(SourceFormat::Rtf, text::RtfExtractor);
        registry.register(SourceFormat::Csv, delimited::DelimitedExtractor::comma());
        registry.register(SourceFormat::Tsv, delimited::DelimitedExtractor::tab());
        registry.register(SourceFormat::Xlsx, spreadsheet::XlsxExtractor);
        registry.register(SourceFormat::Json, markup::JsonExtractor);
        registry.register(SourceFormat::Xml, markup::XmlExtractor);
        registry.register(SourceFormat::Html, markup::HtmlExtractor);
        registry
    }

    /// Register or replace the extractor for a format
    pub fn register<E: Extractor + 'static>(&mut self, format: SourceFormat, extractor: E) {
        self.extractors.insert(format, Arc::new(extractor));
    }

    /// Extractor for a format, or the no-op fallback
    pub fn extractor_for(&self, format: SourceFormat) -> Arc<dyn Extractor> {
        self.extractors
            .get(&format)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// Whether a format has a registered extractor
    pub fn supports(&self, format: SourceFormat) -> bool {
        self.extractors.contains_key(&format)
    }

    /// Extract one named item, dispatching on its file extension
    pub fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let format = SourceFormat::from_file_name(file_name);
        let text = self.extractor_for(format).extract(bytes)?;

        Ok(ExtractionResult {
            source_name: file_name.to_string(),
            format,
            text,
        })
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<&str> = self.extractors.keys().map(SourceFormat::label).collect();
        formats.sort_unstable();
        f.debug_struct("ExtractorRegistry")
            .field("formats", &formats)
            .finish()
    }
}

/// Decode bytes as UTF-8, dropping any invalid sequences
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
