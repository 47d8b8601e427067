//! Spreadsheet workbook extraction

use super::Extractor;
use crate::domain::errors::ExtractionError;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

/// First worksheet as tab-separated lines, each terminated by a newline
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxExtractor;

impl Extractor for XlsxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::EmptyInput("xlsx".to_string()));
        }

        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).map_err(|e| ExtractionError::malformed("xlsx", e))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| ExtractionError::malformed("xlsx", e))?,
            None => return Ok(String::new()),
        };

        let mut text = String::new();
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }

        Ok(text)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
