//! Comma- and tab-separated text
//!
//! Both delimiters normalize to the same representation: fields joined by a
//! tab, records joined by a newline.

use super::{decode_permissive, Extractor};
use crate::domain::errors::ExtractionError;
use csv::ReaderBuilder;

#[derive(Debug, Clone, Copy)]
pub struct DelimitedExtractor {
    delimiter: u8,
    format: &'static str,
}

impl DelimitedExtractor {
    pub fn comma() -> Self {
        Self {
            delimiter: b',',
            format: "csv",
        }
    }

    pub fn tab() -> Self {
        Self {
            delimiter: b'\t',
            format: "tsv",
        }
    }
}

impl Extractor for DelimitedExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = decode_permissive(bytes);
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ExtractionError::malformed(self.format, e))?;
            lines.push(record.iter().collect::<Vec<_>>().join("\t"));
        }

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_and_tab_normalize_identically() {
        let from_csv = DelimitedExtractor::comma()
            .extract(b"name,email,phone\nJane,jane@example.com,555-0100\n")
            .unwrap();
        let from_tsv = DelimitedExtractor::tab()
            .extract(b"name\temail\tphone\nJane\tjane@example.com\t555-0100\n")
            .unwrap();

        assert_eq!(from_csv, "name\temail\tphone\nJane\tjane@example.com\t555-0100");
        assert_eq!(from_csv, from_tsv);
    }

    #[test]
    fn test_quoted_fields_and_ragged_rows() {
        let text = DelimitedExtractor::comma()
            .extract(b"id,address\n1,\"221B Baker Street, London\"\n2\n")
            .unwrap();
        assert_eq!(text, "id\taddress\n1\t221B Baker Street, London\n2");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(DelimitedExtractor::comma().extract(b"").unwrap(), "");
    }
}
