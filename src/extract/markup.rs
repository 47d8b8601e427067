//! Structured markup: JSON, XML and HTML
//!
//! JSON and XML are re-serialized rather than scanned raw, so structural
//! characters never sit inside a regex word boundary. HTML is reduced to its
//! visible text.

use super::{decode_permissive, Extractor};
use crate::domain::errors::ExtractionError;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use scraper::{ElementRef, Html, Node};

/// Pretty-printed JSON, document key order kept
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(String::new());
        }

        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| ExtractionError::malformed("json", e))?;
        serde_json::to_string_pretty(&value).map_err(|e| ExtractionError::malformed("json", e))
    }
}

/// Serialized element tree; prolog, comments and processing instructions dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlExtractor;

impl Extractor for XmlExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let source = decode_permissive(bytes);
        if source.trim().is_empty() {
            return Ok(String::new());
        }

        let mut reader = Reader::from_str(&source);
        let mut writer = Writer::new(Vec::new());
        let mut depth = 0usize;
        let mut has_root = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ExtractionError::malformed("xml", e))?;

            match event {
                Event::Eof => break,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Text(_) if depth == 0 => continue,
                Event::Start(_) => {
                    depth += 1;
                    has_root = true;
                }
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        ExtractionError::malformed("xml", "unexpected closing tag")
                    })?;
                }
                Event::Empty(_) => has_root = true,
                _ => {}
            }

            writer
                .write_event(event)
                .map_err(|e| ExtractionError::malformed("xml", e))?;
        }

        if depth != 0 {
            return Err(ExtractionError::malformed("xml", "unclosed element"));
        }
        if !has_root {
            return Err(ExtractionError::malformed("xml", "no root element"));
        }

        String::from_utf8(writer.into_inner()).map_err(|e| ExtractionError::malformed("xml", e))
    }
}

/// Elements whose content is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of visible text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "table", "td", "th", "title", "tr", "ul",
];

/// Visible text content of an HTML document
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let source = decode_permissive(bytes);
        if source.trim().is_empty() {
            return Ok(String::new());
        }

        let document = Html::parse_document(&source);
        let mut text = String::new();
        collect_visible_text(document.root_element(), &mut text);

        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_visible_text(child_ref, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_pretty_printed_in_document_order() {
        let text = JsonExtractor
            .extract(br#"{"name":"Jane","contact":{"email":"jane@example.com"},"ids":[1,2]}"#)
            .unwrap();
        assert_eq!(
            text,
            "{\n  \"name\": \"Jane\",\n  \"contact\": {\n    \"email\": \"jane@example.com\"\n  },\n  \"ids\": [\n    1,\n    2\n  ]\n}"
        );
    }

    #[test]
    fn test_json_numbers_keep_their_digits() {
        let text = JsonExtractor
            .extract(br#"{"account": 12345678901234567890123, "ratio": 0.1, "id": -7}"#)
            .unwrap();
        assert_eq!(
            text,
            "{\n  \"account\": 12345678901234567890123,\n  \"ratio\": 0.1,\n  \"id\": -7\n}"
        );
    }

    #[test]
    fn test_json_malformed() {
        let err = JsonExtractor.extract(b"{\"name\": ").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed { ref format, .. } if format == "json"));
    }

    #[test]
    fn test_xml_drops_prolog_and_comments() {
        let xml = br#"<?xml version="1.0"?>
<!-- exported -->
<people><person id="7"><email>jane@example.com</email><!-- note --></person><empty/></people>
"#;
        let text = XmlExtractor.extract(xml).unwrap();
        assert_eq!(
            text,
            r#"<people><person id="7"><email>jane@example.com</email></person><empty/></people>"#
        );
    }

    #[test]
    fn test_xml_unclosed_element() {
        let err = XmlExtractor.extract(b"<people><person>").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed { ref format, .. } if format == "xml"));
    }

    #[test]
    fn test_xml_without_root() {
        let err = XmlExtractor.extract(b"just text").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed { .. }));
    }

    #[test]
    fn test_html_visible_text_only() {
        let html = br#"<!DOCTYPE html>
<html><head><title>Staff</title><style>.x { color: red }</style>
<script>var email = "hidden@example.com";</script></head>
<body><h1>Directory</h1><div>Jane Smith<br>jane@example.com</div>
<p>Call <b>+1 415-555-0100</b></p><noscript>enable js</noscript></body></html>"#;

        let text = HtmlExtractor.extract(html).unwrap();
        assert_eq!(
            text,
            "Staff\nDirectory\nJane Smith\njane@example.com\nCall +1 415-555-0100"
        );
        assert!(!text.contains("hidden@example.com"));
    }
}
