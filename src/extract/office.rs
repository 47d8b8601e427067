//! Word-processor (`.docx`) and presentation (`.pptx`) extraction
//!
//! Both formats are zip packages of XML parts. Text is read by streaming the
//! relevant parts with `quick-xml`.

use super::Extractor;
use crate::domain::errors::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";
const SLIDE_PREFIX: &str = "ppt/slides/slide";
const PRESENTATION: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

type Package<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn open_package<'a>(format: &str, bytes: &'a [u8]) -> Result<Package<'a>, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyInput(format.to_string()));
    }
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::malformed(format, e))
}

fn read_part(package: &mut Package<'_>, format: &str, part: &str) -> Result<String, ExtractionError> {
    let mut file = package.by_name(part).map_err(|e| match e {
        ZipError::FileNotFound => ExtractionError::MissingPart {
            format: format.to_string(),
            part: part.to_string(),
        },
        other => ExtractionError::malformed(format, other),
    })?;

    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::malformed(format, e))?;
    Ok(xml)
}

/// Paragraph text of the main document part, one paragraph per line
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut package = open_package("docx", bytes)?;
        let xml = read_part(&mut package, "docx", DOCX_BODY)?;
        Ok(docx_paragraphs(&xml)?.join("\n"))
    }
}

fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Paragraphs nest inside text boxes
    let mut open: Vec<String> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:r" => run_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                let ch = match e.name().as_ref() {
                    b"w:p" => {
                        paragraphs.push(String::new());
                        continue;
                    }
                    b"w:tab" if run_depth > 0 => '\t',
                    b"w:br" | b"w:cr" if run_depth > 0 => '\n',
                    _ => continue,
                };
                if let Some(current) = open.last_mut() {
                    current.push(ch);
                }
            }
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::malformed("docx", e))?;
                if let Some(current) = open.last_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                b"w:r" => run_depth = run_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::malformed("docx", e)),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Shape text of every slide, in slide order then shape order
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxExtractor;

impl Extractor for PptxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut package = open_package("pptx", bytes)?;

        let slides = slide_parts(&mut package)?;

        let mut shapes = Vec::new();
        for part in &slides {
            let xml = read_part(&mut package, "pptx", part)?;
            shapes.extend(slide_shapes(&xml)?);
        }

        Ok(shapes.join("\n"))
    }
}

/// Slide part names in presentation order
///
/// The order comes from the slide id list of `ppt/presentation.xml` resolved
/// through its relationships. Packages without a presentation part fall back
/// to the slide number in each part name.
fn slide_parts(package: &mut Package<'_>) -> Result<Vec<String>, ExtractionError> {
    if package.index_for_name(PRESENTATION).is_none() {
        let mut slides: Vec<(u32, String)> = package
            .file_names()
            .filter_map(|name| {
                let number = name
                    .strip_prefix(SLIDE_PREFIX)?
                    .strip_suffix(".xml")?
                    .parse::<u32>()
                    .ok()?;
                Some((number, name.to_string()))
            })
            .collect();
        slides.sort_by_key(|(number, _)| *number);
        return Ok(slides.into_iter().map(|(_, name)| name).collect());
    }

    let presentation = read_part(package, "pptx", PRESENTATION)?;
    let slide_ids = element_attributes(&presentation, b"p:sldId", b"r:id")?;
    if slide_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rels = read_part(package, "pptx", PRESENTATION_RELS)?;
    let relationships = relationship_targets(&rels)?;

    slide_ids
        .iter()
        .map(|id| {
            relationships
                .iter()
                .find(|(rel_id, _)| rel_id == id)
                .map(|(_, target)| resolve_part("ppt", target))
                .ok_or_else(|| ExtractionError::MissingPart {
                    format: "pptx".to_string(),
                    part: format!("relationship {id}"),
                })
        })
        .collect()
}

/// Values of `attribute` on every `element`, in document order
fn element_attributes(
    xml: &str,
    element: &[u8],
    attribute: &[u8],
) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut values = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == element => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| ExtractionError::malformed("pptx", e))?;
                    if attr.key.as_ref() == attribute {
                        let value = attr
                            .decode_and_unescape_value(&reader)
                            .map_err(|e| ExtractionError::malformed("pptx", e))?;
                        values.push(value.into_owned());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::malformed("pptx", e)),
            _ => {}
        }
    }

    Ok(values)
}

/// `(Id, Target)` pairs of a relationships part
fn relationship_targets(xml: &str) -> Result<Vec<(String, String)>, ExtractionError> {
    let ids = element_attributes(xml, b"Relationship", b"Id")?;
    let targets = element_attributes(xml, b"Relationship", b"Target")?;
    if ids.len() != targets.len() {
        return Err(ExtractionError::malformed(
            "pptx",
            "relationship without Id or Target",
        ));
    }
    Ok(ids.into_iter().zip(targets).collect())
}

/// Resolve a relationship target against the directory of its source part
fn resolve_part(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[derive(Default)]
struct ShapeText {
    has_body: bool,
    paragraphs: Vec<String>,
}

/// Text of each shape with a text body; shapes without one are skipped
fn slide_shapes(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut shape: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"p:sp" => shape = Some(ShapeText::default()),
                b"p:txBody" => {
                    if let Some(s) = shape.as_mut() {
                        s.has_body = true;
                    }
                }
                b"a:p" if shape.as_ref().is_some_and(|s| s.has_body) => {
                    paragraph = Some(String::new())
                }
                b"a:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"a:p" => {
                    if let Some(s) = shape.as_mut().filter(|s| s.has_body) {
                        s.paragraphs.push(String::new());
                    }
                }
                b"a:br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::malformed("pptx", e))?;
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    if let (Some(s), Some(p)) = (shape.as_mut(), paragraph.take()) {
                        s.paragraphs.push(p);
                    }
                }
                b"p:sp" => {
                    if let Some(done) = shape.take().filter(|s| s.has_body) {
                        shapes.push(done.paragraphs.join("\n"));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::malformed("pptx", e)),
            _ => {}
        }
    }

    Ok(shapes)
}
