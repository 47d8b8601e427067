//! Plain text and RTF extraction

use super::{decode_permissive, Extractor};
use crate::domain::errors::ExtractionError;

/// UTF-8 text, undecodable bytes dropped
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl Extractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(decode_permissive(bytes))
    }
}

/// Rich text with control words and non-text destinations removed
#[derive(Debug, Default, Clone, Copy)]
pub struct RtfExtractor;

impl Extractor for RtfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(strip_rtf(&decode_permissive(bytes)))
    }
}

/// Destinations whose content is never document text
const SKIPPED_DESTINATIONS: &[&str] = &[
    "colorschememapping",
    "colortbl",
    "datastore",
    "fldinst",
    "fonttbl",
    "footer",
    "footerf",
    "footerl",
    "footerr",
    "generator",
    "header",
    "headerf",
    "headerl",
    "headerr",
    "info",
    "latentstyles",
    "listoverridetable",
    "listtable",
    "object",
    "pict",
    "rsidtbl",
    "stylesheet",
    "themedata",
    "xmlnstbl",
];

#[derive(Debug, Clone, Copy)]
struct GroupState {
    skip: bool,
    /// Fallback characters following a `\uN` escape
    uc: usize,
}

impl Default for GroupState {
    fn default() -> Self {
        Self { skip: false, uc: 1 }
    }
}

struct RtfWriter {
    out: String,
    state: GroupState,
    pending_fallback: usize,
}

impl RtfWriter {
    fn emit(&mut self, ch: char) {
        if self.state.skip {
            return;
        }
        if self.pending_fallback > 0 {
            self.pending_fallback -= 1;
            return;
        }
        self.out.push(ch);
    }

    fn control_word(&mut self, word: &str, param: Option<i32>) {
        if SKIPPED_DESTINATIONS.contains(&word) {
            self.state.skip = true;
            return;
        }

        match word {
            "par" | "line" | "sect" | "page" | "row" => self.emit('\n'),
            "tab" | "cell" => self.emit('\t'),
            "emdash" => self.emit('\u{2014}'),
            "endash" => self.emit('\u{2013}'),
            "lquote" => self.emit('\u{2018}'),
            "rquote" => self.emit('\u{2019}'),
            "ldblquote" => self.emit('\u{201C}'),
            "rdblquote" => self.emit('\u{201D}'),
            "bullet" => self.emit('\u{2022}'),
            "uc" => {
                if let Some(n) = param {
                    self.state.uc = usize::try_from(n).unwrap_or(0);
                }
            }
            "u" => {
                if let Some(n) = param {
                    let code = if n < 0 { n + 65536 } else { n };
                    if let Some(ch) = u32::try_from(code).ok().and_then(char::from_u32) {
                        self.emit(ch);
                    }
                    if !self.state.skip {
                        self.pending_fallback = self.state.uc;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Strip RTF markup to plain text
///
/// Input that does not start with an `{\rtf` header is returned unchanged.
pub fn strip_rtf(input: &str) -> String {
    if !input.trim_start().starts_with("{\\rtf") {
        return input.to_string();
    }

    let chars: Vec<char> = input.chars().collect();
    let mut writer = RtfWriter {
        out: String::with_capacity(input.len() / 2),
        state: GroupState::default(),
        pending_fallback: 0,
    };
    let mut stack: Vec<GroupState> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' => {
                stack.push(writer.state);
                i += 1;
            }
            '}' => {
                if let Some(state) = stack.pop() {
                    writer.state = state;
                }
                i += 1;
            }
            '\\' => {
                i += 1;
                let Some(&next) = chars.get(i) else {
                    break;
                };

                if next.is_ascii_alphabetic() {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_alphabetic() {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();

                    let param_start = i;
                    if chars.get(i) == Some(&'-') {
                        i += 1;
                    }
                    let digits_start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    let param = if i > digits_start {
                        chars[param_start..i]
                            .iter()
                            .collect::<String>()
                            .parse::<i32>()
                            .ok()
                    } else {
                        i = param_start;
                        None
                    };

                    // A single space delimits the control word
                    if chars.get(i) == Some(&' ') {
                        i += 1;
                    }

                    writer.control_word(&word, param);
                    continue;
                }

                i += 1;
                match next {
                    '\\' | '{' | '}' => writer.emit(next),
                    '~' => writer.emit(' '),
                    '_' => writer.emit('-'),
                    '*' => writer.state.skip = true,
                    '\n' | '\r' => writer.emit('\n'),
                    '\'' => {
                        let hex: String = chars.iter().skip(i).take(2).collect();
                        i += hex.chars().count();
                        if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                            writer.emit(cp1252_char(byte));
                        }
                    }
                    _ => {}
                }
            }
            '\r' | '\n' => i += 1,
            ch => {
                writer.emit(ch);
                i += 1;
            }
        }
    }

    writer.out
}

/// Windows-1252 decode of a single byte
fn cp1252_char(byte: u8) -> char {
    const HIGH: [char; 32] = [
        '\u{20AC}', '\u{FFFD}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}',
        '\u{2021}', '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{FFFD}',
        '\u{017D}', '\u{FFFD}', '\u{FFFD}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
        '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}',
        '\u{0153}', '\u{FFFD}', '\u{017E}', '\u{0178}',
    ];

    match byte {
        0x80..=0x9F => HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}
