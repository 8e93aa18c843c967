use std::io::{Cursor, Read};

use lazy_static::lazy_static;
use regex::Regex;
use zip::ZipArchive;

use super::{DocumentFormat, ExtractionError, FormatDecoder};

const DOCUMENT_PART: &str = "word/document.xml";

lazy_static! {
    static ref PARAGRAPH_END: Regex = Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").unwrap();
    static ref TAB: Regex = Regex::new(r"<w:tab\s*/>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref ENTITY: Regex =
        Regex::new(r"&(?:#x([0-9a-fA-F]{1,6})|#([0-9]{1,7})|(lt|gt|quot|apos|amp));").unwrap();
}

/// Office Open XML: unzips the main document part and keeps the text runs,
/// one line per paragraph.
pub struct DocxDecoder;

impl FormatDecoder for DocxDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractionError::decode(DocumentFormat::Docx, e))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ExtractionError::decode(DocumentFormat::Docx, e))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ExtractionError::decode(DocumentFormat::Docx, e))?;

        Ok(xml_to_text(&xml))
    }
}

fn xml_to_text(xml: &str) -> String {
    let text = PARAGRAPH_END.replace_all(xml, "\n");
    let text = TAB.replace_all(&text, "\t");
    let text = TAG.replace_all(&text, "");

    // Single pass, so "&#38;amp;" decodes to "&amp;" and not "&".
    let text = ENTITY.replace_all(&text, |caps: &regex::Captures| {
        let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16)
                .ok()
                .and_then(char::from_u32),
            (_, Some(dec), _) => dec.as_str().parse().ok().and_then(char::from_u32),
            (_, _, Some(name)) => match name.as_str() {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => Some('&'),
            },
            _ => None,
        };
        decoded.unwrap_or('\u{FFFD}').to_string()
    });

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
