//! Text extraction: turns a raw uploaded document into flat text.
//!
//! Each declared format maps to one `FormatDecoder`. The `TextExtractor` owns the
//! registry and wraps every decoder failure into `ExtractionError`, so callers never
//! see format-specific error shapes. A format with no registered decoder fails with
//! `ExtractionUnavailable`; a decoder that yields only whitespace fails with
//! `EmptyDocument`. Empty text is never returned.

mod docx;
mod pdf;
mod plain;
mod rtf;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use docx::DocxDecoder;
pub use pdf::PdfDecoder;
pub use plain::PlainTextDecoder;
pub use rtf::RtfDecoder;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Could not decode {format} document: {reason}")]
    DecodeError {
        format: DocumentFormat,
        reason: String,
    },

    #[error("No text decoder is available for {format} documents")]
    ExtractionUnavailable { format: DocumentFormat },

    #[error("{format} document contains no extractable text")]
    EmptyDocument { format: DocumentFormat },

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    pub fn decode(format: DocumentFormat, reason: impl fmt::Display) -> Self {
        ExtractionError::DecodeError {
            format,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Doc,
    Docx,
    Txt,
    Rtf,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Doc => "doc",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
            DocumentFormat::Rtf => "rtf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = ExtractionError;

    /// Accepts the bare tag, a leading-dot extension, or the matching MIME type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().trim_start_matches('.').to_ascii_lowercase();
        match tag.as_str() {
            "pdf" | "application/pdf" => Ok(DocumentFormat::Pdf),
            "doc" | "application/msword" => Ok(DocumentFormat::Doc),
            "docx"
            | "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Ok(DocumentFormat::Docx)
            }
            "txt" | "text/plain" => Ok(DocumentFormat::Txt),
            "rtf" | "application/rtf" | "text/rtf" => Ok(DocumentFormat::Rtf),
            _ => Err(ExtractionError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DocumentSource {
    Bytes(Bytes),
    Path(PathBuf),
}

/// An uploaded document plus the format its uploader declared. The declared
/// format is trusted; contents are not sniffed.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source: DocumentSource,
    pub format: DocumentFormat,
}

impl RawDocument {
    pub fn new(source: DocumentSource, declared_format: &str) -> Result<Self, ExtractionError> {
        Ok(RawDocument {
            source,
            format: declared_format.parse()?,
        })
    }

    #[cfg(test)]
    pub fn from_bytes(bytes: impl Into<Bytes>, format: DocumentFormat) -> Self {
        RawDocument {
            source: DocumentSource::Bytes(bytes.into()),
            format,
        }
    }

    fn read(&self) -> Result<Bytes, ExtractionError> {
        match &self.source {
            DocumentSource::Bytes(b) => Ok(b.clone()),
            DocumentSource::Path(path) => Ok(Bytes::from(std::fs::read(path)?)),
        }
    }
}

/// Decodes one container format to plain text.
pub trait FormatDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Format → decoder registry. Pure apart from reading a path-backed document.
pub struct TextExtractor {
    decoders: HashMap<DocumentFormat, Box<dyn FormatDecoder>>,
}

impl Default for TextExtractor {
    /// Registers every decoder this crate ships. Legacy `.doc` has none.
    fn default() -> Self {
        TextExtractor::empty()
            .with_decoder(DocumentFormat::Txt, PlainTextDecoder)
            .with_decoder(DocumentFormat::Rtf, RtfDecoder)
            .with_decoder(DocumentFormat::Pdf, PdfDecoder)
            .with_decoder(DocumentFormat::Docx, DocxDecoder)
    }
}

impl TextExtractor {
    pub fn empty() -> Self {
        TextExtractor {
            decoders: HashMap::new(),
        }
    }

    pub fn with_decoder(
        mut self,
        format: DocumentFormat,
        decoder: impl FormatDecoder + 'static,
    ) -> Self {
        self.decoders.insert(format, Box::new(decoder));
        self
    }

    pub fn supports(&self, format: DocumentFormat) -> bool {
        self.decoders.contains_key(&format)
    }

    pub fn extract(&self, document: &RawDocument) -> Result<String, ExtractionError> {
        let format = document.format;
        let decoder = self
            .decoders
            .get(&format)
            .ok_or(ExtractionError::ExtractionUnavailable { format })?;

        let bytes = document.read()?;
        let text = decoder.decode(&bytes)?;

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument { format });
        }

        debug!("Extracted {} chars from {format} document", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_parses_tags_extensions_and_mime_types() {
        assert_eq!("pdf".parse::<DocumentFormat>().unwrap(), DocumentFormat::Pdf);
        assert_eq!(".DOCX".parse::<DocumentFormat>().unwrap(), DocumentFormat::Docx);
        assert_eq!("text/plain".parse::<DocumentFormat>().unwrap(), DocumentFormat::Txt);
        assert_eq!("application/msword".parse::<DocumentFormat>().unwrap(), DocumentFormat::Doc);
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let err = "exe".parse::<DocumentFormat>().unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref f) if f == "exe"));
    }

    #[test]
    fn test_raw_document_rejects_unsupported_declared_format() {
        let result = RawDocument::new(DocumentSource::Bytes(Bytes::from_static(b"MZ")), "exe");
        assert!(matches!(result, Err(ExtractionError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_txt_bytes_extract() {
        let doc = RawDocument::from_bytes(&b"Jane Doe\nRust developer"[..], DocumentFormat::Txt);
        let text = TextExtractor::default().extract(&doc).unwrap();
        assert_eq!(text, "Jane Doe\nRust developer");
    }

    #[test]
    fn test_txt_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Skills: Python, Docker").unwrap();
        let doc = RawDocument::new(DocumentSource::Path(file.path().to_path_buf()), "txt").unwrap();
        let text = TextExtractor::default().extract(&doc).unwrap();
        assert!(text.contains("Docker"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let doc = RawDocument::new(
            DocumentSource::Path(PathBuf::from("/definitely/not/here.txt")),
            "txt",
        )
        .unwrap();
        let err = TextExtractor::default().extract(&doc).unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn test_doc_has_no_decoder() {
        let doc = RawDocument::from_bytes(&b"\xD0\xCF\x11\xE0"[..], DocumentFormat::Doc);
        let err = TextExtractor::default().extract(&doc).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::ExtractionUnavailable {
                format: DocumentFormat::Doc
            }
        ));
    }

    #[test]
    fn test_whitespace_only_text_is_rejected_not_returned_empty() {
        let doc = RawDocument::from_bytes(&b"  \n\t "[..], DocumentFormat::Txt);
        let err = TextExtractor::default().extract(&doc).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyDocument { .. }));
    }

    /// Single-page PDF with one Helvetica text run and a correct xref table.
    fn one_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref = pdf.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            table.push_str(&format!("{offset:010} 00000 n \n"));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(table.as_bytes());
        pdf
    }

    #[test]
    fn test_pdf_text_layer_extracts() {
        let doc = RawDocument::from_bytes(one_page_pdf("Senior Engineer Python"), DocumentFormat::Pdf);
        let text = TextExtractor::default().extract(&doc).unwrap();
        assert!(text.contains("Senior Engineer"));
        assert!(text.contains("Python"));
    }

    struct FixedDecoder(&'static str);

    impl FormatDecoder for FixedDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_registered_decoder_replaces_missing_one() {
        let extractor = TextExtractor::empty().with_decoder(DocumentFormat::Doc, FixedDecoder("legacy"));
        assert!(extractor.supports(DocumentFormat::Doc));
        assert!(!extractor.supports(DocumentFormat::Pdf));
        let doc = RawDocument::from_bytes(&b"..."[..], DocumentFormat::Doc);
        assert_eq!(extractor.extract(&doc).unwrap(), "legacy");
    }
}
