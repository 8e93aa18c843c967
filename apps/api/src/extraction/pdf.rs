use super::{DocumentFormat, ExtractionError, FormatDecoder};

/// PDF text layer via `pdf-extract`. Scanned (image-only) PDFs come back with no
/// text and are rejected by the extractor as empty.
pub struct PdfDecoder;

impl FormatDecoder for PdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ExtractionError::decode(
                DocumentFormat::Pdf,
                "missing %PDF header",
            ));
        }
        // pdf-extract panics on some malformed cross-reference tables.
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(result) => result.map_err(|e| ExtractionError::decode(DocumentFormat::Pdf, e)),
            Err(_) => Err(ExtractionError::decode(
                DocumentFormat::Pdf,
                "decoder aborted on malformed document",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_fail_with_decode_error() {
        let err = PdfDecoder.decode(b"just some text").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::DecodeError {
                format: DocumentFormat::Pdf,
                ..
            }
        ));
    }
}
